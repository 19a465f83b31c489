// CLI module
// Crossterm host for the terminal engine

pub mod assets;
pub mod input;
pub mod render;
mod repl;
pub mod screen;

pub use assets::{check_assets, AssetError};
pub use repl::Repl;
