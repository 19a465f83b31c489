// crtterm - retro CRT terminal widget
// Library exports

pub mod cli;
pub mod config;
pub mod logging;
pub mod providers;
pub mod storage;
pub mod terminal;
