// Terminal engine: input line, history, commands, modes and the event loop

pub mod boot;
pub mod cache;
pub mod command;
mod dispatcher;
pub mod escape;
pub mod event_loop;
pub mod handlers;
pub mod history;
pub mod line_buffer;
pub mod mode;
pub mod registry;
pub mod session;
pub mod transcript;

pub use boot::{BootOutcome, BootSequence, BootStep};
pub use cache::{Clock, ManualClock, ResponseCache, SystemClock};
pub use command::{Command, InfoPage, UsageError};
pub use escape::escape_html;
pub use event_loop::{EventLoop, Frontend, TerminalEvent};
pub use history::HistoryStore;
pub use line_buffer::{LineBuffer, CARET_MARKUP};
pub use mode::{MediaRef, Mode, Transition};
pub use registry::{CommandRegistry, CommandSpec, Completion};
pub use session::{Key, KeyOutcome, LookupRequest, MediaState, Surfaces, TerminalSession};
pub use transcript::{LineId, LineStyle, OutputLine, Transcript};
