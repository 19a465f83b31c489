// Command dispatcher
//
// Turns a submitted line into an echo, a history entry and one handler
// invocation. The input line is cleared before the handler runs.

use super::escape::escape_html;
use super::session::{LookupRequest, TerminalSession};
use super::transcript::LineStyle;

impl TerminalSession {
    /// Submit a raw line. Blank lines, and any line while a cartridge is
    /// mounted, are ignored and leave the input untouched.
    pub fn submit(&mut self, raw: &str) -> Option<LookupRequest> {
        if raw.trim().is_empty() {
            return None;
        }
        if !self.mode.accepts_commands() {
            tracing::debug!("Ignoring submit while a cartridge is mounted");
            return None;
        }

        self.transcript.push(
            format!("{}{}", escape_html(&self.prompt), escape_html(raw)),
            LineStyle::Echo,
        );
        self.history.append(raw);
        self.buffer.clear();

        let mut tokens = raw.split_whitespace();
        let name = tokens.next()?;
        let args: Vec<&str> = tokens.collect();

        let Some(parse) = self.registry.resolve(name).map(|spec| spec.parse) else {
            tracing::debug!("Unknown command '{}'", name);
            self.transcript.push(
                format!(
                    "Command not found: {}. Type 'help' for available commands.",
                    escape_html(name)
                ),
                LineStyle::Error,
            );
            return None;
        };

        match parse(&args) {
            Ok(command) => {
                tracing::debug!("Dispatching {:?}", command);
                self.execute(command)
            }
            Err(e) => {
                self.transcript.push(escape_html(&e.to_string()), LineStyle::Error);
                None
            }
        }
    }
}
