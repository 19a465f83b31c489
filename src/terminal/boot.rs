// Boot sequence - timed dim lines printed before the prompt appears

use anyhow::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::TerminalConfig;

use super::event_loop::Frontend;
use super::session::TerminalSession;
use super::transcript::LineStyle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootStep {
    pub text: String,
    /// Pause before the line is printed
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    Completed,
    /// Cancelled part way; the remaining lines were printed without delays
    Skipped,
}

#[derive(Debug, Clone)]
pub struct BootSequence {
    steps: Vec<BootStep>,
    typing_delay: Duration,
}

impl BootSequence {
    pub fn new(steps: Vec<BootStep>) -> Self {
        Self {
            steps,
            typing_delay: Duration::ZERO,
        }
    }

    /// Standard boot lines with delays from configuration
    pub fn from_config(config: &TerminalConfig) -> Self {
        let delay = Duration::from_millis(config.boot_line_delay_ms);
        let step = |text: &str, delay| BootStep {
            text: text.to_string(),
            delay,
        };

        Self::new(vec![
            step("[boot] Initializing system...", delay),
            step("[boot] Loading modules...", delay),
            step("[boot] Ready.", delay),
            step("Type 'help' for available commands.", Duration::ZERO),
        ])
        .with_typing_delay(Duration::from_millis(config.typing_delay_ms))
    }

    /// Per-character delay; zero prints each line at once
    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    pub fn steps(&self) -> &[BootStep] {
        &self.steps
    }

    /// Total time the sequence takes when not cancelled
    pub fn duration(&self) -> Duration {
        self.steps
            .iter()
            .map(|step| step.delay + self.typing_delay * step.text.chars().count() as u32)
            .sum()
    }

    /// Print the sequence, then show and focus the prompt. Cancelling the
    /// token flushes the remaining lines immediately. The sequence holds no
    /// state between runs and can be restarted with a fresh token.
    pub async fn run<F: Frontend + ?Sized>(
        &self,
        session: &mut TerminalSession,
        frontend: &mut F,
        cancel: &CancellationToken,
    ) -> Result<BootOutcome> {
        tracing::debug!("Boot sequence starting ({} lines)", self.steps.len());
        session.begin_boot();
        paint(session, frontend)?;

        let mut skipping = cancel.is_cancelled();

        for step in &self.steps {
            if !skipping {
                skipping = pause(step.delay, cancel).await;
            }

            if skipping || self.typing_delay.is_zero() {
                session.print(super::escape::escape_html(&step.text), LineStyle::Dim);
                paint(session, frontend)?;
                continue;
            }

            let id = session.print("", LineStyle::Dim);
            let mut typed = String::new();
            for c in step.text.chars() {
                typed.push(c);
                session
                    .transcript
                    .replace(id, super::escape::escape_html(&typed), LineStyle::Dim);
                paint(session, frontend)?;

                if !skipping {
                    skipping = pause(self.typing_delay, cancel).await;
                }
            }
            session
                .transcript
                .replace(id, super::escape::escape_html(&step.text), LineStyle::Dim);
        }

        session.finish_boot();
        paint(session, frontend)?;

        let outcome = if skipping {
            BootOutcome::Skipped
        } else {
            BootOutcome::Completed
        };
        tracing::debug!("Boot sequence finished: {:?}", outcome);
        Ok(outcome)
    }
}

/// Sleep unless cancelled first; returns true when cancelled
async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return cancel.is_cancelled();
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        _ = cancel.cancelled() => true,
    }
}

fn paint<F: Frontend + ?Sized>(session: &mut TerminalSession, frontend: &mut F) -> Result<()> {
    if session.frame() {
        frontend.render(session)?;
    }
    Ok(())
}
