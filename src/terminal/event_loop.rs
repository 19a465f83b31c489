// Event loop - the single scheduler for a terminal session
//
// Key events, lookup completions and host notifications arrive on one
// channel. A frame tick performs the coalesced repaint. Lookups run on
// spawned tasks and report back through the same channel.

use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::constants::FRAME_INTERVAL_MS;
use crate::providers::{ProfileData, Providers};

use super::boot::{BootOutcome, BootSequence};
use super::session::{Key, LookupRequest, TerminalSession};

/// Events that flow through the terminal event loop
#[derive(Debug)]
pub enum TerminalEvent {
    Key(Key),
    /// Click on the terminal region
    Click,
    /// The host finished loading the mounted media
    MediaLoaded,
    LookupComplete {
        request: LookupRequest,
        result: Result<ProfileData>,
    },
    Shutdown,
}

/// Display side of the widget
pub trait Frontend: Send {
    /// Paint the session. Called at most once per frame, only after a change.
    fn render(&mut self, session: &TerminalSession) -> Result<()>;
}

pub struct EventLoop<F: Frontend> {
    session: TerminalSession,
    frontend: F,
    providers: Providers,
    event_rx: mpsc::UnboundedReceiver<TerminalEvent>,
    event_tx: mpsc::UnboundedSender<TerminalEvent>,
    shutdown: CancellationToken,
    boot: Option<BootSequence>,
    frame_interval: Duration,
}

impl<F: Frontend> EventLoop<F> {
    pub fn new(
        session: TerminalSession,
        frontend: F,
        providers: Providers,
        shutdown: CancellationToken,
    ) -> Self {
        Self::with_channel(session, frontend, providers, shutdown, mpsc::unbounded_channel())
    }

    /// Build around an existing channel, for front-ends that post events
    pub fn with_channel(
        session: TerminalSession,
        frontend: F,
        providers: Providers,
        shutdown: CancellationToken,
        (event_tx, event_rx): (
            mpsc::UnboundedSender<TerminalEvent>,
            mpsc::UnboundedReceiver<TerminalEvent>,
        ),
    ) -> Self {
        Self {
            session,
            frontend,
            providers,
            event_rx,
            event_tx,
            shutdown,
            boot: None,
            frame_interval: Duration::from_millis(FRAME_INTERVAL_MS),
        }
    }

    /// Run a boot sequence before accepting input
    pub fn with_boot(mut self, boot: BootSequence) -> Self {
        self.boot = Some(boot);
        self
    }

    /// Sender for key events and host notifications
    pub fn sender(&self) -> mpsc::UnboundedSender<TerminalEvent> {
        self.event_tx.clone()
    }

    pub fn session(&self) -> &TerminalSession {
        &self.session
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn into_parts(self) -> (TerminalSession, F) {
        (self.session, self.frontend)
    }

    /// Run until shutdown
    pub async fn run(&mut self) -> Result<()> {
        tracing::debug!("Event loop starting");

        if let Some(boot) = self.boot.take() {
            let outcome = boot
                .run(&mut self.session, &mut self.frontend, &self.shutdown.child_token())
                .await?;
            if outcome == BootOutcome::Skipped && self.shutdown.is_cancelled() {
                tracing::debug!("Shutdown during boot");
                return Ok(());
            }
            if !self.drain_boot_backlog() {
                return Ok(());
            }
        }

        let mut frame_interval = tokio::time::interval(self.frame_interval);
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::debug!("Shutdown requested");
                    break;
                }

                Some(event) = self.event_rx.recv() => {
                    if !self.handle_event(event) {
                        break;
                    }
                }

                _ = frame_interval.tick() => {
                    self.paint()?;
                }
            }
        }

        // Flush whatever changed since the last frame
        self.paint()?;
        tracing::debug!("Event loop stopped");
        Ok(())
    }

    /// Apply one event. Returns false when the loop should exit.
    pub fn handle_event(&mut self, event: TerminalEvent) -> bool {
        match event {
            TerminalEvent::Key(key) => {
                let outcome = self.session.handle_key(key);
                if let Some(request) = outcome.lookup {
                    self.spawn_lookup(request);
                }
            }
            TerminalEvent::Click => self.session.focus_input(),
            TerminalEvent::MediaLoaded => self.session.media_loaded(),
            TerminalEvent::LookupComplete { request, result } => {
                self.session.resolve_lookup(&request, result);
            }
            TerminalEvent::Shutdown => return false,
        }
        true
    }

    /// Events queued while boot held the session. Keys were typed at a hidden
    /// prompt and are dropped; everything else is applied in order. Returns
    /// false when a shutdown was queued.
    fn drain_boot_backlog(&mut self) -> bool {
        let mut dropped = 0usize;
        while let Ok(event) = self.event_rx.try_recv() {
            if let TerminalEvent::Key(_) = event {
                dropped += 1;
                continue;
            }
            if !self.handle_event(event) {
                return false;
            }
        }
        if dropped > 0 {
            tracing::debug!("Dropped {} keys typed during boot", dropped);
        }
        true
    }

    fn spawn_lookup(&self, request: LookupRequest) {
        let provider = self.providers.for_kind(request.query.kind);
        let tx = self.event_tx.clone();

        tracing::debug!(
            "Spawning {} lookup for {}",
            provider.name(),
            request.query.handle
        );

        tokio::spawn(async move {
            let result = provider.fetch(&request.query).await;
            // Receiver gone means the loop has exited
            let _ = tx.send(TerminalEvent::LookupComplete { request, result });
        });
    }

    fn paint(&mut self) -> Result<()> {
        if self.session.frame() {
            self.frontend.render(&self.session)?;
        }
        Ok(())
    }
}
