// Interactive terminal host
//
// Wires configuration, storage, providers and the crossterm front-end into
// one event loop and runs it until Ctrl+C / Ctrl+D.

use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::providers::Providers;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::terminal::{BootSequence, EventLoop, SystemClock, TerminalSession};

use super::input::spawn_input_thread;
use super::screen::{CrosstermFrontend, TerminalGuard};

pub struct Repl {
    config: Config,
}

impl Repl {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Durable store under the state directory, in-memory when unavailable
    fn open_store(&self) -> Arc<dyn KeyValueStore> {
        let Some(dir) = self.config.state_dir() else {
            tracing::warn!("No home directory, history and cache will not persist");
            return Arc::new(MemoryStore::new());
        };

        match FileStore::open(&dir) {
            Ok(store) => {
                tracing::debug!("Using state directory {}", dir.display());
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!("{}; history and cache will not persist", e);
                Arc::new(MemoryStore::new())
            }
        }
    }

    pub async fn run(self) -> Result<()> {
        let store = self.open_store();
        let providers = Providers::from_config(&self.config.api)?;
        let session = TerminalSession::new(&self.config, store, Arc::new(SystemClock));
        let shutdown = CancellationToken::new();

        let _guard = TerminalGuard::enter()?;

        // The front-end reports media readiness through the loop's own channel
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let frontend = CrosstermFrontend::new(tx.clone());
        let mut event_loop =
            EventLoop::with_channel(session, frontend, providers, shutdown.clone(), (tx, rx));
        if self.config.terminal.boot {
            event_loop = event_loop.with_boot(BootSequence::from_config(&self.config.terminal));
        }

        let input = spawn_input_thread(event_loop.sender(), shutdown.clone());

        let result = event_loop.run().await;

        shutdown.cancel();
        if input.join().is_err() {
            tracing::warn!("Input thread panicked");
        }

        tracing::info!("Terminal closed");
        result
    }
}
