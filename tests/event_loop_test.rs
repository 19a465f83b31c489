// Event loop with scripted providers and a recording front-end

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crtterm::config::Config;
use crtterm::providers::{
    LookupKind, ProfileData, ProfileProvider, ProfileQuery, Providers, RatingSummary, RepoSummary,
};
use crtterm::storage::MemoryStore;
use crtterm::terminal::{
    BootSequence, BootStep, EventLoop, Frontend, Key, LineStyle, SystemClock, TerminalEvent,
    TerminalSession,
};

/// Answers after a fixed delay, or fails when `fail` is set
struct ScriptedProvider {
    delay: Duration,
    fail: bool,
}

#[async_trait]
impl ProfileProvider for ScriptedProvider {
    async fn fetch(&self, query: &ProfileQuery) -> Result<ProfileData> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            bail!("scripted failure");
        }
        Ok(match query.kind {
            LookupKind::Projects | LookupKind::Stats => {
                ProfileData::Repositories(vec![RepoSummary {
                    name: "slow-repo".to_string(),
                    description: None,
                    stars: 1,
                }])
            }
            LookupKind::Rating => ProfileData::Rating(RatingSummary {
                handle: query.handle.clone(),
                rank: Some("pupil".to_string()),
                rating: Some(1300),
                max_rating: Some(1350),
            }),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[derive(Clone, Default)]
struct Recorder {
    renders: Arc<Mutex<usize>>,
}

impl Frontend for Recorder {
    fn render(&mut self, _session: &TerminalSession) -> Result<()> {
        *self.renders.lock().unwrap() += 1;
        Ok(())
    }
}

fn providers(stats_delay: u64, rating_delay: u64, fail: bool) -> Providers {
    Providers {
        stats: Arc::new(ScriptedProvider {
            delay: Duration::from_millis(stats_delay),
            fail,
        }),
        rating: Arc::new(ScriptedProvider {
            delay: Duration::from_millis(rating_delay),
            fail,
        }),
    }
}

fn session() -> TerminalSession {
    TerminalSession::new(&Config::default(), Arc::new(MemoryStore::new()), Arc::new(SystemClock))
}

fn event_loop(providers: Providers) -> EventLoop<Recorder> {
    EventLoop::new(session(), Recorder::default(), providers, CancellationToken::new())
}

fn send_line(tx: &tokio::sync::mpsc::UnboundedSender<TerminalEvent>, line: &str) {
    for c in line.chars() {
        tx.send(TerminalEvent::Key(Key::Char(c))).unwrap();
    }
    tx.send(TerminalEvent::Key(Key::Enter)).unwrap();
}

async fn run_until(
    event_loop: EventLoop<Recorder>,
    after: Duration,
) -> Result<(TerminalSession, Recorder)> {
    let tx = event_loop.sender();
    let handle = tokio::spawn(async move {
        let mut event_loop = event_loop;
        event_loop.run().await?;
        Ok::<_, anyhow::Error>(event_loop.into_parts())
    });

    tokio::time::sleep(after).await;
    tx.send(TerminalEvent::Shutdown).unwrap();
    handle.await?
}

#[tokio::test(start_paused = true)]
async fn test_lookup_resolves_loading_line() -> Result<()> {
    let event_loop = event_loop(providers(50, 50, false));
    send_line(&event_loop.sender(), "cp");

    let (session, recorder) = run_until(event_loop, Duration::from_millis(200)).await?;

    let last = session.transcript().last().unwrap();
    assert_eq!(last.style, LineStyle::Plain);
    assert!(last.markup.contains("Rank: pupil"));
    assert!(*recorder.renders.lock().unwrap() > 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_completions_land_on_their_lines() -> Result<()> {
    let event_loop = event_loop(providers(500, 10, false));
    let tx = event_loop.sender();
    send_line(&tx, "projects");
    send_line(&tx, "cp");

    let (session, _) = run_until(event_loop, Duration::from_secs(1)).await?;

    let lines: Vec<String> = session.transcript().lines().map(|l| l.markup.clone()).collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "&gt; projects");
    assert!(lines[1].contains("slow-repo"));
    assert_eq!(lines[2], "&gt; cp");
    assert!(lines[3].contains("pupil"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_failed_lookup_shows_affordance() -> Result<()> {
    let event_loop = event_loop(providers(10, 10, true));
    send_line(&event_loop.sender(), "stats");

    let (session, _) = run_until(event_loop, Duration::from_millis(100)).await?;

    let last = session.transcript().last().unwrap();
    assert_eq!(last.style, LineStyle::Error);
    assert!(last.markup.contains("API unavailable."));
    assert!(last.markup.contains("https://github.com/Prakharprasun"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_clear_before_completion_discards_result() -> Result<()> {
    let event_loop = event_loop(providers(300, 300, false));
    let tx = event_loop.sender();
    send_line(&tx, "projects");
    send_line(&tx, "clear");

    let (session, _) = run_until(event_loop, Duration::from_secs(1)).await?;
    assert!(session.transcript().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_renders_are_coalesced_per_frame() -> Result<()> {
    let recorder = Recorder::default();
    let event_loop = EventLoop::new(
        session(),
        recorder.clone(),
        providers(0, 0, false),
        CancellationToken::new(),
    );
    let tx = event_loop.sender();
    for c in "experience".chars() {
        tx.send(TerminalEvent::Key(Key::Char(c))).unwrap();
    }

    let (session, _) = run_until(event_loop, Duration::from_millis(200)).await?;

    assert_eq!(session.buffer().text(), "experience");
    // Ten keystrokes queued before the first frame paint at most a couple of times
    assert!(*recorder.renders.lock().unwrap() <= 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_escape_ejects_through_loop() -> Result<()> {
    let event_loop = event_loop(providers(0, 0, false));
    let tx = event_loop.sender();
    send_line(&tx, "mount demo");
    tx.send(TerminalEvent::MediaLoaded).unwrap();
    tx.send(TerminalEvent::Key(Key::Escape)).unwrap();

    let (session, _) = run_until(event_loop, Duration::from_millis(50)).await?;
    assert_eq!(session.mode(), &crtterm::terminal::Mode::Terminal);
    assert!(session.surfaces().terminal_visible);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_token_stops_loop_during_boot() -> Result<()> {
    let shutdown = CancellationToken::new();
    let boot = BootSequence::new(vec![BootStep {
        text: "[boot] Initializing system...".to_string(),
        delay: Duration::from_secs(10),
    }]);
    let mut event_loop = EventLoop::new(
        session(),
        Recorder::default(),
        providers(0, 0, false),
        shutdown.clone(),
    )
    .with_boot(boot);

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = tokio::time::Instant::now();
    event_loop.run().await?;
    assert_eq!(started.elapsed(), Duration::from_millis(100));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_keys_typed_during_boot_are_dropped() -> Result<()> {
    let boot = BootSequence::new(vec![BootStep {
        text: "[boot] Ready.".to_string(),
        delay: Duration::from_secs(1),
    }]);
    let event_loop = event_loop(providers(0, 0, false)).with_boot(boot);

    let tx = event_loop.sender();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        send_line(&tx, "help");
    });

    let (session, _) = run_until(event_loop, Duration::from_secs(2)).await?;

    assert!(session.history().is_empty());
    assert_eq!(session.buffer().text(), "");
    let lines: Vec<String> = session.transcript().lines().map(|l| l.markup.clone()).collect();
    assert_eq!(lines, vec!["[boot] Ready."]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_keys_after_boot_are_handled() -> Result<()> {
    let boot = BootSequence::new(vec![BootStep {
        text: "[boot] Ready.".to_string(),
        delay: Duration::from_millis(100),
    }]);
    let event_loop = event_loop(providers(0, 0, false)).with_boot(boot);

    let tx = event_loop.sender();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        send_line(&tx, "help");
    });

    let (session, _) = run_until(event_loop, Duration::from_secs(1)).await?;
    assert_eq!(session.history().entries(), &["help"]);
    Ok(())
}
