// History and response cache surviving a restart through the file store

use anyhow::Result;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use crtterm::config::Config;
use crtterm::providers::ProfileData;
use crtterm::storage::{FileStore, KeyValueStore};
use crtterm::terminal::{Key, ManualClock, TerminalSession};

fn open(dir: &TempDir, clock: Arc<ManualClock>) -> Result<TerminalSession> {
    let store = Arc::new(FileStore::open(dir.path())?);
    Ok(TerminalSession::new(&Config::default(), store, clock))
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
    ))
}

#[test]
fn test_history_survives_restart() -> Result<()> {
    let dir = TempDir::new()?;
    {
        let mut session = open(&dir, clock())?;
        session.submit("help");
        session.submit("theme solarized");
    }

    let mut session = open(&dir, clock())?;
    assert_eq!(session.history().entries(), &["help", "theme solarized"]);

    session.handle_key(Key::Up);
    assert_eq!(session.buffer().text(), "theme solarized");
    Ok(())
}

#[test]
fn test_history_limit_applies_across_restarts() -> Result<()> {
    let dir = TempDir::new()?;
    {
        let mut session = open(&dir, clock())?;
        for i in 0..55 {
            session.submit(&format!("cmd{}", i));
        }
        assert_eq!(session.history().len(), 50);
    }

    let session = open(&dir, clock())?;
    assert_eq!(session.history().len(), 50);
    assert_eq!(session.history().entries()[0], "cmd5");
    Ok(())
}

#[test]
fn test_clear_history_removes_file_entry() -> Result<()> {
    let dir = TempDir::new()?;
    {
        let mut session = open(&dir, clock())?;
        session.submit("help");
        session.submit("clear --history");
    }

    let store = FileStore::open(dir.path())?;
    assert!(store.get("cmd_history")?.is_none());
    assert!(open(&dir, clock())?.history().is_empty());
    Ok(())
}

#[test]
fn test_cached_lookup_survives_restart() -> Result<()> {
    let dir = TempDir::new()?;
    let clock = clock();
    {
        let mut session = open(&dir, clock.clone())?;
        let request = session.submit("stats").expect("first lookup fetches");
        session.resolve_lookup(&request, Ok(ProfileData::Languages(Vec::new())));
    }

    clock.advance(Duration::from_secs(120));
    let mut session = open(&dir, clock.clone())?;
    assert!(session.submit("stats").is_none());
    assert_eq!(
        session.transcript().last().unwrap().markup,
        "<div class=\"dim\">No language data.</div>"
    );

    clock.advance(Duration::from_secs(180));
    let mut session = open(&dir, clock)?;
    assert!(session.submit("stats").is_some());
    Ok(())
}

#[test]
fn test_corrupt_history_file_is_ignored() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("cmd_history.json"), "{not json")?;

    let mut session = open(&dir, clock())?;
    assert!(session.history().is_empty());

    session.submit("help");
    assert_eq!(session.history().entries(), &["help"]);
    Ok(())
}
