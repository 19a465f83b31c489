// Keyboard reader - crossterm events to session keys
//
// Runs on a plain thread because `crossterm::event::read` blocks. Polls with
// a short timeout so the thread notices shutdown.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::terminal::{Key, TerminalEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Key(Key),
    Click,
    Quit,
}

/// Map one key press to an action, `None` for keys the terminal ignores
pub fn map_key(key: KeyEvent) -> Option<InputAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(InputAction::Quit),
            KeyCode::Char('a') => Some(InputAction::Key(Key::Home)),
            KeyCode::Char('e') => Some(InputAction::Key(Key::End)),
            _ => None,
        };
    }

    let key = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Escape,
        _ => return None,
    };
    Some(InputAction::Key(key))
}

/// Map a terminal event (keys, clicks, pastes) to actions
pub fn map_event(event: Event) -> Vec<InputAction> {
    match event {
        Event::Key(key) => map_key(key).into_iter().collect(),
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
            vec![InputAction::Click]
        }
        // A paste arrives as one composition
        Event::Paste(text) => vec![
            InputAction::Key(Key::CompositionStart),
            InputAction::Key(Key::CompositionEnd(
                text.chars().filter(|c| !c.is_control()).collect(),
            )),
        ],
        _ => Vec::new(),
    }
}

/// Spawn the reader thread. It exits on shutdown or when the loop is gone.
pub fn spawn_input_thread(
    tx: UnboundedSender<TerminalEvent>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while !shutdown.is_cancelled() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!("Input poll failed: {}", e);
                    shutdown.cancel();
                    break;
                }
            }

            let event = match event::read() {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("Input read failed: {}", e);
                    shutdown.cancel();
                    break;
                }
            };

            for action in map_event(event) {
                match action {
                    InputAction::Quit => {
                        tracing::debug!("Quit requested from keyboard");
                        shutdown.cancel();
                        return;
                    }
                    InputAction::Key(key) => {
                        if tx.send(TerminalEvent::Key(key)).is_err() {
                            return;
                        }
                    }
                    InputAction::Click => {
                        if tx.send(TerminalEvent::Click).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_ctrl_c_and_ctrl_d_quit() {
        assert_eq!(
            map_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputAction::Quit)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(InputAction::Quit)
        );
    }

    #[test]
    fn test_editing_keys_map() {
        assert_eq!(
            map_key(press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(InputAction::Key(Key::Escape))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            Some(InputAction::Key(Key::Char('X')))
        );
        assert_eq!(map_key(press(KeyCode::F(1), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_paste_becomes_composition() {
        let actions = map_event(Event::Paste("he\nlp".to_string()));
        assert_eq!(
            actions,
            vec![
                InputAction::Key(Key::CompositionStart),
                InputAction::Key(Key::CompositionEnd("help".to_string())),
            ]
        );
    }
}
