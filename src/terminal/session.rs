// Terminal session - all widget state in one owned value
//
// Key handling, tab completion, the mode switch side effects and repaint
// scheduling live here. Command dispatch is in dispatcher.rs, command bodies
// in handlers.rs.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{find_theme, ApiConfig, Config, ProfileConfig, Theme, THEMES};
use crate::providers::{ProfileData, ProfileQuery};
use crate::storage::KeyValueStore;

use super::cache::{Clock, ResponseCache};
use super::handlers;
use super::history::HistoryStore;
use super::line_buffer::LineBuffer;
use super::mode::{MediaRef, Mode, ModeState, Transition};
use super::registry::{CommandRegistry, Completion};
use super::transcript::{LineId, LineStyle, Transcript};

/// Input events the session understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
    Up,
    Down,
    Tab,
    Escape,
    /// Caret placed by a click or selection change
    Select(usize),
    CompositionStart,
    /// Composition finished with the committed text
    CompositionEnd(String),
}

/// An external lookup the host must run and report back through
/// `TerminalSession::resolve_lookup`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Loading line to replace with the result
    pub anchor: LineId,
    pub query: ProfileQuery,
}

/// What the host should do after a key event
#[derive(Debug, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The key was handled; suppress the host's default action
    pub consumed: bool,
    pub lookup: Option<LookupRequest>,
}

impl KeyOutcome {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed() -> Self {
        Self {
            consumed: true,
            lookup: None,
        }
    }
}

/// Playback state of the cartridge surface
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MediaState {
    #[default]
    Idle,
    Loading(MediaRef),
    Playing(MediaRef),
}

/// Visibility and focus of the two display regions. Both regions always
/// exist; switching modes only toggles these flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surfaces {
    pub terminal_visible: bool,
    pub cartridge_visible: bool,
    /// The prompt line is shown (false during boot)
    pub input_visible: bool,
    pub input_focused: bool,
    pub media: MediaState,
}

impl Default for Surfaces {
    fn default() -> Self {
        Self {
            terminal_visible: true,
            cartridge_visible: false,
            input_visible: true,
            input_focused: true,
            media: MediaState::Idle,
        }
    }
}

pub struct TerminalSession {
    pub(super) profile: ProfileConfig,
    pub(super) api: ApiConfig,
    pub(super) prompt: String,
    pub(super) cartridges: Vec<MediaRef>,
    pub(super) theme: &'static Theme,
    pub(super) buffer: LineBuffer,
    pub(super) history: HistoryStore,
    pub(super) registry: CommandRegistry,
    pub(super) transcript: Transcript,
    pub(super) mode: ModeState,
    pub(super) surfaces: Surfaces,
    pub(super) cache: ResponseCache,
    surfaces_dirty: bool,
}

impl TerminalSession {
    pub fn new(config: &Config, store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let theme = find_theme(&config.active_theme).unwrap_or(&THEMES[0]);
        let cache_ttl = Duration::from_secs(config.api.cache_ttl_secs);

        Self {
            profile: config.profile.clone(),
            api: config.api.clone(),
            prompt: config.terminal.prompt.clone(),
            cartridges: config
                .cartridges
                .iter()
                .map(|c| MediaRef {
                    name: c.name.to_lowercase(),
                    url: c.url.clone(),
                })
                .collect(),
            theme,
            buffer: LineBuffer::new(config.terminal.modality),
            history: HistoryStore::load(Arc::clone(&store), config.terminal.history_limit),
            registry: CommandRegistry::new(),
            transcript: Transcript::new(),
            mode: ModeState::new(),
            surfaces: Surfaces::default(),
            cache: ResponseCache::new(store, clock, cache_ttl),
            surfaces_dirty: true,
        }
    }

    /// Replace the command registry
    pub fn with_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn mode(&self) -> &Mode {
        self.mode.mode()
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Markup of the input line as of the last repaint
    pub fn input_markup(&self) -> &str {
        self.buffer.painted()
    }

    /// Append a line to the transcript
    pub fn print(&mut self, markup: impl Into<String>, style: LineStyle) -> LineId {
        self.transcript.push(markup, style)
    }

    /// Handle one input event
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        // Escape is global: it ejects from any region, and only in Cartridge
        if key == Key::Escape {
            if self.mode.intercepts_cancel_key() {
                self.eject();
                return KeyOutcome::consumed();
            }
            return KeyOutcome::ignored();
        }

        if self.mode.is_cartridge()
            || !self.surfaces.input_visible
            || !self.surfaces.input_focused
        {
            return KeyOutcome::ignored();
        }

        if self.buffer.is_composing() && !matches!(key, Key::CompositionEnd(_)) {
            return KeyOutcome::ignored();
        }

        match key {
            Key::Char(c) => self.buffer.insert(c),
            Key::Backspace => self.buffer.backspace(),
            Key::Delete => self.buffer.delete(),
            Key::Left => self.buffer.move_left(),
            Key::Right => self.buffer.move_right(),
            Key::Home => self.buffer.move_home(),
            Key::End => self.buffer.move_end(),
            Key::Select(offset) => self.buffer.set_caret(offset),
            Key::CompositionStart => self.buffer.begin_composition(),
            Key::CompositionEnd(text) => self.buffer.end_composition(&text),
            Key::Enter => {
                let line = self.buffer.text().to_string();
                return KeyOutcome {
                    consumed: true,
                    lookup: self.submit(&line),
                };
            }
            Key::Up => {
                if let Some(text) = self.history.recall_older() {
                    self.buffer.set_text(&text);
                }
                return KeyOutcome::consumed();
            }
            Key::Down => {
                if let Some(text) = self.history.recall_newer() {
                    self.buffer.set_text(&text);
                }
                return KeyOutcome::consumed();
            }
            Key::Tab => {
                self.complete_tab();
                return KeyOutcome::consumed();
            }
            Key::Escape => return KeyOutcome::ignored(),
        }

        KeyOutcome::ignored()
    }

    /// Complete the command name on the input line
    pub fn complete_tab(&mut self) {
        let partial = self.buffer.text().trim().to_string();
        if partial.is_empty() || partial.contains(char::is_whitespace) {
            return;
        }

        match self.registry.complete(&partial) {
            Completion::Unique(name) => self.buffer.set_text(name),
            Completion::Ambiguous(names) => {
                self.transcript.push(names.join("  "), LineStyle::Dim);
            }
            Completion::NoMatch => {}
        }
    }

    /// Click on the terminal region
    pub fn focus_input(&mut self) {
        if !self.mode.is_cartridge()
            && self.surfaces.input_visible
            && !self.surfaces.input_focused
        {
            self.surfaces.input_focused = true;
            self.buffer.request_repaint();
            self.surfaces_dirty = true;
        }
    }

    /// Switch to a palette by name
    pub fn set_theme(&mut self, name: &str) -> Result<&'static Theme> {
        let theme = find_theme(name).ok_or_else(|| anyhow::anyhow!("Unknown theme: {}", name))?;
        self.theme = theme;
        self.surfaces_dirty = true;
        Ok(theme)
    }

    /// Configured cartridge by name; `None` picks the first one
    pub fn cartridge(&self, name: Option<&str>) -> Option<&MediaRef> {
        match name {
            Some(name) => self.cartridges.iter().find(|c| c.name.eq_ignore_ascii_case(name)),
            None => self.cartridges.first(),
        }
    }

    pub fn cartridges(&self) -> &[MediaRef] {
        &self.cartridges
    }

    /// Terminal -> Cartridge
    pub fn mount(&mut self, media: MediaRef) -> Transition {
        let transition = self.mode.mount(media);
        match &transition {
            Transition::Mounted(media) => {
                tracing::info!("Mounting cartridge {} ({})", media.name, media.url);
                self.transcript.push(
                    format!("Cartridge inserted: {}", super::escape::escape_html(&media.name)),
                    LineStyle::Dim,
                );
                self.surfaces.terminal_visible = false;
                self.surfaces.cartridge_visible = true;
                self.surfaces.input_focused = false;
                self.surfaces.media = MediaState::Loading(media.clone());
                self.surfaces_dirty = true;
            }
            Transition::AlreadyMounted(current) => {
                self.transcript.push(
                    format!(
                        "Cartridge already mounted: {}. Press Esc to eject.",
                        super::escape::escape_html(&current.name)
                    ),
                    LineStyle::Dim,
                );
            }
            Transition::Ejected(_) | Transition::NotMounted => {}
        }
        transition
    }

    /// Cartridge -> Terminal. No-op when nothing is mounted.
    pub fn eject(&mut self) -> Transition {
        let transition = self.mode.eject();
        if let Transition::Ejected(media) = &transition {
            tracing::info!("Ejected cartridge {}", media.name);
            self.surfaces.media = MediaState::Idle;
            self.surfaces.cartridge_visible = false;
            self.surfaces.terminal_visible = true;
            self.surfaces.input_focused = self.surfaces.input_visible;
            self.surfaces_dirty = true;
            self.transcript.push("Cartridge ejected.", LineStyle::Dim);

            // Input text is untouched; caret returns to its end
            self.buffer.move_end();
            self.buffer.request_repaint();
        }
        transition
    }

    /// The host finished loading the mounted media
    pub fn media_loaded(&mut self) {
        if let MediaState::Loading(media) = &self.surfaces.media {
            self.surfaces.media = MediaState::Playing(media.clone());
            self.surfaces_dirty = true;
        }
    }

    /// Hide the prompt while the boot sequence prints
    pub fn begin_boot(&mut self) {
        self.surfaces.input_visible = false;
        self.surfaces.input_focused = false;
        self.surfaces_dirty = true;
    }

    /// Show and focus the prompt
    pub fn finish_boot(&mut self) {
        self.surfaces.input_visible = true;
        self.surfaces.input_focused = !self.mode.is_cartridge();
        self.surfaces_dirty = true;
        self.buffer.request_repaint();
    }

    /// Apply the outcome of a lookup. Returns false when the loading line is
    /// gone (e.g. after `clear`) and the result was discarded.
    pub fn resolve_lookup(&mut self, request: &LookupRequest, result: Result<ProfileData>) -> bool {
        let name = request.query.kind.command_name();

        match result {
            Ok(data) => {
                let markup = handlers::format_profile_data(&data);
                self.cache.set(name, markup.clone(), None);
                if self.transcript.replace(request.anchor, markup, LineStyle::Plain) {
                    true
                } else {
                    tracing::debug!("Discarding '{}' result, loading line is gone", name);
                    false
                }
            }
            Err(e) => {
                tracing::debug!("Lookup '{}' failed: {:#}", name, e);
                let markup = handlers::api_unavailable(&self.api, &request.query);
                if self.transcript.replace(request.anchor, markup, LineStyle::Error) {
                    true
                } else {
                    tracing::debug!("Discarding '{}' failure, loading line is gone", name);
                    false
                }
            }
        }
    }

    /// Run the coalesced repaint for this frame. Returns true when anything
    /// visible changed since the previous frame.
    pub fn frame(&mut self) -> bool {
        let painted = self.buffer.take_repaint();
        let transcript = self.transcript.take_dirty();
        let surfaces = std::mem::take(&mut self.surfaces_dirty);
        painted || transcript || surfaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::terminal::cache::SystemClock;
    use crate::terminal::line_buffer::CARET_MARKUP;

    fn session() -> TerminalSession {
        TerminalSession::new(
            &Config::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock),
        )
    }

    fn type_line(session: &mut TerminalSession, text: &str) {
        for c in text.chars() {
            session.handle_key(Key::Char(c));
        }
    }

    #[test]
    fn test_enter_submits_and_clears_input() {
        let mut session = session();
        type_line(&mut session, "help");
        let outcome = session.handle_key(Key::Enter);

        assert!(outcome.consumed);
        assert_eq!(session.buffer().text(), "");
        assert_eq!(session.history().entries(), &["help"]);
    }

    #[test]
    fn test_arrow_keys_recall_history() {
        let mut session = session();
        session.submit("help");
        session.submit("theme");

        assert!(session.handle_key(Key::Up).consumed);
        assert_eq!(session.buffer().text(), "theme");
        assert_eq!(session.buffer().caret(), 5);

        session.handle_key(Key::Up);
        assert_eq!(session.buffer().text(), "help");

        session.handle_key(Key::Down);
        session.handle_key(Key::Down);
        assert_eq!(session.buffer().text(), "");
    }

    #[test]
    fn test_escape_ignored_in_terminal_mode() {
        let mut session = session();
        assert!(!session.handle_key(Key::Escape).consumed);
    }

    #[test]
    fn test_escape_ejects_in_cartridge_mode() {
        let mut session = session();
        session.submit("mount");
        assert!(matches!(session.mode(), Mode::Cartridge { .. }));

        let outcome = session.handle_key(Key::Escape);
        assert!(outcome.consumed);
        assert_eq!(session.mode(), &Mode::Terminal);
        assert!(session.surfaces().input_focused);
    }

    #[test]
    fn test_eject_restores_caret_to_end_of_unchanged_text() {
        let mut session = session();
        type_line(&mut session, "stats");
        session.handle_key(Key::Home);

        let media = session.cartridge(None).cloned().unwrap();
        session.mount(media);
        assert!(!session.surfaces().input_focused);

        // Keys other than Escape are inert while mounted
        assert!(!session.handle_key(Key::Char('x')).consumed);
        assert!(!session.handle_key(Key::Enter).consumed);
        assert_eq!(session.buffer().text(), "stats");

        session.frame();
        session.handle_key(Key::Escape);
        assert_eq!(session.buffer().text(), "stats");
        assert_eq!(session.buffer().caret(), 5);
        assert!(session.frame());
        assert_eq!(session.input_markup(), format!("stats{}", CARET_MARKUP));
    }

    #[test]
    fn test_media_loading_then_playing() {
        let mut session = session();
        let media = session.cartridge(Some("demo")).cloned().unwrap();
        session.mount(media.clone());

        assert_eq!(session.surfaces().media, MediaState::Loading(media.clone()));
        assert!(session.surfaces().cartridge_visible);
        assert!(!session.surfaces().terminal_visible);

        session.media_loaded();
        assert_eq!(session.surfaces().media, MediaState::Playing(media));

        session.eject();
        assert_eq!(session.surfaces().media, MediaState::Idle);
        assert!(session.surfaces().terminal_visible);
    }

    #[test]
    fn test_double_mount_prints_notice() {
        let mut session = session();
        let media = session.cartridge(None).cloned().unwrap();
        session.mount(media.clone());
        let before = session.transcript().len();

        assert!(matches!(session.mount(media), Transition::AlreadyMounted(_)));
        assert_eq!(session.transcript().len(), before + 1);
        assert!(session.transcript().last().unwrap().markup.contains("already mounted"));
    }

    #[test]
    fn test_double_eject_is_silent() {
        let mut session = session();
        let before = session.transcript().len();
        assert_eq!(session.eject(), Transition::NotMounted);
        assert_eq!(session.transcript().len(), before);
    }

    #[test]
    fn test_keys_ignored_during_boot() {
        let mut session = session();
        session.begin_boot();
        session.handle_key(Key::Char('a'));
        assert_eq!(session.buffer().text(), "");

        session.finish_boot();
        session.handle_key(Key::Char('a'));
        assert_eq!(session.buffer().text(), "a");
    }

    #[test]
    fn test_composition_repaints_once() {
        let mut session = session();
        session.frame();
        let paints = session.buffer().paint_count();

        session.handle_key(Key::CompositionStart);
        session.handle_key(Key::Char('k'));
        session.frame();
        assert_eq!(session.buffer().paint_count(), paints);

        session.handle_key(Key::CompositionEnd("か".to_string()));
        session.frame();
        session.frame();
        assert_eq!(session.buffer().paint_count(), paints + 1);
        assert_eq!(session.buffer().text(), "か");
    }

    #[test]
    fn test_frame_coalesces_keystrokes() {
        let mut session = session();
        session.frame();
        let paints = session.buffer().paint_count();

        type_line(&mut session, "projects");
        assert!(session.frame());
        assert!(!session.frame());
        assert_eq!(session.buffer().paint_count(), paints + 1);
    }
}
