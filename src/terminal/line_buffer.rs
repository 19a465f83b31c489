// Line buffer and caret renderer
//
// Owns the text being typed and the caret offset (in chars). Rendering
// produces `escape(before) + CARET + escape(after)`. Repaints are requested
// by every mutation and performed at most once per frame via `take_repaint`.

use crate::config::InputModality;

use super::escape::escape_html;

/// Markup for the synthetic caret glyph
pub const CARET_MARKUP: &str = "<span class=\"cursor\">█</span>";

/// Raw input plus caret. `caret <= raw_text.chars().count()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    raw_text: String,
    caret: usize,
    composing: bool,
}

impl InputState {
    pub fn text(&self) -> &str {
        &self.raw_text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    fn char_len(&self) -> usize {
        self.raw_text.chars().count()
    }

    fn byte_index(&self, char_offset: usize) -> usize {
        self.raw_text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.raw_text.len())
    }
}

pub struct LineBuffer {
    state: InputState,
    modality: InputModality,
    repaint_pending: bool,
    painted: String,
    paint_count: u64,
}

impl LineBuffer {
    pub fn new(modality: InputModality) -> Self {
        let mut buffer = Self {
            state: InputState::default(),
            modality,
            repaint_pending: true,
            painted: String::new(),
            paint_count: 0,
        };
        buffer.painted = buffer.render();
        buffer
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn text(&self) -> &str {
        self.state.text()
    }

    pub fn caret(&self) -> usize {
        self.state.caret()
    }

    pub fn is_composing(&self) -> bool {
        self.state.composing
    }

    pub fn modality(&self) -> InputModality {
        self.modality
    }

    pub fn insert(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let at = self.state.byte_index(self.state.caret);
        self.state.raw_text.insert_str(at, s);
        self.state.caret += s.chars().count();
        self.request_repaint();
    }

    /// Delete the char before the caret
    pub fn backspace(&mut self) {
        if self.state.caret == 0 {
            return;
        }
        let at = self.state.byte_index(self.state.caret - 1);
        self.state.raw_text.remove(at);
        self.state.caret -= 1;
        self.request_repaint();
    }

    /// Delete the char under the caret
    pub fn delete(&mut self) {
        if self.state.caret >= self.state.char_len() {
            return;
        }
        let at = self.state.byte_index(self.state.caret);
        self.state.raw_text.remove(at);
        self.request_repaint();
    }

    pub fn move_left(&mut self) {
        let caret = self.state.caret.saturating_sub(1);
        self.set_caret(caret);
    }

    pub fn move_right(&mut self) {
        let caret = self.state.caret + 1;
        self.set_caret(caret);
    }

    pub fn move_home(&mut self) {
        self.set_caret(0);
    }

    pub fn move_end(&mut self) {
        let end = self.state.char_len();
        self.set_caret(end);
    }

    /// Place the caret (selection event); clamped to the text length
    pub fn set_caret(&mut self, offset: usize) {
        self.state.caret = offset.min(self.state.char_len());
        self.request_repaint();
    }

    /// Replace the whole line and put the caret at its end
    pub fn set_text(&mut self, text: &str) {
        self.state.raw_text = text.to_string();
        self.state.caret = self.state.char_len();
        self.request_repaint();
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    /// Start of a multi-keystroke composition; repaints are held until it ends
    pub fn begin_composition(&mut self) {
        self.state.composing = true;
    }

    /// End of composition: insert the committed text and repaint once
    pub fn end_composition(&mut self, committed: &str) {
        self.state.composing = false;
        self.insert_str(committed);
        self.request_repaint();
    }

    pub fn request_repaint(&mut self) {
        self.repaint_pending = true;
    }

    pub fn repaint_pending(&self) -> bool {
        self.repaint_pending
    }

    /// Perform the pending repaint, if any. Returns true when a paint happened.
    pub fn take_repaint(&mut self) -> bool {
        if !self.repaint_pending || self.state.composing {
            return false;
        }
        self.painted = self.render();
        self.repaint_pending = false;
        self.paint_count += 1;
        true
    }

    /// Markup from the last paint
    pub fn painted(&self) -> &str {
        &self.painted
    }

    /// Number of paints performed so far
    pub fn paint_count(&self) -> u64 {
        self.paint_count
    }

    /// Render the current state. Pure: same state, same markup.
    pub fn render(&self) -> String {
        let text = self.state.text();
        let split = match self.modality {
            InputModality::Keyboard => self.state.byte_index(self.state.caret),
            InputModality::Touch => text.len(),
        };
        let (before, after) = text.split_at(split);
        format!("{}{}{}", escape_html(before), CARET_MARKUP, escape_html(after))
    }
}
