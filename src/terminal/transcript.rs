// Transcript - the visible output log
//
// Append-only sequence of markup lines. The only in-place edit is replacing
// a loading line through its id once an asynchronous lookup resolves.

use std::collections::VecDeque;

use crate::config::constants::MAX_TRANSCRIPT_LINES;

/// Stable handle to a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(u64);

/// Presentation class of a line (maps to a CSS class)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    /// Echo of a submitted line
    Echo,
    Dim,
    Accent,
    Error,
    /// Transient placeholder while a lookup is in flight
    Loading,
}

impl LineStyle {
    pub fn class_name(&self) -> &'static str {
        match self {
            LineStyle::Plain => "",
            LineStyle::Echo => "echo",
            LineStyle::Dim => "dim",
            LineStyle::Accent => "accent",
            LineStyle::Error => "error",
            LineStyle::Loading => "loading",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub id: LineId,
    /// HTML-safe content
    pub markup: String,
    pub style: LineStyle,
}

pub struct Transcript {
    lines: VecDeque<OutputLine>,
    next_id: u64,
    dirty: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::with_capacity(64),
            next_id: 0,
            dirty: false,
        }
    }

    /// Append a line of markup, returning its id
    pub fn push(&mut self, markup: impl Into<String>, style: LineStyle) -> LineId {
        if self.lines.len() >= MAX_TRANSCRIPT_LINES {
            self.lines.pop_front();
        }

        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.push_back(OutputLine {
            id,
            markup: markup.into(),
            style,
        });
        self.dirty = true;
        id
    }

    /// Replace a line in place. Returns false when the line no longer exists.
    pub fn replace(&mut self, id: LineId, markup: impl Into<String>, style: LineStyle) -> bool {
        match self.lines.iter_mut().find(|line| line.id == id) {
            Some(line) => {
                line.markup = markup.into();
                line.style = style;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&OutputLine> {
        self.lines.back()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the transcript as `<div class="line ...">` blocks
    pub fn to_html(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                format!(
                    "<div class=\"line {}\">{}</div>",
                    line.style.class_name(),
                    line.markup
                )
            })
            .collect()
    }

    /// Whether anything changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_replace() {
        let mut transcript = Transcript::new();
        transcript.push("&gt; cp", LineStyle::Echo);
        let loading = transcript.push("Loading...", LineStyle::Loading);

        assert!(transcript.replace(loading, "Rank: expert", LineStyle::Plain));

        let lines: Vec<_> = transcript.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].markup, "Rank: expert");
        assert_eq!(lines[1].style, LineStyle::Plain);
    }

    #[test]
    fn test_replace_after_clear_is_rejected() {
        let mut transcript = Transcript::new();
        let loading = transcript.push("Loading...", LineStyle::Loading);
        transcript.clear();

        assert!(!transcript.replace(loading, "late result", LineStyle::Plain));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_ids_stay_unique_after_clear() {
        let mut transcript = Transcript::new();
        let first = transcript.push("a", LineStyle::Plain);
        transcript.clear();
        let second = transcript.push("b", LineStyle::Plain);

        assert_ne!(first, second);
        assert!(transcript.lines().all(|line| line.id != first));
    }

    #[test]
    fn test_bounded_buffer() {
        let mut transcript = Transcript::new();
        for i in 0..(MAX_TRANSCRIPT_LINES + 10) {
            transcript.push(format!("line {}", i), LineStyle::Plain);
        }

        assert_eq!(transcript.len(), MAX_TRANSCRIPT_LINES);
        assert_eq!(transcript.lines().next().unwrap().markup, "line 10");
    }

    #[test]
    fn test_dirty_flag() {
        let mut transcript = Transcript::new();
        assert!(!transcript.take_dirty());
        transcript.push("x", LineStyle::Dim);
        assert!(transcript.take_dirty());
        assert!(!transcript.take_dirty());
    }

    #[test]
    fn test_to_html() {
        let mut transcript = Transcript::new();
        transcript.push("hi", LineStyle::Dim);
        assert_eq!(transcript.to_html(), "<div class=\"line dim\">hi</div>");
    }
}
