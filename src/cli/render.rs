// Markup to styled text
//
// Transcript and input markup is a small HTML subset. Block elements and
// `<br>` start new lines, the `accent`/`dim`/`cursor` classes and links map
// to span styles, and entities come back decoded.

use scraper::node::Node;
use scraper::{ElementRef, Html};

use crate::terminal::LineStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Plain,
    Accent,
    Dim,
    Cursor,
    Link,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }
}

fn base_style(style: LineStyle) -> SpanStyle {
    match style {
        LineStyle::Plain | LineStyle::Echo => SpanStyle::Plain,
        LineStyle::Accent => SpanStyle::Accent,
        LineStyle::Dim | LineStyle::Loading => SpanStyle::Dim,
        LineStyle::Error => SpanStyle::Error,
    }
}

struct LineBuilder {
    lines: Vec<StyledLine>,
    current: StyledLine,
}

impl LineBuilder {
    fn text(&mut self, text: &str, style: SpanStyle) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.span(first, style);
        }
        for part in parts {
            self.flush(true);
            self.span(part, style);
        }
    }

    fn span(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        match self.current.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.current.spans.push(StyledSpan {
                text: text.to_string(),
                style,
            }),
        }
    }

    /// End the current line; `force` keeps it even when empty
    fn flush(&mut self, force: bool) {
        if force || !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    fn walk(&mut self, element: ElementRef<'_>, inherited: SpanStyle) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.text(&text.text, inherited),
                Node::Element(el) => {
                    let Some(child_ref) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let style = if el.classes().any(|c| c == "cursor") {
                        SpanStyle::Cursor
                    } else if el.classes().any(|c| c == "accent") {
                        SpanStyle::Accent
                    } else if el.classes().any(|c| c == "dim") {
                        SpanStyle::Dim
                    } else if el.classes().any(|c| c == "error-box") {
                        SpanStyle::Error
                    } else if el.name() == "a" {
                        SpanStyle::Link
                    } else {
                        inherited
                    };

                    match el.name() {
                        "br" => self.flush(true),
                        "div" | "p" => {
                            self.flush(false);
                            self.walk(child_ref, style);
                            self.flush(false);
                        }
                        _ => self.walk(child_ref, style),
                    }
                }
                _ => {}
            }
        }
    }
}

/// Split markup into styled lines
pub fn markup_to_lines(markup: &str, style: LineStyle) -> Vec<StyledLine> {
    let fragment = Html::parse_fragment(markup);
    let mut builder = LineBuilder {
        lines: Vec::new(),
        current: StyledLine::default(),
    };
    builder.walk(fragment.root_element(), base_style(style));
    builder.flush(false);

    if builder.lines.is_empty() {
        builder.lines.push(StyledLine::default());
    }
    builder.lines
}

/// Markup as plain text, lines joined with '\n'
pub fn plain_text(markup: &str) -> String {
    markup_to_lines(markup, LineStyle::Plain)
        .iter()
        .map(StyledLine::text)
        .collect::<Vec<_>>()
        .join("\n")
}
