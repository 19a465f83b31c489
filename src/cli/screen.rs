// Crossterm front-end
//
// Owns the alternate screen while the terminal runs. Each render clears the
// screen and paints either the transcript plus prompt line, or the cartridge
// surface, in the active theme's colours.

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, disable_raw_mode, enable_raw_mode, BeginSynchronizedUpdate, Clear, ClearType,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use tokio::sync::mpsc::UnboundedSender;

use crate::config::Theme;
use crate::terminal::{Frontend, MediaState, TerminalEvent, TerminalSession};

use super::render::{markup_to_lines, SpanStyle, StyledLine};

/// Raw mode plus alternate screen, restored on drop
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            cursor::Hide
        )
        .context("Failed to enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}

fn color(hex: &str) -> Color {
    match Theme::rgb(hex) {
        Some((r, g, b)) => Color::Rgb { r, g, b },
        None => Color::Reset,
    }
}

fn span_color(theme: &Theme, style: SpanStyle) -> Color {
    match style {
        SpanStyle::Plain => color(theme.fg),
        SpanStyle::Accent | SpanStyle::Link => color(theme.accent),
        SpanStyle::Dim => color(theme.dim),
        SpanStyle::Cursor | SpanStyle::Error => color(theme.cursor),
    }
}

/// Lines the terminal region shows, oldest first
pub fn terminal_lines(session: &TerminalSession) -> Vec<StyledLine> {
    let mut lines: Vec<StyledLine> = session
        .transcript()
        .lines()
        .flat_map(|line| markup_to_lines(&line.markup, line.style))
        .collect();

    if session.surfaces().input_visible {
        let prompt = crate::terminal::escape_html(session.prompt());
        let input = format!("{}{}", prompt, session.input_markup());
        lines.extend(markup_to_lines(&input, crate::terminal::LineStyle::Plain));
    }
    lines
}

/// Lines the cartridge region shows
pub fn cartridge_lines(session: &TerminalSession) -> Vec<String> {
    let (status, media) = match &session.surfaces().media {
        MediaState::Idle => return Vec::new(),
        MediaState::Loading(media) => ("Loading...", media),
        MediaState::Playing(media) => ("Playing", media),
    };
    vec![
        format!("▶ CARTRIDGE: {}", media.name),
        media.url.clone(),
        status.to_string(),
        String::new(),
        "Press Esc to eject".to_string(),
    ]
}

pub struct CrosstermFrontend {
    events: UnboundedSender<TerminalEvent>,
    media_reported: bool,
}

impl CrosstermFrontend {
    pub fn new(events: UnboundedSender<TerminalEvent>) -> Self {
        Self {
            events,
            media_reported: false,
        }
    }

    fn draw_terminal(
        &self,
        out: &mut impl Write,
        session: &TerminalSession,
        cols: u16,
        rows: u16,
    ) -> Result<()> {
        let theme = session.theme();
        let lines = terminal_lines(session);
        let start = lines.len().saturating_sub(rows as usize);

        for (row, line) in lines[start..].iter().enumerate() {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            let mut remaining = cols as usize;
            for span in &line.spans {
                if remaining == 0 {
                    break;
                }
                let text: String = span.text.chars().take(remaining).collect();
                remaining -= text.chars().count();

                queue!(out, SetForegroundColor(span_color(theme, span.style)))?;
                if span.style == SpanStyle::Link {
                    queue!(
                        out,
                        SetAttribute(Attribute::Underlined),
                        Print(text),
                        SetAttribute(Attribute::NoUnderline)
                    )?;
                } else {
                    queue!(out, Print(text))?;
                }
            }
        }
        Ok(())
    }

    fn draw_cartridge(
        &self,
        out: &mut impl Write,
        session: &TerminalSession,
        cols: u16,
        rows: u16,
    ) -> Result<()> {
        let theme = session.theme();
        let lines = cartridge_lines(session);
        let top = (rows as usize).saturating_sub(lines.len()) / 2;

        for (i, line) in lines.iter().enumerate() {
            let width = line.chars().count().min(cols as usize);
            let left = (cols as usize).saturating_sub(width) / 2;
            let text: String = line.chars().take(cols as usize).collect();
            let fg = if i == 0 { theme.accent } else { theme.dim };
            queue!(
                out,
                cursor::MoveTo(left as u16, (top + i) as u16),
                SetForegroundColor(color(fg)),
                Print(text)
            )?;
        }
        Ok(())
    }
}

impl Frontend for CrosstermFrontend {
    fn render(&mut self, session: &TerminalSession) -> Result<()> {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        let theme = session.theme();
        let mut out = io::stdout();

        queue!(
            out,
            BeginSynchronizedUpdate,
            SetBackgroundColor(color(theme.bg)),
            Clear(ClearType::All)
        )?;

        if session.surfaces().cartridge_visible {
            self.draw_cartridge(&mut out, session, cols, rows)?;
        } else {
            self.draw_terminal(&mut out, session, cols, rows)?;
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush().context("Failed to flush terminal output")?;

        // The media surface is a static card here, so it is ready once painted
        match &session.surfaces().media {
            MediaState::Loading(_) if !self.media_reported => {
                self.media_reported = true;
                let _ = self.events.send(TerminalEvent::MediaLoaded);
            }
            MediaState::Idle => self.media_reported = false,
            _ => {}
        }
        Ok(())
    }
}
