// Colour palettes for the terminal surface
//
// Each palette maps onto the five CSS-style variables the host applies
// (`--bg`, `--fg`, `--cursor`, `--accent`, `--dim`).

/// A named palette. Colours are `#rrggbb` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub bg: &'static str,
    pub fg: &'static str,
    pub cursor: &'static str,
    pub accent: &'static str,
    pub dim: &'static str,
}

/// Built-in palettes, in listing order.
pub const THEMES: &[Theme] = &[
    Theme {
        name: "dracula",
        bg: "#282a36",
        fg: "#f8f8f2",
        cursor: "#ff79c6",
        accent: "#bd93f9",
        dim: "#6272a4",
    },
    Theme {
        name: "catppuccin",
        bg: "#1e1e2e",
        fg: "#cdd6f4",
        cursor: "#f5e0dc",
        accent: "#cba6f7",
        dim: "#6c7086",
    },
    Theme {
        name: "solarized",
        bg: "#002b36",
        fg: "#839496",
        cursor: "#d33682",
        accent: "#268bd2",
        dim: "#586e75",
    },
];

pub const DEFAULT_THEME: &str = "dracula";

/// Case-insensitive palette lookup
pub fn find_theme(name: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Comma-separated palette names, for help and error lines
pub fn theme_names() -> String {
    THEMES.iter().map(|t| t.name).collect::<Vec<_>>().join(", ")
}

impl Theme {
    /// Variables the host applies when this palette becomes active
    pub fn css_variables(&self) -> [(&'static str, &'static str); 5] {
        [
            ("--bg", self.bg),
            ("--fg", self.fg),
            ("--cursor", self.cursor),
            ("--accent", self.accent),
            ("--dim", self.dim),
        ]
    }

    /// Parse a `#rrggbb` colour into RGB components
    pub fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}
