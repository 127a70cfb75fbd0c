// Cell glyphs and colors
// Colors are normalised to the Windows Terminal "Campbell" palette where the terminal allows it

use ratatui::style::{Color, Modifier, Style};
use term_color_support::ColorSupport;

use crate::xtm_board::CellHint;

/// Extends Ratatui's Color with capability-aware rendering
pub trait WTMatch {
    fn wtmatch(self) -> Color;
}

impl WTMatch for Color {
    fn wtmatch(self) -> Color {
        let support = ColorSupport::stdout();

        // ((R, G, B), ANSI_256_Index) for the colors the board uses
        let mapping = match self {
            Color::Gray => Some(((204, 204, 204), 250)),
            Color::DarkGray => Some(((118, 118, 118), 243)),
            Color::LightRed => Some(((231, 72, 86), 203)),
            Color::LightGreen => Some(((22, 198, 12), 46)),
            Color::LightYellow => Some(((249, 241, 165), 229)),
            Color::LightBlue => Some(((59, 120, 255), 63)),
            Color::Yellow => Some(((193, 156, 0), 178)),
            _ => None,
        };

        match mapping {
            Some((rgb, _)) if support.has_16m => Color::Rgb(rgb.0, rgb.1, rgb.2),
            Some((_, index256)) if support.has_256 => Color::Indexed(index256),
            _ => self,
        }
    }
}

/// How cells are drawn
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub ascii: bool,
    pub colors: bool,
}

impl Palette {
    /// Glyph for a cell hint
    pub fn glyph(&self, hint: CellHint) -> String {
        match hint {
            CellHint::Hidden => "-".to_string(),
            CellHint::Flag => (if self.ascii { "F" } else { "⚑" }).to_string(),
            CellHint::Bomb => (if self.ascii { "*" } else { "☼" }).to_string(),
            CellHint::Empty => " ".to_string(),
            CellHint::Number(n) => n.to_string(),
        }
    }

    /// Style for a cell hint: red bombs, yellow flags, blue numbers, green empties, gray hidden
    pub fn style(&self, hint: CellHint) -> Style {
        if !self.colors {
            return match hint {
                CellHint::Bomb | CellHint::Flag => Style::default().add_modifier(Modifier::BOLD),
                _ => Style::default(),
            };
        }
        let fg = match hint {
            CellHint::Bomb => Color::LightRed,
            CellHint::Flag => Color::LightYellow,
            CellHint::Number(_) => Color::LightBlue,
            CellHint::Empty => Color::LightGreen,
            CellHint::Hidden => Color::Gray,
        };
        Style::default().fg(fg.wtmatch())
    }

    /// Highlight for the cell or row currently being targeted
    pub fn cursor(&self) -> Style {
        if self.colors {
            Style::default().bg(Color::DarkGray.wtmatch())
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }

    /// Style of a notice line
    pub fn notice(&self, warning: bool) -> Style {
        match (self.colors, warning) {
            (true, true) => Style::default().fg(Color::LightRed.wtmatch()).add_modifier(Modifier::BOLD),
            (true, false) => Style::default().fg(Color::LightGreen.wtmatch()).add_modifier(Modifier::BOLD),
            (false, _) => Style::default().add_modifier(Modifier::BOLD),
        }
    }

    /// Style of menu keys and prompts
    pub fn key(&self) -> Style {
        if self.colors {
            Style::default().fg(Color::Yellow.wtmatch()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_glyphs_match_classic_symbols() {
        let p = Palette {
            ascii: true,
            colors: false,
        };
        assert_eq!(p.glyph(CellHint::Bomb), "*");
        assert_eq!(p.glyph(CellHint::Flag), "F");
        assert_eq!(p.glyph(CellHint::Hidden), "-");
        assert_eq!(p.glyph(CellHint::Empty), " ");
        assert_eq!(p.glyph(CellHint::Number(3)), "3");
    }

    #[test]
    fn uncolored_palette_has_no_foreground() {
        let p = Palette {
            ascii: false,
            colors: false,
        };
        assert_eq!(p.style(CellHint::Number(1)).fg, None);
        assert_eq!(p.glyph(CellHint::Flag), "⚑");
    }
}
