//! Terminal styles for bookshop status lines and search results

use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    /// Whether any style actually emits escape codes
    pub colored: bool,
    /// Section titles and the init banner
    pub heading: Style,
    /// Committed loads, schema reset done
    pub done: Style,
    /// Destructive-operation notices
    pub caution: Style,
    /// Labels in front of values (`Database:`, `Config:`)
    pub label: Style,
    /// The line printed when a publisher search finds no sales
    pub no_sales: Style,
}

impl Theme {
    /// Colors only on a terminal, and never when `NO_COLOR` is set
    pub fn detect() -> Self {
        Self::select(
            console::Term::stdout().is_term(),
            std::env::var_os("NO_COLOR").is_some(),
        )
    }

    pub fn select(is_term: bool, no_color: bool) -> Self {
        if is_term && !no_color {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            colored: true,
            heading: Style::new().cyan().bold(),
            done: Style::new().green().bold(),
            caution: Style::new().yellow().bold(),
            label: Style::new().white().dimmed(),
            no_sales: Style::new().red(),
        }
    }

    pub fn plain() -> Self {
        Self {
            colored: false,
            heading: Style::new(),
            done: Style::new(),
            caution: Style::new(),
            label: Style::new(),
            no_sales: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_select() {
        assert!(Theme::select(true, false).colored);
        assert!(!Theme::select(true, true).colored);
        assert!(!Theme::select(false, false).colored);
    }

    #[test]
    fn test_plain_theme_emits_no_escapes() {
        let theme = Theme::plain();
        let line = format!("{}", "Nobody bought it".style(theme.no_sales));
        assert_eq!(line, "Nobody bought it");

        let colored = format!("{}", "Nobody bought it".style(Theme::colored().no_sales));
        assert!(colored.contains('\u{1b}'));
    }
}
