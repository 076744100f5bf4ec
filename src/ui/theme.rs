use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub pending_dot_style: Style,
    pub pending_dot_active_style: Style,

    // Markdown
    pub md_heading_style: Style,
    pub md_link_style: Style,
    pub md_link_url_style: Style,
    pub md_inline_code_style: Style,
    pub md_code_block_style: Style,
    pub md_list_marker_style: Style,
    pub md_rule_style: Style,

    // Chrome
    pub title_style: Style,
    pub input_border_style: Style,
    pub input_disabled_style: Style,
    pub input_text_style: Style,
    pub input_cursor_style: Style,

    // Shortcut buttons
    pub button_style: Style,
    pub button_focused_style: Style,
    pub button_disabled_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            pending_dot_style: Style::default().fg(Color::DarkGray),
            pending_dot_active_style: Style::default().fg(Color::White),

            md_heading_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            md_link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            md_link_url_style: Style::default().fg(Color::DarkGray),
            md_inline_code_style: Style::default().fg(Color::Yellow),
            md_code_block_style: Style::default().fg(Color::Gray),
            md_list_marker_style: Style::default().fg(Color::LightBlue),
            md_rule_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::Gray),
            input_border_style: Style::default().fg(Color::Gray),
            input_disabled_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),

            button_style: Style::default().fg(Color::White),
            button_focused_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            button_disabled_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn light() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            pending_dot_style: Style::default().fg(Color::Gray),
            pending_dot_active_style: Style::default().fg(Color::Black),

            md_heading_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            md_link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            md_link_url_style: Style::default().fg(Color::DarkGray),
            md_inline_code_style: Style::default().fg(Color::Magenta),
            md_code_block_style: Style::default().fg(Color::DarkGray),
            md_list_marker_style: Style::default().fg(Color::Blue),
            md_rule_style: Style::default().fg(Color::Gray),

            title_style: Style::default().fg(Color::DarkGray),
            input_border_style: Style::default().fg(Color::Black),
            input_disabled_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::Black),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),

            button_style: Style::default().fg(Color::Black),
            button_focused_style: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            button_disabled_style: Style::default().fg(Color::Gray),
        }
    }

    /// Plain styles only, for piping `say` output.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Theme {
            user_prefix_style: bold,
            user_text_style: plain,
            assistant_text_style: plain,
            pending_dot_style: plain,
            pending_dot_active_style: bold,

            md_heading_style: bold,
            md_link_style: Style::default().add_modifier(Modifier::UNDERLINED),
            md_link_url_style: plain,
            md_inline_code_style: plain,
            md_code_block_style: plain,
            md_list_marker_style: plain,
            md_rule_style: plain,

            title_style: plain,
            input_border_style: plain,
            input_disabled_style: Style::default().add_modifier(Modifier::DIM),
            input_text_style: plain,
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),

            button_style: plain,
            button_focused_style: Style::default().add_modifier(Modifier::REVERSED),
            button_disabled_style: Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// Case-insensitive lookup of a built-in theme.
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "default" => Some(Self::dark_default()),
            "light" => Some(Self::light()),
            "mono" | "monochrome" => Some(Self::monochrome()),
            _ => None,
        }
    }

    /// Unknown names fall back to the dark theme with a warning.
    pub fn from_name(name: &str) -> Self {
        Self::named(name).unwrap_or_else(|| {
            warn!(theme = name, "unknown theme, using dark");
            Self::dark_default()
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_case_insensitive_with_dark_fallback() {
        assert_eq!(
            Theme::from_name("LIGHT").assistant_text_style,
            Theme::light().assistant_text_style
        );
        assert_eq!(
            Theme::from_name("solarized").assistant_text_style,
            Theme::dark_default().assistant_text_style
        );
    }

    #[test]
    fn named_rejects_unknown_themes() {
        assert!(Theme::named("solarized").is_none());
        assert!(Theme::named("").is_none());
        assert_eq!(
            Theme::named(" Dark ").map(|t| t.assistant_text_style),
            Some(Theme::dark_default().assistant_text_style)
        );
        assert!(Theme::named("default").is_some());
        assert!(Theme::named("Mono").is_some());
    }
}
