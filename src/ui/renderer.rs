use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::message::Message;
use crate::ui::markdown::render_message_lines;
use crate::ui::shell::{ChatShell, Focus, ShellLayout};
use crate::ui::shortcuts::{button_text, layout_buttons, rows_needed, shortcut_labels};
use crate::ui::theme::Theme;
use crate::ui::wrap::wrap_lines;

/// Unwrapped history: every message followed by a blank spacer line.
pub fn history_lines(messages: &[Message], theme: &Theme, frame: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        lines.extend(render_message_lines(message, theme, frame));
        lines.push(Line::default());
    }
    lines
}

fn history_title(shell: &ChatShell) -> String {
    match shell.session().model_id() {
        Some(model) => format!("Syllabot v{} - {}", env!("CARGO_PKG_VERSION"), model),
        None => format!("Syllabot v{}", env!("CARGO_PKG_VERSION")),
    }
}

fn input_title(shell: &ChatShell) -> &'static str {
    let session = shell.session();
    if !session.shortcuts_visible() {
        "Chat unavailable (Esc to quit)"
    } else if !session.input_enabled() {
        "Waiting for an answer... (Esc to quit)"
    } else if shell.focus() == Focus::Shortcuts {
        "Shortcuts: ←/→ to choose, Enter to ask, Tab to type"
    } else {
        "Ask about the course (Enter to send, F1-F5 or Tab for shortcuts, Esc to quit)"
    }
}

pub fn ui(f: &mut Frame, shell: &mut ChatShell, theme: &Theme) {
    let area = f.area();
    let labels = shortcut_labels();
    let shortcut_height = if shell.session().shortcuts_visible() {
        rows_needed(area.width, labels)
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(shortcut_height),
            Constraint::Length(3),
        ])
        .split(area);

    // History
    let history_block = Block::default().title(Span::styled(history_title(shell), theme.title_style));
    let history_inner = history_block.inner(chunks[0]);
    let lines = history_lines(
        shell.session().transcript().messages(),
        theme,
        shell.frame(),
    );
    let wrapped = wrap_lines(&lines, usize::from(history_inner.width));
    let total = u16::try_from(wrapped.len()).unwrap_or(u16::MAX);
    let max_offset = total.saturating_sub(history_inner.height);
    let revision = shell.session().transcript().revision();
    let offset = shell.scroll_mut().fit(revision, max_offset);

    f.render_widget(history_block, chunks[0]);
    f.render_widget(Paragraph::new(wrapped).scroll((offset, 0)), history_inner);

    // Shortcut buttons
    let button_rects = if shortcut_height > 0 {
        layout_buttons(chunks[1], labels)
    } else {
        Vec::new()
    };
    let enabled = shell.session().input_enabled();
    for (index, (label, rect)) in labels.iter().zip(&button_rects).enumerate() {
        let style = if !enabled {
            theme.button_disabled_style
        } else if shell.focus() == Focus::Shortcuts && shell.selected_shortcut() == index {
            theme.button_focused_style
        } else {
            theme.button_style
        };
        f.render_widget(Paragraph::new(Span::styled(button_text(label), style)), *rect);
    }

    // Input
    let title = input_title(shell);
    let (text_style, cursor_style) = if enabled {
        (
            theme.input_text_style,
            if shell.focus() == Focus::Input {
                theme.input_cursor_style
            } else {
                theme.input_text_style
            },
        )
    } else {
        (theme.input_disabled_style, theme.input_disabled_style)
    };
    let border_style = if enabled {
        theme.input_border_style
    } else {
        theme.input_disabled_style
    };

    let textarea = shell.textarea_mut();
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    textarea.set_style(text_style);
    textarea.set_cursor_style(cursor_style);
    textarea.set_cursor_line_style(text_style);
    f.render_widget(shell.textarea(), chunks[2]);

    shell.set_layout(ShellLayout {
        history: chunks[0],
        shortcuts: button_rects,
        input: chunks[2],
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::test_support::ScriptedClient;
    use crate::core::constants::GREETING;
    use crate::core::syllabus::SyllabusContext;
    use crate::ui::shell::Session;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::sync::Arc;

    fn screen_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw(shell: &mut ChatShell, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = Theme::monochrome();
        terminal.draw(|f| ui(f, shell, &theme)).unwrap();
        screen_text(terminal.backend().buffer())
    }

    fn ready_shell() -> ChatShell {
        ChatShell::new(Session::start(
            Some(Arc::new(ScriptedClient::answering("unused"))),
            Arc::new(SyllabusContext::builtin()),
        ))
    }

    #[test]
    fn ready_screen_shows_greeting_shortcuts_and_input() {
        let mut shell = ready_shell();
        let screen = draw(&mut shell, 160, 20);

        assert!(screen.contains("Syllabot v"));
        assert!(screen.contains("scripted"));
        assert!(screen.contains(&GREETING[..19]));
        assert!(screen.contains("[ Instructor contact ]"));
        assert!(screen.contains("[ Proctoring requirements ]"));
        assert!(screen.contains("Ask about the course"));
    }

    #[test]
    fn unavailable_screen_has_no_shortcuts() {
        let mut shell = ChatShell::new(Session::unavailable());
        let screen = draw(&mut shell, 100, 12);

        assert!(screen.contains("Error: API_KEY is not set."));
        assert!(!screen.contains("Instructor contact"));
        assert!(screen.contains("Chat unavailable"));
    }

    #[test]
    fn draw_records_layout_for_mouse_hits() {
        let mut shell = ready_shell();
        draw(&mut shell, 160, 20);

        let question = shell
            .handle_mouse(ratatui::crossterm::event::MouseEvent {
                kind: ratatui::crossterm::event::MouseEventKind::Down(
                    ratatui::crossterm::event::MouseButton::Left,
                ),
                column: 2,
                row: 16,
                modifiers: ratatui::crossterm::event::KeyModifiers::NONE,
            })
            .map(|pending| pending.question().to_string());
        assert_eq!(question.as_deref(), Some("Instructor contact"));
    }

    #[test]
    fn long_history_is_scrolled_to_the_newest_message() {
        let mut shell = ready_shell();
        for _ in 0..3 {
            let pending = shell.activate_shortcut(3);
            assert!(pending.is_some());
            shell.resolve(crate::core::state_machine::Outcome::Answer(
                "line one\n\nline two\n\nline three\n\nthe end".to_string(),
            ));
        }

        let screen = draw(&mut shell, 80, 14);
        assert!(screen.contains("the end"));
        assert!(shell.scroll().is_following());
        assert!(shell.scroll().offset() > 0);
    }
}
