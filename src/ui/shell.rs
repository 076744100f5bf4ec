//! Interactive shell state: the session, the entry field, shortcut focus and
//! history scrolling.
//!
//! Input handlers never call the network themselves. An accepted question
//! comes back as a [`PendingCompletion`] for the event loop to run, and the
//! result is fed back in through [`ChatShell::resolve`].

use std::sync::Arc;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tui_textarea::TextArea;

use crate::core::completion::CompletionClient;
use crate::core::constants::CONFIGURATION_ERROR_MESSAGE;
use crate::core::conversation::{ConversationController, PendingCompletion};
use crate::core::message::Message;
use crate::core::state_machine::Outcome;
use crate::core::syllabus::SyllabusContext;
use crate::core::transcript::Transcript;
use crate::ui::shortcuts::{button_at, shortcut_labels};

const WHEEL_LINES: u16 = 3;

/// What the shell is connected to.
pub enum Session {
    Ready(ConversationController),
    /// No credential at startup. Shows a fixed notice and never accepts input.
    Unavailable(Transcript),
}

impl Session {
    /// Greets when a client is available, otherwise shows the configuration
    /// notice with no shortcuts.
    pub fn start(client: Option<Arc<dyn CompletionClient>>, context: Arc<SyllabusContext>) -> Self {
        match client {
            Some(client) => {
                let mut controller = ConversationController::new(client, context);
                controller.greet();
                Session::Ready(controller)
            }
            None => Session::unavailable(),
        }
    }

    pub fn unavailable() -> Self {
        let mut transcript = Transcript::new();
        transcript.push(Message::assistant(CONFIGURATION_ERROR_MESSAGE));
        Session::Unavailable(transcript)
    }

    pub fn transcript(&self) -> &Transcript {
        match self {
            Session::Ready(controller) => controller.transcript(),
            Session::Unavailable(transcript) => transcript,
        }
    }

    pub fn input_enabled(&self) -> bool {
        match self {
            Session::Ready(controller) => controller.input_enabled(),
            Session::Unavailable(_) => false,
        }
    }

    pub fn shortcuts_visible(&self) -> bool {
        matches!(self, Session::Ready(_))
    }

    pub fn is_awaiting(&self) -> bool {
        self.transcript().has_pending()
    }

    pub fn model_id(&self) -> Option<&str> {
        match self {
            Session::Ready(controller) => Some(controller.model_id()),
            Session::Unavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Shortcuts,
}

/// Scroll position of the history panel, in wrapped rows from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryScroll {
    offset: u16,
    max_offset: u16,
    follow: bool,
    seen_revision: Option<u64>,
}

impl Default for HistoryScroll {
    fn default() -> Self {
        Self {
            offset: 0,
            max_offset: 0,
            follow: true,
            seen_revision: None,
        }
    }
}

impl HistoryScroll {
    /// Reconcile with the current content and return the offset to draw at.
    /// Any transcript change snaps back to the newest message.
    pub fn fit(&mut self, revision: u64, max_offset: u16) -> u16 {
        if self.seen_revision != Some(revision) {
            self.seen_revision = Some(revision);
            self.follow = true;
        }
        self.max_offset = max_offset;
        self.offset = if self.follow {
            max_offset
        } else {
            self.offset.min(max_offset)
        };
        self.offset
    }

    pub fn up(&mut self, lines: u16) {
        self.follow = false;
        self.offset = self.offset.min(self.max_offset).saturating_sub(lines);
    }

    pub fn down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines);
        if self.offset >= self.max_offset {
            self.offset = self.max_offset;
            self.follow = true;
        }
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }
}

/// Screen regions from the last draw, used for mouse hit tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellLayout {
    pub history: Rect,
    pub shortcuts: Vec<Rect>,
    pub input: Rect,
}

pub struct ChatShell {
    session: Session,
    textarea: TextArea<'static>,
    focus: Focus,
    selected_shortcut: usize,
    scroll: HistoryScroll,
    layout: ShellLayout,
    frame: usize,
    exit_requested: bool,
}

impl ChatShell {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            textarea: TextArea::default(),
            focus: Focus::Input,
            selected_shortcut: 0,
            scroll: HistoryScroll::default(),
            layout: ShellLayout::default(),
            frame: 0,
            exit_requested: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_shortcut(&self) -> usize {
        self.selected_shortcut
    }

    pub fn scroll_mut(&mut self) -> &mut HistoryScroll {
        &mut self.scroll
    }

    pub fn scroll(&self) -> &HistoryScroll {
        &self.scroll
    }

    pub fn set_layout(&mut self, layout: ShellLayout) {
        self.layout = layout;
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advance the pending animation. Returns `true` when a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if !self.session.is_awaiting() {
            return false;
        }
        self.frame = self.frame.wrapping_add(1);
        true
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PendingCompletion> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => {
                self.exit_requested = true;
                None
            }
            KeyCode::Esc => {
                self.exit_requested = true;
                None
            }
            KeyCode::F(n @ 1..=5) => self.activate_shortcut(usize::from(n - 1)),
            KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_focus();
                None
            }
            KeyCode::PageUp => {
                self.scroll.up(self.page_rows());
                None
            }
            KeyCode::PageDown => {
                self.scroll.down(self.page_rows());
                None
            }
            KeyCode::Up => {
                self.scroll.up(1);
                None
            }
            KeyCode::Down => {
                self.scroll.down(1);
                None
            }
            _ => match self.focus {
                Focus::Shortcuts => self.handle_shortcut_key(key),
                Focus::Input => self.handle_input_key(key),
            },
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<PendingCompletion> {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.scroll.up(WHEEL_LINES);
                None
            }
            MouseEventKind::ScrollDown => {
                self.scroll.down(WHEEL_LINES);
                None
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = button_at(&self.layout.shortcuts, mouse.column, mouse.row) {
                    return self.activate_shortcut(index);
                }
                if contains(self.layout.input, mouse.column, mouse.row) {
                    self.focus = Focus::Input;
                }
                None
            }
            _ => None,
        }
    }

    /// Bracketed paste goes into the field as a single line.
    pub fn handle_paste(&mut self, text: &str) {
        if !self.session.input_enabled() {
            return;
        }
        let flattened = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
        self.focus = Focus::Input;
        self.textarea.insert_str(flattened);
    }

    /// Submit the entry field. Blank text is ignored and left in place.
    pub fn submit_typed(&mut self) -> Option<PendingCompletion> {
        if !self.session.input_enabled() {
            return None;
        }
        let text = self.input_text();
        let pending = self.controller_mut()?.submit(&text)?;
        self.textarea = TextArea::default();
        Some(pending)
    }

    /// Trigger a prompt shortcut by index. No effect while input is disabled.
    pub fn activate_shortcut(&mut self, index: usize) -> Option<PendingCompletion> {
        if !self.session.shortcuts_visible() || !self.session.input_enabled() {
            return None;
        }
        let label = *shortcut_labels().get(index)?;
        self.selected_shortcut = index;
        self.controller_mut()?.submit(label)
    }

    /// Apply a finished completion and return focus to the entry field.
    pub fn resolve(&mut self, outcome: Outcome) {
        let Some(controller) = self.controller_mut() else {
            return;
        };
        controller.resolve(outcome);
        if controller.take_focus_request() {
            self.focus = Focus::Input;
        }
    }

    fn controller_mut(&mut self) -> Option<&mut ConversationController> {
        match &mut self.session {
            Session::Ready(controller) => Some(controller),
            Session::Unavailable(_) => None,
        }
    }

    fn toggle_focus(&mut self) {
        if !self.session.shortcuts_visible() {
            self.focus = Focus::Input;
            return;
        }
        self.focus = match self.focus {
            Focus::Input => Focus::Shortcuts,
            Focus::Shortcuts => Focus::Input,
        };
    }

    fn handle_shortcut_key(&mut self, key: KeyEvent) -> Option<PendingCompletion> {
        let count = shortcut_labels().len();
        match key.code {
            KeyCode::Left => {
                self.selected_shortcut = (self.selected_shortcut + count - 1) % count;
                None
            }
            KeyCode::Right => {
                self.selected_shortcut = (self.selected_shortcut + 1) % count;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_shortcut(self.selected_shortcut),
            KeyCode::Char(_) => {
                self.focus = Focus::Input;
                self.handle_input_key(key)
            }
            _ => None,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<PendingCompletion> {
        if !self.session.input_enabled() {
            return None;
        }
        if key.code == KeyCode::Enter {
            return self.submit_typed();
        }
        self.textarea.input(tui_textarea::Input::from(key));
        None
    }

    fn page_rows(&self) -> u16 {
        self.layout.history.height.saturating_sub(2).max(1)
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::test_support::ScriptedClient;
    use crate::core::constants::{GREETING, SERVICE_ERROR_MESSAGE};
    use crate::core::completion::{ServiceError, ServiceErrorKind};
    use crate::ui::shortcuts::layout_buttons;
    use ratatui::crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(shell: &mut ChatShell, text: &str) {
        for ch in text.chars() {
            shell.handle_key(key(KeyCode::Char(ch)));
        }
    }

    fn ready_shell(client: Arc<ScriptedClient>) -> ChatShell {
        ChatShell::new(Session::start(
            Some(client),
            Arc::new(SyllabusContext::builtin()),
        ))
    }

    fn contents(shell: &ChatShell) -> Vec<(String, String)> {
        shell
            .session()
            .transcript()
            .messages()
            .iter()
            .map(|m| (m.sender.as_str().to_string(), m.content.clone()))
            .collect()
    }

    #[test]
    fn startup_with_client_greets_and_shows_shortcuts() {
        let shell = ready_shell(Arc::new(ScriptedClient::answering("unused")));

        assert_eq!(
            shell.session().transcript().messages(),
            &[Message::assistant(GREETING)]
        );
        assert!(shell.session().shortcuts_visible());
        assert!(shell.session().input_enabled());
        assert_eq!(shell.session().model_id(), Some("scripted"));
    }

    #[test]
    fn startup_without_client_shows_only_the_notice() {
        let mut shell = ChatShell::new(Session::start(None, Arc::new(SyllabusContext::builtin())));

        assert_eq!(
            shell.session().transcript().messages(),
            &[Message::assistant(CONFIGURATION_ERROR_MESSAGE)]
        );
        assert!(!shell.session().shortcuts_visible());
        assert!(!shell.session().input_enabled());

        type_text(&mut shell, "Course schedule");
        assert!(shell.handle_key(key(KeyCode::Enter)).is_none());
        assert!(shell.activate_shortcut(0).is_none());
        shell.handle_paste("pasted");
        assert_eq!(shell.input_text(), "");
        assert_eq!(shell.session().transcript().len(), 1);
    }

    #[tokio::test]
    async fn shortcut_and_typed_question_produce_the_same_messages() {
        let answer = "Mr. Lee Scarborough, lscarborough@escc.edu";

        let mut typed = ready_shell(Arc::new(ScriptedClient::answering(answer)));
        type_text(&mut typed, "Instructor contact");
        let pending = typed.handle_key(key(KeyCode::Enter)).expect("typed accepted");
        assert_eq!(typed.input_text(), "");
        typed.resolve(pending.run().await);

        let mut clicked = ready_shell(Arc::new(ScriptedClient::answering(answer)));
        let pending = clicked.activate_shortcut(0).expect("shortcut accepted");
        clicked.resolve(pending.run().await);

        assert_eq!(contents(&typed), contents(&clicked));
        assert_eq!(
            contents(&typed).last(),
            Some(&("ai".to_string(), answer.to_string()))
        );
    }

    #[test]
    fn input_is_disabled_while_awaiting() {
        let mut shell = ready_shell(Arc::new(ScriptedClient::answering("unused")));

        let _pending = shell.activate_shortcut(3).expect("accepted");
        assert!(!shell.session().input_enabled());
        assert!(shell.session().is_awaiting());

        assert!(shell.activate_shortcut(1).is_none());
        assert!(shell.handle_key(key(KeyCode::F(2))).is_none());
        type_text(&mut shell, "more");
        assert_eq!(shell.input_text(), "");
        assert!(shell.submit_typed().is_none());
        assert_eq!(shell.session().transcript().pending_count(), 1);
    }

    #[test]
    fn blank_entry_is_ignored_and_kept() {
        let mut shell = ready_shell(Arc::new(ScriptedClient::answering("unused")));
        type_text(&mut shell, "   ");

        assert!(shell.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(shell.input_text(), "   ");
        assert_eq!(shell.session().transcript().len(), 1);
    }

    #[tokio::test]
    async fn failure_restores_input_and_focus() {
        let client = Arc::new(ScriptedClient::new([Err(ServiceError::new(
            ServiceErrorKind::RateLimit,
            "quota",
        ))]));
        let mut shell = ready_shell(client);

        shell.handle_key(key(KeyCode::Tab));
        assert_eq!(shell.focus(), Focus::Shortcuts);
        shell.handle_key(key(KeyCode::Right));
        let pending = shell.handle_key(key(KeyCode::Enter)).expect("accepted");
        assert_eq!(pending.question(), "Course materials");

        shell.resolve(pending.run().await);

        assert_eq!(shell.focus(), Focus::Input);
        assert!(shell.session().input_enabled());
        assert_eq!(
            shell.session().transcript().last(),
            Some(&Message::assistant(SERVICE_ERROR_MESSAGE))
        );
    }

    #[test]
    fn shortcut_selection_wraps() {
        let mut shell = ready_shell(Arc::new(ScriptedClient::answering("unused")));
        shell.handle_key(key(KeyCode::Tab));
        shell.handle_key(key(KeyCode::Left));
        assert_eq!(shell.selected_shortcut(), 4);
        shell.handle_key(key(KeyCode::Right));
        assert_eq!(shell.selected_shortcut(), 0);
    }

    #[test]
    fn mouse_click_hits_shortcut_buttons() {
        let mut shell = ready_shell(Arc::new(ScriptedClient::answering("unused")));
        shell.set_layout(ShellLayout {
            history: Rect::new(0, 0, 120, 20),
            shortcuts: layout_buttons(Rect::new(0, 20, 120, 1), shortcut_labels()),
            input: Rect::new(0, 21, 120, 3),
        });

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 25,
            row: 20,
            modifiers: KeyModifiers::NONE,
        };
        let pending = shell.handle_mouse(click).expect("click accepted");
        assert_eq!(pending.question(), "Course materials");
    }

    #[test]
    fn key_release_and_escape() {
        let mut shell = ready_shell(Arc::new(ScriptedClient::answering("unused")));
        let release = KeyEvent {
            code: KeyCode::Esc,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        shell.handle_key(release);
        assert!(!shell.exit_requested());

        shell.handle_key(key(KeyCode::Esc));
        assert!(shell.exit_requested());
    }

    #[test]
    fn scroll_follows_new_messages_until_user_scrolls_up() {
        let mut scroll = HistoryScroll::default();
        assert_eq!(scroll.fit(1, 10), 10);

        scroll.up(4);
        assert_eq!(scroll.fit(1, 12), 6);
        assert!(!scroll.is_following());

        scroll.down(20);
        assert!(scroll.is_following());
        assert_eq!(scroll.fit(1, 12), 12);

        scroll.up(2);
        assert_eq!(scroll.fit(2, 15), 15);
    }

    #[test]
    fn tick_only_animates_while_awaiting() {
        let mut shell = ready_shell(Arc::new(ScriptedClient::answering("unused")));
        assert!(!shell.tick());
        let _pending = shell.activate_shortcut(0);
        assert!(shell.tick());
        assert_eq!(shell.frame(), 1);
    }
}
