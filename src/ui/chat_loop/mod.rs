//! Interactive chat loop.
//!
//! A reader task forwards terminal events over a channel. The loop owns the
//! [`ChatShell`], draws when something changed, and runs each accepted
//! question on its own task whose [`Outcome`] comes back over a second
//! channel. A ticker drives the pending-dots animation.

mod lifecycle;
mod setup;

use std::error::Error;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::core::config::Config;
use crate::core::conversation::PendingCompletion;
use crate::core::state_machine::Outcome;
use crate::ui::renderer::ui;
use crate::ui::shell::ChatShell;
use crate::ui::theme::Theme;

use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
pub use self::setup::bootstrap_session;

const EVENT_POLL: Duration = Duration::from_millis(50);
const DOT_FRAME: Duration = Duration::from_millis(400);

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(EVENT_POLL) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

fn spawn_completion(pending: PendingCompletion, outcome_tx: mpsc::UnboundedSender<Outcome>) {
    tokio::spawn(async move {
        let outcome = pending.run().await;
        if outcome_tx.send(outcome).is_err() {
            debug!("chat closed before the answer arrived");
        }
    });
}

/// Route one terminal event to the shell.
fn dispatch(shell: &mut ChatShell, event: Event) -> Option<PendingCompletion> {
    match event {
        Event::Key(key) => shell.handle_key(key),
        Event::Mouse(mouse) => shell.handle_mouse(mouse),
        Event::Paste(text) => {
            shell.handle_paste(&text);
            None
        }
        _ => None,
    }
}

pub async fn run_chat(config: Config, model: Option<String>) -> Result<(), Box<dyn Error>> {
    let session = bootstrap_session(&config, model.as_deref())?;
    let theme = config
        .theme
        .as_deref()
        .map(Theme::from_name)
        .unwrap_or_default();
    let mut shell = ChatShell::new(session);

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut shell, &theme).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    shell: &mut ChatShell,
    theme: &Theme,
) -> Result<(), Box<dyn Error>> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<Outcome>();
    let reader = spawn_event_reader(event_tx);

    let mut ticker = tokio::time::interval(DOT_FRAME);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut request_redraw = true;

    let result = loop {
        if shell.exit_requested() {
            break Ok(());
        }

        if request_redraw {
            if let Err(err) = terminal.draw(|f| ui(f, shell, theme)) {
                break Err(err.into());
            }
            request_redraw = false;
        }

        tokio::select! {
            Some(event) = event_rx.recv() => {
                if let Some(pending) = dispatch(shell, event) {
                    spawn_completion(pending, outcome_tx.clone());
                }
                request_redraw = true;
            }
            Some(outcome) = outcome_rx.recv() => {
                shell.resolve(outcome);
                request_redraw = true;
            }
            _ = ticker.tick() => {
                if shell.tick() {
                    request_redraw = true;
                }
            }
        }
    };

    reader.abort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::test_support::ScriptedClient;
    use crate::core::syllabus::SyllabusContext;
    use crate::ui::shell::Session;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;

    fn ready_shell(answer: &str) -> ChatShell {
        ChatShell::new(Session::start(
            Some(Arc::new(ScriptedClient::answering(answer))),
            Arc::new(SyllabusContext::builtin()),
        ))
    }

    #[tokio::test]
    async fn spawned_completion_reports_back_over_the_channel() {
        let mut shell = ready_shell("Forrester Hall 105");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let pending = dispatch(
            &mut shell,
            Event::Key(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE)),
        )
        .expect("F1 asks the first shortcut");
        spawn_completion(pending, tx);

        let outcome = rx.recv().await.expect("outcome delivered");
        shell.resolve(outcome);

        let last = shell.session().transcript().last().cloned();
        assert_eq!(last.map(|m| m.content), Some("Forrester Hall 105".to_string()));
        assert!(shell.session().input_enabled());
    }

    #[test]
    fn paste_and_resize_never_submit() {
        let mut shell = ready_shell("unused");

        assert!(dispatch(&mut shell, Event::Paste("Course\nschedule".to_string())).is_none());
        assert_eq!(shell.input_text(), "Course schedule");
        assert!(dispatch(&mut shell, Event::Resize(80, 24)).is_none());
        assert_eq!(shell.session().transcript().len(), 1);
    }
}
