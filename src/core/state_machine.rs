//! Conversation state machine.
//!
//! Pure transitions: given a state and an event, produce the next state and
//! the ordered effects the controller must apply. No I/O happens here.
//!
//! Whether input is accepted is derived from the state alone, so entering
//! `AwaitingResponse` is what disables the entry field and returning to
//! `Idle` is what re-enables it.

use std::fmt;

use crate::core::completion::ServiceError;
use crate::core::constants::SERVICE_ERROR_MESSAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    /// Ready for a question; the entry field is enabled.
    #[default]
    Idle,
    /// One completion is outstanding; all input is refused.
    AwaitingResponse,
}

impl ConversationState {
    pub fn input_enabled(self) -> bool {
        self == ConversationState::Idle
    }
}

/// Result of one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answer(String),
    Failure(ServiceError),
}

impl From<Result<String, ServiceError>> for Outcome {
    fn from(result: Result<String, ServiceError>) -> Self {
        match result {
            Ok(answer) => Outcome::Answer(answer),
            Err(err) => Outcome::Failure(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Submit { question: String },
    Resolved(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AppendUser(String),
    AppendPending,
    RequestCompletion { question: String },
    RemovePending,
    AppendAssistant(String),
    /// The failure is carried for logging; the transcript gets the fixed text.
    ReportFailure(ServiceError),
    FocusInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ConversationState,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    EmptyQuestion,
    Busy,
    NotAwaiting,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::EmptyQuestion => write!(f, "question is empty"),
            TransitionError::Busy => write!(f, "a question is already awaiting an answer"),
            TransitionError::NotAwaiting => write!(f, "no question is awaiting an answer"),
        }
    }
}

impl std::error::Error for TransitionError {}

pub fn transition(state: ConversationState, event: Event) -> Result<Transition, TransitionError> {
    match (state, event) {
        (ConversationState::Idle, Event::Submit { question }) => {
            let question = question.trim();
            if question.is_empty() {
                return Err(TransitionError::EmptyQuestion);
            }
            Ok(Transition {
                next: ConversationState::AwaitingResponse,
                effects: vec![
                    Effect::AppendUser(question.to_string()),
                    Effect::AppendPending,
                    Effect::RequestCompletion {
                        question: question.to_string(),
                    },
                ],
            })
        }
        (ConversationState::AwaitingResponse, Event::Submit { .. }) => Err(TransitionError::Busy),
        (ConversationState::AwaitingResponse, Event::Resolved(outcome)) => {
            let mut effects = vec![Effect::RemovePending];
            match outcome {
                Outcome::Answer(answer) => effects.push(Effect::AppendAssistant(answer)),
                Outcome::Failure(err) => {
                    effects.push(Effect::ReportFailure(err));
                    effects.push(Effect::AppendAssistant(SERVICE_ERROR_MESSAGE.to_string()));
                }
            }
            effects.push(Effect::FocusInput);
            Ok(Transition {
                next: ConversationState::Idle,
                effects,
            })
        }
        (ConversationState::Idle, Event::Resolved(_)) => Err(TransitionError::NotAwaiting),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::ServiceErrorKind;

    fn submit(text: &str) -> Event {
        Event::Submit {
            question: text.to_string(),
        }
    }

    #[test]
    fn idle_submit_starts_a_cycle() {
        let result = transition(ConversationState::Idle, submit("  Course schedule \n")).unwrap();

        assert_eq!(result.next, ConversationState::AwaitingResponse);
        assert_eq!(
            result.effects,
            vec![
                Effect::AppendUser("Course schedule".to_string()),
                Effect::AppendPending,
                Effect::RequestCompletion {
                    question: "Course schedule".to_string()
                },
            ]
        );
    }

    #[test]
    fn blank_submit_is_rejected() {
        for blank in ["", "   ", "\n\t"] {
            assert_eq!(
                transition(ConversationState::Idle, submit(blank)),
                Err(TransitionError::EmptyQuestion)
            );
        }
    }

    #[test]
    fn submit_while_awaiting_is_rejected() {
        assert_eq!(
            transition(ConversationState::AwaitingResponse, submit("Course materials")),
            Err(TransitionError::Busy)
        );
    }

    #[test]
    fn answer_removes_placeholder_before_appending() {
        let result = transition(
            ConversationState::AwaitingResponse,
            Event::Resolved(Outcome::Answer("**Quizzes:** 30%".to_string())),
        )
        .unwrap();

        assert_eq!(result.next, ConversationState::Idle);
        assert_eq!(
            result.effects,
            vec![
                Effect::RemovePending,
                Effect::AppendAssistant("**Quizzes:** 30%".to_string()),
                Effect::FocusInput,
            ]
        );
    }

    #[test]
    fn failure_appends_fixed_message_and_reenables() {
        let err = ServiceError::new(ServiceErrorKind::RateLimit, "quota");
        let result = transition(
            ConversationState::AwaitingResponse,
            Event::Resolved(Outcome::Failure(err.clone())),
        )
        .unwrap();

        assert_eq!(result.next, ConversationState::Idle);
        assert_eq!(result.effects.first(), Some(&Effect::RemovePending));
        assert!(result.effects.contains(&Effect::ReportFailure(err)));
        assert!(result
            .effects
            .contains(&Effect::AppendAssistant(SERVICE_ERROR_MESSAGE.to_string())));
        assert_eq!(result.effects.last(), Some(&Effect::FocusInput));
    }

    #[test]
    fn resolve_while_idle_is_rejected() {
        assert_eq!(
            transition(
                ConversationState::Idle,
                Event::Resolved(Outcome::Answer("late".to_string()))
            ),
            Err(TransitionError::NotAwaiting)
        );
    }

    #[test]
    fn only_idle_accepts_input() {
        assert!(ConversationState::Idle.input_enabled());
        assert!(!ConversationState::AwaitingResponse.input_enabled());
    }
}
