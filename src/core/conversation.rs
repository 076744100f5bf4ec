//! Conversation controller.
//!
//! Owns the transcript and the [`ConversationState`], and drives one
//! request/response cycle at a time through [`transition`]. Event loops use
//! the split [`ConversationController::submit`] / [`ConversationController::resolve`]
//! pair so the completion can run on its own task; headless callers use
//! [`ConversationController::ask`].

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::core::completion::CompletionClient;
use crate::core::constants::GREETING;
use crate::core::message::Message;
use crate::core::state_machine::{
    transition, ConversationState, Effect, Event, Outcome, TransitionError,
};
use crate::core::syllabus::SyllabusContext;
use crate::core::transcript::Transcript;

/// A completion that has been accepted by the controller but not yet run.
pub struct PendingCompletion {
    question: String,
    system_instruction: String,
    client: Arc<dyn CompletionClient>,
}

impl PendingCompletion {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Perform the external call. Never panics on service failure; every
    /// failure comes back as [`Outcome::Failure`].
    pub async fn run(self) -> Outcome {
        let started = Instant::now();
        let result = self
            .client
            .complete(&self.question, &self.system_instruction)
            .await;
        let elapsed_ms = started.elapsed().as_millis();

        match &result {
            Ok(answer) => info!(
                model = %self.client.model_id(),
                duration_ms = %elapsed_ms,
                answer_len = answer.len(),
                "completion finished"
            ),
            Err(err) => warn!(
                model = %self.client.model_id(),
                duration_ms = %elapsed_ms,
                kind = err.kind.as_str(),
                error = %err.message,
                "completion failed"
            ),
        }

        Outcome::from(result)
    }
}

pub struct ConversationController {
    state: ConversationState,
    transcript: Transcript,
    client: Arc<dyn CompletionClient>,
    context: Arc<SyllabusContext>,
    focus_requested: bool,
}

impl ConversationController {
    pub fn new(client: Arc<dyn CompletionClient>, context: Arc<SyllabusContext>) -> Self {
        Self {
            state: ConversationState::Idle,
            transcript: Transcript::new(),
            client,
            context,
            focus_requested: false,
        }
    }

    /// Append the canned greeting as the first assistant message.
    pub fn greet(&mut self) {
        self.transcript.push(Message::assistant(GREETING));
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn input_enabled(&self) -> bool {
        self.state.input_enabled()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model_id(&self) -> &str {
        self.client.model_id()
    }

    /// Returns `true` once after each finished cycle.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// First half of a cycle: record the question and show the placeholder.
    ///
    /// Returns `None` (and changes nothing) for blank questions or while a
    /// previous question is still awaiting its answer.
    pub fn submit(&mut self, question: &str) -> Option<PendingCompletion> {
        let event = Event::Submit {
            question: question.to_string(),
        };
        match self.step(event) {
            Ok(pending) => pending,
            Err(TransitionError::EmptyQuestion) => None,
            Err(err) => {
                debug!(error = %err, "question ignored");
                None
            }
        }
    }

    /// Second half of a cycle: swap the placeholder for the outcome.
    pub fn resolve(&mut self, outcome: Outcome) {
        if let Err(err) = self.step(Event::Resolved(outcome)) {
            warn!(error = %err, "outcome arrived with no question outstanding");
        }
    }

    /// Run a whole cycle, awaiting the completion in between. Returns `false`
    /// when the question was not accepted.
    pub async fn ask(&mut self, question: &str) -> bool {
        let Some(pending) = self.submit(question) else {
            return false;
        };
        let outcome = pending.run().await;
        self.resolve(outcome);
        true
    }

    fn step(&mut self, event: Event) -> Result<Option<PendingCompletion>, TransitionError> {
        let result = transition(self.state, event)?;
        self.state = result.next;

        let mut pending = None;
        for effect in result.effects {
            match effect {
                Effect::AppendUser(text) => {
                    self.transcript.push(Message::user(text));
                }
                Effect::AppendPending => {
                    self.transcript.push(Message::pending());
                }
                Effect::RequestCompletion { question } => {
                    debug!(question = %question, "question accepted");
                    pending = Some(PendingCompletion {
                        question,
                        system_instruction: self.context.system_instruction(),
                        client: Arc::clone(&self.client),
                    });
                }
                Effect::RemovePending => {
                    self.transcript.remove_pending();
                }
                Effect::AppendAssistant(text) => {
                    self.transcript.push(Message::assistant(text));
                }
                Effect::ReportFailure(err) => {
                    warn!(kind = err.kind.as_str(), error = %err.message, "showing service error");
                }
                Effect::FocusInput => self.focus_requested = true,
            }
        }
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::test_support::ScriptedClient;
    use crate::core::completion::{ServiceError, ServiceErrorKind};
    use crate::core::constants::SERVICE_ERROR_MESSAGE;
    use crate::core::message::Sender;

    fn controller_with(client: Arc<ScriptedClient>) -> ConversationController {
        ConversationController::new(client, Arc::new(SyllabusContext::builtin()))
    }

    fn senders(controller: &ConversationController) -> Vec<Sender> {
        controller
            .transcript()
            .messages()
            .iter()
            .map(|m| m.sender)
            .collect()
    }

    #[tokio::test]
    async fn instructor_contact_scenario() {
        let answer = "Mr. Lee Scarborough, Forrester Hall 105, (334) 348-4923, lscarborough@escc.edu";
        let client = Arc::new(ScriptedClient::answering(answer));
        let mut controller = controller_with(client.clone());

        assert!(controller.ask("Instructor contact").await);

        let messages = controller.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user("Instructor contact"));
        assert_eq!(messages[1], Message::assistant(answer));
        assert!(!controller.transcript().has_pending());
        assert!(controller.input_enabled());
        assert!(controller.take_focus_request());
        assert!(!controller.take_focus_request());
    }

    #[tokio::test]
    async fn completion_receives_question_and_syllabus_instruction() {
        let client = Arc::new(ScriptedClient::answering("ok"));
        let mut controller = controller_with(client.clone());

        controller.ask("Course materials").await;

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Course materials");
        assert_eq!(calls[0].1, SyllabusContext::builtin().system_instruction());
    }

    #[test]
    fn submit_disables_input_and_shows_one_placeholder() {
        let client = Arc::new(ScriptedClient::answering("unused"));
        let mut controller = controller_with(client);

        let pending = controller.submit("Course schedule").expect("accepted");
        assert_eq!(pending.question(), "Course schedule");
        assert!(pending.system_instruction().contains("SYLLABUS:"));
        assert_eq!(controller.state(), ConversationState::AwaitingResponse);
        assert!(!controller.input_enabled());
        assert_eq!(senders(&controller), vec![Sender::User, Sender::Pending]);

        assert!(controller.submit("Course materials").is_none());
        assert_eq!(controller.transcript().pending_count(), 1);
        assert_eq!(controller.transcript().len(), 2);
    }

    #[test]
    fn blank_question_is_a_no_op() {
        let client = Arc::new(ScriptedClient::answering("unused"));
        let mut controller = controller_with(client.clone());

        assert!(controller.submit("   \t").is_none());
        assert!(controller.transcript().is_empty());
        assert!(controller.input_enabled());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn failure_replaces_placeholder_with_fixed_message() {
        let client = Arc::new(ScriptedClient::failing(ServiceErrorKind::Network));
        let mut controller = controller_with(client);

        assert!(controller.ask("Proctoring requirements").await);

        assert_eq!(senders(&controller), vec![Sender::User, Sender::Assistant]);
        assert_eq!(
            controller.transcript().last(),
            Some(&Message::assistant(SERVICE_ERROR_MESSAGE))
        );
        assert!(controller.input_enabled());
    }

    #[tokio::test]
    async fn repeated_questions_call_the_service_each_time() {
        let client = Arc::new(ScriptedClient::new([
            Ok("first".to_string()),
            Err(ServiceError::new(ServiceErrorKind::Server, "boom")),
            Ok("third".to_string()),
        ]));
        let mut controller = controller_with(client.clone());

        for _ in 0..3 {
            assert!(controller.ask("Course schedule").await);
        }

        assert_eq!(client.calls().len(), 3);
        let contents: Vec<&str> = controller
            .transcript()
            .messages()
            .iter()
            .filter(|m| m.is_assistant())
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", SERVICE_ERROR_MESSAGE, "third"]);
        assert_eq!(controller.transcript().pending_count(), 0);
    }

    #[test]
    fn stray_outcome_is_ignored() {
        let client = Arc::new(ScriptedClient::answering("unused"));
        let mut controller = controller_with(client);
        controller.greet();

        controller.resolve(Outcome::Answer("late".to_string()));

        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.transcript().messages()[0].content, GREETING);
        assert!(!controller.take_focus_request());
    }
}
