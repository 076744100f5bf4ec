//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use crate::core::completion::GeminiClient;
use crate::core::config::{credential_from_env, Config};
use crate::core::conversation::ConversationController;
use crate::core::message::Message;
use crate::core::state_machine::Outcome;
use crate::ui::markdown::{render_lines, render_transcript_html};
use crate::ui::theme::Theme;

pub async fn run_say(
    config: &Config,
    model: Option<&str>,
    question: &str,
    html: bool,
) -> Result<(), Box<dyn Error>> {
    let question = question.trim();
    if question.is_empty() {
        return Err("Usage: syllabot say <question>".into());
    }

    let api_key = credential_from_env()?;
    let context = Arc::new(config.syllabus_context()?);
    let client = Arc::new(GeminiClient::new(api_key, &config.completion_settings(model))?);
    let mut controller = ConversationController::new(client, context);

    let pending = controller
        .submit(question)
        .ok_or("the question was not accepted")?;
    let outcome = pending.run().await;
    let failed = matches!(outcome, Outcome::Failure(_));
    controller.resolve(outcome);

    let mut stdout = io::stdout().lock();
    write_result(&mut stdout, controller.transcript().messages(), html)?;
    stdout.flush()?;

    if failed {
        return Err("the completion service did not return an answer".into());
    }
    Ok(())
}

/// Print the transcript as HTML, or just the answer as plain terminal text.
fn write_result<W: Write>(out: &mut W, messages: &[Message], html: bool) -> io::Result<()> {
    if html {
        return out.write_all(render_transcript_html(messages).as_bytes());
    }

    let Some(answer) = messages.iter().rev().find(|m| m.is_assistant()) else {
        return Ok(());
    };
    let theme = Theme::monochrome();
    for line in render_lines(&answer.content, theme.assistant_text_style, &theme) {
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        writeln!(out, "{}", text.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> Vec<Message> {
        vec![
            Message::user("Course materials"),
            Message::assistant("**Textbook:** none\n\n* Internet access\n* TestOut account"),
        ]
    }

    #[test]
    fn plain_output_is_the_rendered_answer() {
        let mut out = Vec::new();
        write_result(&mut out, &transcript(), false).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Textbook: none\n\n• Internet access\n• TestOut account\n"
        );
    }

    #[test]
    fn html_output_is_the_sanitized_transcript() {
        let mut out = Vec::new();
        write_result(&mut out, &transcript(), true).unwrap();
        let html = String::from_utf8(out).unwrap();

        assert!(html.starts_with("<div class=\"message user-message\"><p>Course materials</p>"));
        assert!(html.contains("<div class=\"message ai-message\"><p><strong>Textbook:</strong> none</p>"));
        assert!(html.contains("<li>TestOut account</li>"));
    }

    #[test]
    fn nothing_to_print_without_an_answer() {
        let mut out = Vec::new();
        write_result(&mut out, &[Message::user("hi")], false).unwrap();
        assert!(out.is_empty());
    }
}
