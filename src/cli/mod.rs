//! Command-line interface parsing and handling
//!
//! This module parses arguments, sets up logging, and dispatches to the
//! interactive chat or the one-shot `say` command.

pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::say::run_say;
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{self, LogTarget};

#[derive(Parser, Debug)]
#[command(name = "syllabot")]
#[command(about = "A terminal assistant that answers questions about the course syllabus")]
#[command(
    long_about = "Syllabot is a full-screen terminal chat that answers questions about the \
CIS 275 syllabus using the Gemini API. Answers come only from the syllabus text.\n\n\
Environment Variables:\n\
  API_KEY           Gemini API key (required; without it the chat shows a configuration error)\n\
  RUST_LOG          Log filter (default: syllabot=info when --log is given)\n\n\
Controls:\n\
  Enter             Send the question\n\
  F1-F5             Ask a prompt shortcut\n\
  Tab               Switch between the entry field and the shortcut buttons\n\
  Up/Down/PgUp/PgDn Scroll through chat history (mouse wheel works too)\n\
  Esc, Ctrl+C       Quit"
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Gemini model to use instead of the configured one
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Ask one question without the interactive UI and print the answer
    Say {
        /// Question text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Print the transcript as sanitized HTML instead of terminal text
        #[arg(long)]
        html: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, Box<dyn Error>> {
    let config = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let command = args.command.unwrap_or(Commands::Chat);

    let log_target = match (&command, args.log.as_deref()) {
        (_, Some(path)) => LogTarget::File(path),
        (Commands::Say { .. }, None) => LogTarget::Stderr,
        (Commands::Chat, None) => LogTarget::Off,
    };
    logging::init(log_target)?;

    let config = load_config(args.config.as_ref())?;

    match command {
        Commands::Chat => run_chat(config, args.model).await,
        Commands::Say { question, html } => {
            run_say(&config, args.model.as_deref(), &question.join(" "), html).await
        }
    }
}
