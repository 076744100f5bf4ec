//! Syllabot is a terminal chat assistant that answers questions about a
//! course syllabus using the Gemini API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the syllabus context, the completion client, the request
//!   state machine and the conversation controller.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the Gemini `generateContent` payloads.
//! - [`utils`] holds URL helpers and logging setup.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions and [`cli::say`] for one-shot questions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
