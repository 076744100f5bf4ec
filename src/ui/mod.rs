//! Terminal UI layer for the syllabus chat.
//!
//! Key submodules:
//! - [`chat_loop`]: terminal setup and the event loop that feeds input to the
//!   shell and runs completions on background tasks.
//! - [`shell`]: session, entry field, shortcut focus and scrolling state.
//! - [`renderer`], [`shortcuts`] and [`wrap`]: frame layout and drawing.
//! - [`markdown`]: answer rendering to terminal lines and sanitized HTML.
//! - [`theme`]: style policy.
//!
//! Ownership boundary: this layer presents and captures interaction state,
//! while [`crate::core`] owns the conversation and the completion call.

pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod shell;
pub mod shortcuts;
pub mod theme;
pub mod wrap;
