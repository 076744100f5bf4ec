//! Conversation domain: syllabus context, completion client, the request
//! state machine and the controller that ties them to a transcript.

pub mod completion;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod message;
pub mod state_machine;
pub mod syllabus;
pub mod transcript;
