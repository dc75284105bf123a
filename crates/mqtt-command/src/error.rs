//! Structured classification of why `parse` rejected an input line.
//!
//! `parse` still answers with `CommandOutcome::Failure { reason: String }` —
//! callers only ever render `reason` to the user, never match on it — but
//! the string is built from one of these variants so every rejection lives
//! at a named, greppable site instead of a scattered `format!` call.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Unknown command: :{0}")]
    UnknownCommand(String),

    #[error("Invalid arguments for :{command} — expected no arguments")]
    UnexpectedArguments { command: &'static str },

    #[error("Invalid arguments for :{command} — {detail}")]
    InvalidArguments { command: &'static str, detail: &'static str },

    #[error("Empty topic search")]
    EmptyTopicSearch,
}
