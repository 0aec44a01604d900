//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod provider_answer;
pub mod resolve_question;
