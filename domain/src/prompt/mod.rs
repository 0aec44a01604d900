//! Prompt domain
//!
//! Templates for the prompt sent to inference providers.

mod template;

pub use template::PromptTemplate;
