//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: request validation errors
//! - [`string::preview`]: log-safe question previews

pub mod error;
pub mod string;
