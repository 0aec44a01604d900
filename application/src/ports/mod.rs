//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod answer_cache;
pub mod answer_provider;
pub mod question_store;
pub mod resolution_observer;
