//! Logging infrastructure: structured resolution event logging.
//!
//! Provides [`JsonlResolutionLogger`], a JSONL file writer that implements
//! the [`ResolutionObserver`](qbank_application::ResolutionObserver) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlResolutionLogger;
