//! Question resolution value objects.
//!
//! - [`request::ResolutionRequest`] - validated input to the resolver
//! - [`result::ResolutionResult`] - hit/not-found outcome with its origin tier
//! - [`stored::StoredAnswer`] - durable record owned by the persistent store

pub mod kind;
pub mod request;
pub mod result;
pub mod stored;
