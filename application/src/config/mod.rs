//! Application-level configuration.
//!
//! - [`ResolverParams`]: knobs that change how the resolver sequences tiers

pub mod resolver_params;

pub use resolver_params::ResolverParams;
