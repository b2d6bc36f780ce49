//! Application layer: Use cases and services.
//!
//! Orchestrates domain logic with ports.

mod bootstrap;
mod quote;

pub use bootstrap::{build_service, ModelService};
pub use quote::PremiumService;
