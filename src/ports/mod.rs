//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `StateStore` - Opaque per-conversation blob storage (get/set/delete)
//! - `TreatmentScorer` - External outcome prediction for one candidate treatment

mod state_store;
mod treatment_scorer;

pub use state_store::{StateStore, StateStoreError};
pub use treatment_scorer::{ScoringError, TreatmentScorer};
