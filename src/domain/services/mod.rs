//! Domain Services
//!
//! Stateless logic over domain data.

pub mod state_validator;

pub use state_validator::{validate_state, StateSummary};
