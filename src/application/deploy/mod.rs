//! Deploy Module
//!
//! Orchestrates one single-flight deployment of a stack.
//!
//! ## Structure
//!
//! - `options` - Per-run inputs (`DeployOptions`)
//! - `result` - Run report (`DeployReport`)
//! - `use_case` - The state machine (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use stackkit::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(locks, tracker, Some(backups), engine);
//! let report = use_case.execute(&DeployOptions::new(stack, context))?;
//! std::process::exit(report.outcome.exit_code());
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::DeployReport;
pub use use_case::DeployUseCase;
