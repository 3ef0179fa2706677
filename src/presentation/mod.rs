//! Presentation Layer
//!
//! Creates use cases with infrastructure dependencies. Argument parsing
//! and rendering live with the binary.
//!
//! ## Usage
//!
//! ```ignore
//! use stackkit::presentation::factory;
//!
//! let table = factory::create_lock_table(&config);
//! let use_case = factory::create_deploy_use_case(&config, &stack, table, true)?;
//! let report = use_case.execute(&options)?;
//! ```

pub mod factory;

pub use factory::create_deploy_use_case;
