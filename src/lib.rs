//! # OctoFHIR vMR
//!
//! Bidirectional mapping between the vMR clinical decision support exchange
//! schema and the flat fact model a rule engine reasons over.
//!
//! ## Features
//!
//! - **Inbound mapping**: flatten a `CDSInput` document into typed facts, with
//!   nested statements and entities registered as their own facts plus
//!   relationship facts
//! - **Outbound mapping**: rebuild a `CDSOutput` document from facts, nesting
//!   children under their parents and grouping top-level statements by category
//! - **Typed errors**: recoverable data errors are kept apart from mapper bugs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use octofhir_vmr::*;
//!
//! # fn example(input_json: &str) -> Result<()> {
//! let mapper = VmrMapper::new();
//! let mut facts = mapper.pull_in_json(input_json)?;
//!
//! // Rules decide what goes back out.
//! for request in facts.get_as_mut::<internal::AppointmentRequest>() {
//!     request.encounter.statement.to_be_returned = true;
//! }
//!
//! let output = mapper.push_out_json(&facts)?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod internal;
pub mod mapping;
pub mod schema;

pub use crate::core::MappingConfig;
pub use error::{Result, VmrMappingError};
pub use mapping::*;
