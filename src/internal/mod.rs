//! Internal fact model the rule engine reasons over.

mod datatypes;
mod entities;
mod fact;
mod relationships;
mod statements;

pub use datatypes::*;
pub use entities::*;
pub use fact::*;
pub use relationships::*;
pub use statements::*;
