//! CLI command implementations.

pub mod enrich;
pub mod lookup;

pub use enrich::{EnrichCommand, RunSummary};
pub use lookup::{LookupCommand, LookupReport};
