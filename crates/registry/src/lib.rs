//! Operation catalog and request mapper for the Brickken API.
//!
//! The catalog declares every supported operation; the typed model in
//! [`operation`] turns validated inputs into [`brickken_types::RequestPlan`]
//! values without performing any I/O.

pub mod build;
pub mod catalog;
pub mod clap_builder;
pub mod operation;

pub use build::{BuildError, build_operation};
pub use catalog::Catalog;
pub use clap_builder::build_clap;
pub use operation::{InfoQuery, Operation, PrepareMethod, PrepareTransactions};
