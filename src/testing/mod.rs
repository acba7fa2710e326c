//! # Contract Testing
//!
//! A contract case is a declarative record: request shape plus the
//! assertions its response must satisfy. The [`runner::Runner`] sends each
//! case exactly once, in order, and folds the outcomes into a
//! [`report::RunReport`].
//!
//! Outcomes are three-way:
//! - `Passed`: every assertion held.
//! - `Failed`: the service answered but diverged from the contract.
//! - `Errored`: transport or malformed-response problems, reported apart
//!   from contract failures.

pub mod assertion;
pub mod case;
pub mod report;
pub mod runner;

pub use assertion::{Assertion, AssertionResult};
pub use case::ContractCase;
pub use report::RunReport;
pub use runner::{CaseOutcome, CaseResult, ErrorKind, Runner};
