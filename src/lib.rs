//! HTTP contract checks for the reqres user and registration API.
//!
//! A [`collections::Collection`] of declarative [`testing::ContractCase`]s
//! is resolved against an [`environment::Environment`] and executed
//! sequentially by a [`testing::Runner`].

pub mod auth;
pub mod cli;
pub mod collections;
pub mod config;
pub mod environment;
pub mod error;
pub mod http;
pub mod storage;
pub mod telemetry;
pub mod testing;

pub use error::{ContractError, Result};
