//! Core types and trait definitions for the Rosary group manager.
//!
//! Holds the mystery catalog, the roster types, and the assignment arithmetic
//! every other crate builds on. No HTTP or database dependencies.

// Store implementations use native `async fn` for the trait's methods.
#![allow(async_fn_in_trait)]

pub mod assignment;
pub mod error;
pub mod intention;
pub mod ledger;
pub mod mystery;
pub mod roster;
pub mod store;

pub use error::{DomainError, Error, Result};
