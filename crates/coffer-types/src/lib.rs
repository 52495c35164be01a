//! Foundation types for the Coffer ledger.
//!
//! This crate provides the identity and amount types used throughout the
//! Coffer system. Every other Coffer crate depends on `coffer-types`.
//!
//! # Key Types
//!
//! - [`AccountId`] — Opaque account identifier derived from caller identity material
//! - [`Amount`] — Integer balance in base units (10^18 per whole unit)

pub mod account;
pub mod amount;
pub mod error;

pub use account::AccountId;
pub use amount::{format_amount, parse_amount, Amount, UNIT};
pub use error::TypeError;
