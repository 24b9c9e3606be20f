//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains some of:
//! - `mod.rs` — Domain types and pure logic
//! - `wire.rs` — Raw structs matching the contract's return values
//! - `convert.rs` — `TryFrom` conversions with validation
//! - `state.rs` — State containers and feeds that keep the store current
//!
//! `approval`, `form` and `token` hold the user-triggered write paths.

pub mod approval;
pub mod form;
pub mod order;
pub mod orderbook;
pub mod token;
pub mod trade;
