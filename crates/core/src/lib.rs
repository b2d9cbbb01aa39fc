//! Domain logic for the company registry.
//!
//! Everything here is free of database and HTTP dependencies: shared types,
//! the domain error, the company validation engine, import reporting, and
//! CSV / JSON transfer helpers.

pub mod company;
pub mod error;
pub mod import;
pub mod transfer;
pub mod types;
pub mod validation;
