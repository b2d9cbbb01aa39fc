//! Row models.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching a
//! database row. Input DTOs live in `registry_core`, where validation
//! produces them.

pub mod company;
