//! Domain types shared across the Aegis services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod attempt;
pub mod snapshot;
pub mod user;
