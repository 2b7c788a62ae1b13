//! Test utilities for Aegis services.
//!
//! Provides canned MX resolvers and account fixtures. Import in
//! `#[cfg(test)]` blocks and `tests/` targets only — never in production
//! code.

pub mod fixture;
pub mod mx;
