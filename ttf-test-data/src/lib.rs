//! Test data shared between the crates in this repository.

pub mod bebuffer;
pub mod font;
