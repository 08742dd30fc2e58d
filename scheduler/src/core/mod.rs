//! Core utilities: bounded-capacity limits.

pub mod limits;
