//! CLI command implementations.

pub mod common;
pub mod compare;
pub mod draw;
pub mod gates;
pub mod run;
