//! Game engines.

pub mod connections;
