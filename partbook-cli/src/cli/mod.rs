//! Command-line surface for the import engine

pub mod commands;
