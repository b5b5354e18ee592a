//! Library entry point for the tokscan CLI.

pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod path;
pub mod report;
pub mod rules;
pub mod scanner;
