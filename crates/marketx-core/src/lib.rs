//! # marketx-core
//!
//! Core types, the page document model, configuration, and error handling
//! for the Market X landing runtime.

pub mod config;
pub mod document;
pub mod error;
pub mod language;
