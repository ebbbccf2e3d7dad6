//! prepost-core — Session state machine, scoring, and record repository.
//!
//! This crate defines the fundamental data model, the tabular store trait,
//! and the exam lifecycle logic that the entire prepost system builds on.

pub mod error;
pub mod gateway;
pub mod model;
pub mod parser;
pub mod repository;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod traits;
