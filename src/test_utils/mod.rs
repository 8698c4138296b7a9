//! Test utilities for use case and HTTP-level testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory implementations of the persistence, email and cooldown traits
//! - A builder for `AppState` wired with those in-memory collaborators
//! - An in-process `VerificationApi` for driving the client crate

mod app_state_builder;
mod factories;
mod mocks;

pub use app_state_builder::*;
pub use client_bridge::*;
pub use factories::*;
pub use mocks::*;
