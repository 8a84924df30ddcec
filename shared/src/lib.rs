//! Shared types and models for the Restaurant Inventory Management Platform
//!
//! This crate contains types shared between the backend, frontend (via WASM),
//! and other components of the system. Everything in here is pure: no
//! database or HTTP dependencies, so the same validation rules run on the
//! server and in the browser.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
