//! HTTP handlers for the Restaurant Inventory Management Platform

pub mod auth;
pub mod health;
pub mod item;
pub mod master;
pub mod notification;
pub mod report;
pub mod transaction;

pub use auth::*;
pub use health::*;
pub use item::*;
pub use master::*;
pub use notification::*;
pub use report::*;
pub use transaction::*;
