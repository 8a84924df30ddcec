//! Domain models for the Restaurant Inventory Management Platform

pub mod item;
pub mod master;
pub mod movement;
pub mod notification;
pub mod transaction;
pub mod user;

pub use item::*;
pub use master::*;
pub use movement::*;
pub use notification::*;
pub use transaction::*;
pub use user::*;
