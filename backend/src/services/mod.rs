//! Business logic services for the Restaurant Inventory Management Platform

pub mod auth;
pub mod item;
pub mod ledger;
pub mod master;
pub mod notification;
pub mod report;
pub mod sequence;
pub mod transaction;

pub use auth::AuthService;
pub use item::ItemService;
pub use ledger::StockLedger;
pub use master::MasterDataService;
pub use notification::NotificationService;
pub use report::ReportingService;
pub use sequence::SequenceGenerator;
pub use transaction::TransactionService;
