//! Inventory catalog and receiving reports.
//!
//! The catalog is the authoritative price source for sales invoices: prices are
//! copied out of it at invoice time and never referenced live afterwards.

pub mod item;
pub mod receiving;

pub use item::{InventoryInput, InventoryItem};
pub use receiving::{ReceivingReport, ReceivingReportInput};
