//! Reports module for shareledger

pub mod summary;

pub use summary::{MemberSummary, SummaryReport};
