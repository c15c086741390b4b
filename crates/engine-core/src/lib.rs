pub mod coordinator;
pub mod error;
pub mod key;
pub mod report;
pub mod state;
