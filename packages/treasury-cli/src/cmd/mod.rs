//! Command implementations

pub mod expenses;
pub mod ledger;
pub mod ministries;
pub mod projects;
pub mod session;
pub mod tax;
pub mod watch;
