//! Command implementations.

pub mod export;
pub mod rename;
pub mod stats;

pub use self::export::execute_export;
pub use self::rename::execute_rename;
pub use self::stats::execute_stats;
