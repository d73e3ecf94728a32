//! Infrastructure layer.

pub mod database;

pub use self::database::Database;
#[cfg(feature = "rest")]
pub use self::database::{rest, Rest};
