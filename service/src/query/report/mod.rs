//! [`Query`] collection of reports.

pub mod impact;
