//! [`Profile`]-related read definitions.
//!
//! [`Profile`]: crate::domain::Profile

use derive_more::{From, Into};

#[cfg(doc)]
use crate::domain::Profile;

/// Total count of registered [`Profile`]s.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct TotalCount(i32);
