//! [`Viewer`] definitions.

use derive_more::From;

use super::profile;
#[cfg(doc)]
use super::Profile;

/// Current user of the storefront.
#[derive(Clone, Copy, Debug, Eq, From, PartialEq)]
pub enum Viewer {
    /// Not signed in.
    Anonymous,

    /// Signed in under the given [`Profile`].
    #[from]
    Authenticated(profile::Id),
}

impl Viewer {
    /// Returns the [`profile::Id`] of this [`Viewer`], if signed in.
    #[must_use]
    pub fn id(self) -> Option<profile::Id> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(id),
        }
    }

    /// Indicates whether this [`Viewer`] is signed in.
    #[must_use]
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
