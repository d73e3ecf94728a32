//! [`Profile`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public identity of a marketplace user.
///
/// Only ever read by this core, as a join target for attribution and
/// contributor rankings.
#[derive(Clone, Debug)]
pub struct Profile {
    /// ID of this [`Profile`].
    pub id: Id,

    /// [`Username`] of this [`Profile`].
    pub username: Username,

    /// [`AvatarUrl`] of this [`Profile`], if any.
    pub avatar_url: Option<AvatarUrl>,

    /// [`Bio`] of this [`Profile`], if any.
    pub bio: Option<Bio>,

    /// [`DateTime`] when this [`Profile`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Profile`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Username of a [`Profile`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a new [`Username`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Returns the fallback [`Username`] displayed when no [`Profile`]
    /// resolves for an owner.
    #[must_use]
    pub fn anonymous() -> Self {
        Self("Anonymous".into())
    }

    /// Checks whether the given `name` is a valid [`Username`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Username {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Username`")
    }
}

/// URL of a [`Profile`] avatar image.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Creates a new [`AvatarUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`AvatarUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        url.trim() == url && !url.is_empty() && url.len() <= 2048
    }
}

impl FromStr for AvatarUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `AvatarUrl`")
    }
}

/// Bio of a [`Profile`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct Bio(String);

impl Bio {
    /// Creates a new [`Bio`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (text.len() <= 4096).then_some(Self(text))
    }
}

impl FromStr for Bio {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Bio`")
    }
}

/// [`DateTime`] when a [`Profile`] was created.
pub type CreationDateTime = DateTimeOf<(Profile, unit::Creation)>;
