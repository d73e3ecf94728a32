//! [`Item`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Co2Savings, DateTimeOf, Price};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile;

/// Marketplace listing.
#[derive(Clone, Debug)]
pub struct Item {
    /// ID of this [`Item`].
    pub id: Id,

    /// [`Title`] of this [`Item`].
    pub title: Title,

    /// [`Description`] of this [`Item`].
    pub description: Description,

    /// [`Price`] of this [`Item`].
    ///
    /// Absent when the listing carries no price; engines treat it as zero.
    pub price: Option<Price>,

    /// [`ImageUrl`] of this [`Item`].
    pub image_url: ImageUrl,

    /// [`Co2Savings`] estimated for this [`Item`].
    ///
    /// Absent when no estimation exists; engines treat it as zero.
    pub co2_saved: Option<Co2Savings>,

    /// [`Category`] label of this [`Item`].
    pub category: Category,

    /// [`Condition`] label of this [`Item`].
    pub condition: Condition,

    /// [`DateTime`] when this [`Item`] was created.
    pub created_at: CreationDateTime,

    /// ID of the [`Profile`] owning this [`Item`].
    ///
    /// [`Profile`]: super::Profile
    pub owner_id: profile::Id,
}

impl Item {
    /// Returns [`Price`] of this [`Item`], treating an absent one as zero.
    #[must_use]
    pub fn price_or_zero(&self) -> Price {
        self.price.unwrap_or(Price::ZERO)
    }

    /// Returns [`Co2Savings`] of this [`Item`], treating absent ones as zero.
    #[must_use]
    pub fn co2_or_zero(&self) -> Co2Savings {
        self.co2_saved.unwrap_or(Co2Savings::ZERO)
    }
}

/// ID of an [`Item`].
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

/// Title of an [`Item`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 256
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Description of an [`Item`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    Hash,
    PartialEq,
    Serialize,
)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (text.len() <= 4096).then_some(Self(text))
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// URL of an [`Item`] image.
#[derive(
    AsRef,
    Clone,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    Hash,
    PartialEq,
    Serialize,
)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        url.trim() == url && !url.is_empty() && url.len() <= 2048
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// Category label of an [`Item`].
///
/// The marketplace nominally uses the closed [`Category::KNOWN`] set, but
/// items arriving from the backend may carry any label, and such labels are
/// passed through rather than rejected.
#[derive(
    AsRef,
    Clone,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(forward)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Nominal [`Category`] set of the marketplace.
    pub const KNOWN: [&'static str; 4] =
        ["Electronics", "Transportation", "Lifestyle", "Garden"];

    /// Checks whether this [`Category`] belongs to the nominal
    /// [`KNOWN`] set.
    ///
    /// [`KNOWN`]: Self::KNOWN
    #[must_use]
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

/// Condition label of an [`Item`].
///
/// The marketplace nominally uses the closed [`Condition::KNOWN`] set, but
/// items arriving from the backend may carry any label, and such labels are
/// passed through rather than rejected.
#[derive(
    AsRef,
    Clone,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(forward)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Condition(String);

impl Condition {
    /// Nominal [`Condition`] set of the marketplace.
    pub const KNOWN: [&'static str; 4] = ["New", "Like New", "Good", "Fair"];

    /// Checks whether this [`Condition`] belongs to the nominal
    /// [`KNOWN`] set.
    ///
    /// [`KNOWN`]: Self::KNOWN
    #[must_use]
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

/// [`DateTime`] when an [`Item`] was created.
pub type CreationDateTime = DateTimeOf<(Item, unit::Creation)>;
