//! [`Item`]-related read definitions.
//!
//! [`Item`]: crate::domain::Item

pub mod list {
    //! [`Item`] list definitions.
    //!
    //! [`Item`]: crate::domain::Item

    use derive_more::{From, Into};

    use crate::domain::{item, profile};
    #[cfg(doc)]
    use crate::domain::{Item, Profile};

    /// Backend-side narrowing of an [`Item`] list fetch.
    ///
    /// Leaving every field empty fetches the whole catalog, which is the
    /// shape the storefront views consume: the fine-grained filtering
    /// happens client-side in [`query::catalog`].
    ///
    /// [`query::catalog`]: crate::query::catalog
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`item::Category`] to narrow down to.
        pub category: Option<item::Category>,

        /// Owning [`Profile`] to narrow down to.
        pub owner_id: Option<profile::Id>,
    }

    /// Total count of [`Item`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
