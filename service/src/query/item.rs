//! [`Query`] collection related to a single [`Item`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{item, profile, Favorite, Item, Profile, Viewer},
    infra::{database, Database},
    Query, Service,
};

use super::DatabaseQuery;

/// Queries an [`Item`] by its [`item::Id`].
pub type ById = DatabaseQuery<By<Option<Item>, item::Id>>;

/// [`Query`] of a single [`Item`] page: the [`Item`] itself, its owning
/// [`Profile`], and whether the [`Viewer`] has favorited it.
#[derive(Clone, Copy, Debug)]
pub struct Detail {
    /// ID of the [`Item`] to fetch.
    pub id: item::Id,

    /// [`Viewer`] the favorited flag is resolved for.
    pub viewer: Viewer,
}

/// Output of the [`Detail`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Fetched [`Item`].
    pub item: Item,

    /// [`Profile`] owning the [`Item`], if it still exists.
    pub owner: Option<Profile>,

    /// Indicator whether the [`Viewer`] has favorited the [`Item`].
    pub favorited: bool,
}

impl<Db> Query<Detail> for Service<Db>
where
    Db: Database<
            Select<By<Option<Item>, item::Id>>,
            Ok = Option<Item>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Profile>, profile::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Favorite>, profile::Id>>,
            Ok = Vec<Favorite>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Output>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Detail { id, viewer }: Detail,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(item) = self
            .database()
            .execute(Select(By::<Option<Item>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let owner = self
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(item.owner_id)))
            .await
            .map_err(tracerr::wrap!())?;

        let favorited = match viewer.id() {
            Some(viewer_id) => self
                .database()
                .execute(Select(By::<Vec<Favorite>, _>::new(viewer_id)))
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .any(|f| f.item_id == id),
            None => false,
        };

        Ok(Some(Output {
            item,
            owner,
            favorited,
        }))
    }
}
