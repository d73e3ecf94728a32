//! [`Command`] for creating a new [`Item`].

use common::{operations::Insert, Co2Savings, DateTime, Price};
use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;

use crate::{
    domain::{item, Item, Viewer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Item`].
#[derive(Clone, Debug)]
pub struct CreateItem {
    /// [`Viewer`] listing the new [`Item`].
    pub viewer: Viewer,

    /// [`item::Title`] of the new [`Item`].
    pub title: item::Title,

    /// [`item::Description`] of the new [`Item`].
    pub description: item::Description,

    /// [`Price`] of the new [`Item`], if any.
    pub price: Option<Price>,

    /// [`item::ImageUrl`] of the new [`Item`].
    pub image_url: item::ImageUrl,

    /// [`Co2Savings`] estimated for the new [`Item`], if any.
    pub co2_saved: Option<Co2Savings>,

    /// [`item::Category`] label of the new [`Item`].
    pub category: item::Category,

    /// [`item::Condition`] label of the new [`Item`].
    pub condition: item::Condition,
}

impl<Db> Command<CreateItem> for Service<Db>
where
    Db: Database<Insert<Item>, Err = Traced<database::Error>>,
{
    type Ok = Item;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateItem) -> Result<Self::Ok, Self::Err> {
        let CreateItem {
            viewer,
            title,
            description,
            price,
            image_url,
            co2_saved,
            category,
            condition,
        } = cmd;

        let Some(owner_id) = viewer.id() else {
            return Err(tracerr::new!(ExecutionError::AuthorizationRequired));
        };

        let item = Item {
            id: item::Id::new(),
            title,
            description,
            price,
            image_url,
            co2_saved,
            category,
            condition,
            created_at: DateTime::now().coerce(),
            owner_id,
        };

        self.database()
            .execute(Insert(item.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
            .map(drop)?;

        Ok(item)
    }
}

/// Error of [`CreateItem`] [`Command`] execution.
#[derive(Debug, Display, From, StdError)]
pub enum ExecutionError {
    /// [`Viewer`] is not signed in.
    #[display("signing in is required to list items")]
    AuthorizationRequired,

    /// [`Database`] error.
    Db(database::Error),
}
