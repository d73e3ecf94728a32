//! [`Database`] implementations of the [`Rest`] client.

use std::collections::{HashMap, HashSet};

use common::{
    operations::{By, Delete, Insert, Select},
    Co2Savings, Price,
};
use serde::{Deserialize, Serialize};
use tracerr::Traced;

use crate::{
    domain::{favorite, item, profile, Favorite, Item, Profile},
    infra::{
        database::{self, Rest},
        Database,
    },
    read,
};

/// Table holding [`Item`] rows.
const ITEMS: &str = "eco_items";

/// Table holding [`Favorite`] rows.
const FAVORITES: &str = "favorites";

/// Table holding [`Profile`] rows.
const PROFILES: &str = "profiles";

/// [`Item`] row of the [`ITEMS`] table.
#[derive(Debug, Deserialize, Serialize)]
struct ItemRow {
    id: item::Id,
    title: item::Title,
    description: item::Description,
    #[serde(default)]
    price: Option<Price>,
    image_url: item::ImageUrl,
    #[serde(default)]
    co2_saved: Option<Co2Savings>,
    category: item::Category,
    condition: item::Condition,
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: item::CreationDateTime,
    user_id: profile::Id,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            co2_saved: row.co2_saved,
            category: row.category,
            condition: row.condition,
            created_at: row.created_at,
            owner_id: row.user_id,
        }
    }
}

impl From<Item> for ItemRow {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            price: item.price,
            image_url: item.image_url,
            co2_saved: item.co2_saved,
            category: item.category,
            condition: item.condition,
            created_at: item.created_at,
            user_id: item.owner_id,
        }
    }
}

/// [`Favorite`] row of the [`FAVORITES`] table.
#[derive(Debug, Deserialize, Serialize)]
struct FavoriteRow {
    user_id: profile::Id,
    item_id: item::Id,
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: favorite::CreationDateTime,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Self {
            viewer_id: row.user_id,
            item_id: row.item_id,
            created_at: row.created_at,
        }
    }
}

impl From<Favorite> for FavoriteRow {
    fn from(favorite: Favorite) -> Self {
        Self {
            user_id: favorite.viewer_id,
            item_id: favorite.item_id,
            created_at: favorite.created_at,
        }
    }
}

/// [`Profile`] row of the [`PROFILES`] table.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: profile::Id,
    username: profile::Username,
    #[serde(default)]
    avatar_url: Option<profile::AvatarUrl>,
    #[serde(default)]
    bio: Option<profile::Bio>,
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: profile::CreationDateTime,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            avatar_url: row.avatar_url,
            bio: row.bio,
            created_at: row.created_at,
        }
    }
}

/// Translates the given [`read::item::list::Filter`] into query predicates.
fn item_predicates(filter: &read::item::list::Filter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(category) = &filter.category {
        query.push(("category", format!("eq.{category}")));
    }
    if let Some(owner_id) = filter.owner_id {
        query.push(("user_id", format!("eq.{owner_id}")));
    }
    query
}

impl Database<Select<By<Vec<Item>, read::item::list::Filter>>> for Rest {
    type Ok = Vec<Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Item>, read::item::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut query = item_predicates(&by.into_inner());
        query.push(("order", "created_at.desc".into()));

        Ok(self
            .select::<ItemRow>(ITEMS, &query)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> database::Error))?
            .into_iter()
            .map(Item::from)
            .collect())
    }
}

impl Database<Select<By<read::item::list::TotalCount, read::item::list::Filter>>>
    for Rest
{
    type Ok = read::item::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::item::list::TotalCount, read::item::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        self.count(ITEMS, &item_predicates(&by.into_inner()))
            .await
            .map(Into::into)
            .map_err(tracerr::map_from_and_wrap!(=> database::Error))
    }
}

impl Database<Select<By<Option<Item>, item::Id>>> for Rest {
    type Ok = Option<Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Item>, item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .select::<ItemRow>(ITEMS, &[("id", format!("eq.{id}"))])
            .await
            .map_err(tracerr::map_from_and_wrap!(=> database::Error))?
            .into_iter()
            .next()
            .map(Item::from))
    }
}

impl Database<Insert<Item>> for Rest {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(item): Insert<Item>,
    ) -> Result<Self::Ok, Self::Err> {
        self.insert(ITEMS, &ItemRow::from(item))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> database::Error))
    }
}

impl Database<Select<By<Vec<Favorite>, profile::Id>>> for Rest {
    type Ok = Vec<Favorite>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Favorite>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let viewer_id = by.into_inner();
        Ok(self
            .select::<FavoriteRow>(
                FAVORITES,
                &[
                    ("user_id", format!("eq.{viewer_id}")),
                    ("order", "created_at.desc".into()),
                ],
            )
            .await
            .map_err(tracerr::map_from_and_wrap!(=> database::Error))?
            .into_iter()
            .map(Favorite::from)
            .collect())
    }
}

impl Database<Insert<Favorite>> for Rest {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(favorite): Insert<Favorite>,
    ) -> Result<Self::Ok, Self::Err> {
        self.insert(FAVORITES, &FavoriteRow::from(favorite))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> database::Error))
    }
}

impl Database<Delete<By<Favorite, (profile::Id, item::Id)>>> for Rest {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Favorite, (profile::Id, item::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (viewer_id, item_id) = by.into_inner();
        self.delete(
            FAVORITES,
            &[
                ("user_id", format!("eq.{viewer_id}")),
                ("item_id", format!("eq.{item_id}")),
            ],
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> database::Error))
    }
}

impl Database<Select<By<Option<Profile>, profile::Id>>> for Rest {
    type Ok = Option<Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Profile>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .select::<ProfileRow>(PROFILES, &[("id", format!("eq.{id}"))])
            .await
            .map_err(tracerr::map_from_and_wrap!(=> database::Error))?
            .into_iter()
            .next()
            .map(Profile::from))
    }
}

impl Database<Select<By<HashMap<profile::Id, Profile>, Vec<profile::Id>>>>
    for Rest
{
    type Ok = HashMap<profile::Id, Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<profile::Id, Profile>, Vec<profile::Id>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids: HashSet<_> = by.into_inner().into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let list = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Ok(self
            .select::<ProfileRow>(PROFILES, &[("id", format!("in.({list})"))])
            .await
            .map_err(tracerr::map_from_and_wrap!(=> database::Error))?
            .into_iter()
            .map(|row| (row.id, Profile::from(row)))
            .collect())
    }
}

impl Database<Select<By<read::profile::TotalCount, ()>>> for Rest {
    type Ok = read::profile::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::profile::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.count(PROFILES, &[])
            .await
            .map(Into::into)
            .map_err(tracerr::map_from_and_wrap!(=> database::Error))
    }
}

#[cfg(test)]
mod spec {
    use super::{FavoriteRow, ItemRow, ProfileRow};

    #[test]
    fn item_row_tolerates_missing_numeric_columns() {
        let row: ItemRow = serde_json::from_str(
            r#"{
                "id": "6f2d4a3e-8c1b-4f5a-9e7d-2b3c4d5e6f70",
                "title": "Compost bin",
                "description": "Sturdy",
                "image_url": "https://img.test/1.jpg",
                "category": "Garden",
                "condition": "Good",
                "created_at": "2026-03-14T09:30:00Z",
                "user_id": "1b2c3d4e-5f60-4718-92a3-b4c5d6e7f801"
            }"#,
        )
        .unwrap();

        assert!(row.price.is_none());
        assert!(row.co2_saved.is_none());
        assert_eq!(row.created_at.year_month(), (2026, 3));
    }

    #[test]
    fn item_row_keeps_unknown_labels_verbatim() {
        let row: ItemRow = serde_json::from_str(
            r#"{
                "id": "6f2d4a3e-8c1b-4f5a-9e7d-2b3c4d5e6f70",
                "title": "Odd one",
                "description": "",
                "price": "12.5",
                "image_url": "https://img.test/1.jpg",
                "co2_saved": "4.2",
                "category": "Upcycled",
                "condition": "Broken",
                "created_at": "2026-03-14T09:30:00Z",
                "user_id": "1b2c3d4e-5f60-4718-92a3-b4c5d6e7f801"
            }"#,
        )
        .unwrap();

        assert!(!row.category.is_known());
        assert!(!row.condition.is_known());
        assert_eq!(row.price.unwrap().to_string(), "$12.5");
    }

    #[test]
    fn favorite_row_round_trips() {
        let json = r#"{
            "user_id": "1b2c3d4e-5f60-4718-92a3-b4c5d6e7f801",
            "item_id": "6f2d4a3e-8c1b-4f5a-9e7d-2b3c4d5e6f70",
            "created_at": "2026-03-14T09:30:00Z"
        }"#;
        let row: FavoriteRow = serde_json::from_str(json).unwrap();

        let back = serde_json::to_value(&row).unwrap();
        assert_eq!(back["created_at"], "2026-03-14T09:30:00Z");
    }

    #[test]
    fn profile_row_tolerates_missing_optional_columns() {
        let row: ProfileRow = serde_json::from_str(
            r#"{
                "id": "1b2c3d4e-5f60-4718-92a3-b4c5d6e7f801",
                "username": "alice",
                "created_at": "2026-03-14T09:30:00Z"
            }"#,
        )
        .unwrap();

        assert!(row.avatar_url.is_none());
        assert!(row.bio.is_none());
        assert_eq!(AsRef::<str>::as_ref(&row.username), "alice");
    }
}
