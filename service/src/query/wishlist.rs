//! [`Wishlist`] definition.

use common::{
    operations::{By, Select},
    Co2Savings,
};
use futures::try_join;
use tracerr::Traced;

use crate::{
    domain::{profile, Favorite, Item, Viewer},
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] of the [`Item`]s a [`Viewer`] has favorited.
#[derive(Clone, Copy, Debug)]
pub struct Wishlist {
    /// [`Viewer`] the wishlist belongs to.
    pub viewer: Viewer,
}

/// Output of the [`Wishlist`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Favorited [`Item`]s, ordered the way the [`Favorite`] relations were
    /// returned by the backend.
    pub items: Vec<Item>,

    /// Total [`Co2Savings`] of the favorited [`Item`]s, rounded to whole
    /// kilograms.
    pub total_co2: Co2Savings,
}

impl Output {
    /// Empty [`Output`], as produced for an anonymous [`Viewer`].
    fn empty() -> Self {
        Self {
            items: vec![],
            total_co2: Co2Savings::ZERO,
        }
    }
}

impl<Db> Query<Wishlist> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Favorite>, profile::Id>>,
            Ok = Vec<Favorite>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Item>, read::item::list::Filter>>,
            Ok = Vec<Item>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Wishlist { viewer }: Wishlist,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(viewer_id) = viewer.id() else {
            return Ok(Output::empty());
        };

        let (favorites, items) = try_join!(
            async {
                self.database()
                    .execute(Select(By::<Vec<Favorite>, _>::new(viewer_id)))
                    .await
                    .map_err(tracerr::wrap!())
            },
            async {
                self.database()
                    .execute(Select(By::<Vec<Item>, _>::new(
                        read::item::list::Filter::default(),
                    )))
                    .await
                    .map_err(tracerr::wrap!())
            },
        )?;

        Ok(join(&favorites, items))
    }
}

/// Resolves [`Favorite`] relations against the fetched [`Item`]s.
///
/// Relations pointing at [`Item`]s absent from the catalog are dropped
/// silently, and the remaining [`Item`]s keep the relations' order.
fn join(favorites: &[Favorite], items: Vec<Item>) -> Output {
    let items: Vec<_> = favorites
        .iter()
        .filter_map(|f| items.iter().find(|i| i.id == f.item_id).cloned())
        .collect();
    let total_co2 = items
        .iter()
        .map(Item::co2_or_zero)
        .sum::<Co2Savings>()
        .round();
    Output { items, total_co2 }
}

#[cfg(test)]
mod spec {
    use common::{Co2Savings, DateTime, Price};

    use crate::domain::{item, profile, Favorite, Item};

    use super::join;

    fn item(co2: Option<&str>) -> Item {
        Item {
            id: item::Id::new(),
            title: item::Title::new("Compost bin").unwrap(),
            description: item::Description::new("Sturdy").unwrap(),
            price: Some(Price::new(10.into()).unwrap()),
            image_url: item::ImageUrl::new("https://img.test/1.jpg").unwrap(),
            co2_saved: co2
                .map(|c| Co2Savings::new(c.parse().unwrap()).unwrap()),
            category: item::Category::from("Garden"),
            condition: item::Condition::from("Good"),
            created_at: DateTime::now().coerce(),
            owner_id: profile::Id::new(),
        }
    }

    fn favorite(item_id: item::Id) -> Favorite {
        Favorite {
            viewer_id: profile::Id::new(),
            item_id,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn preserves_relation_order_and_drops_dangling_relations() {
        let first = item(Some("2.6"));
        let second = item(None);
        let favorites = vec![
            favorite(second.id),
            favorite(item::Id::new()), // deleted item
            favorite(first.id),
        ];

        let output = join(&favorites, vec![first.clone(), second.clone()]);

        let ids: Vec<_> = output.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, [second.id, first.id]);
    }

    #[test]
    fn totals_co2_rounded_with_missing_values_as_zero() {
        let first = item(Some("2.6"));
        let second = item(None);
        let favorites = vec![favorite(first.id), favorite(second.id)];

        let output = join(&favorites, vec![first, second]);

        assert_eq!(output.total_co2.to_string(), "3kg");
    }
}
