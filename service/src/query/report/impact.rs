//! Community impact dashboard report.

use std::collections::HashMap;

use common::{
    operations::{By, Select},
    Co2Savings,
};
use derive_more::Display;
use futures::try_join;
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{item, profile, Item, Profile, Viewer},
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] of the community impact [`Snapshot`] backing the dashboard.
#[derive(Clone, Copy, Debug)]
pub struct Impact {
    /// [`Viewer`] the personal figures are resolved for.
    pub viewer: Viewer,
}

/// Aggregated community impact figures.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Total count of listed [`Item`]s.
    pub total_items: read::item::list::TotalCount,

    /// Total count of registered [`Profile`]s.
    pub total_users: read::profile::TotalCount,

    /// Total [`Co2Savings`] across all listed [`Item`]s.
    pub total_co2: Co2Savings,

    /// [`OwnerTotals`] of the [`Viewer`]'s own listings.
    ///
    /// Zeroed for an anonymous [`Viewer`].
    pub viewer: OwnerTotals,

    /// Per-[`item::Category`] listing counts, in the order the categories
    /// were first encountered.
    pub categories: Vec<CategoryCount>,

    /// [`Co2Savings`] trend per month, oldest first.
    pub trend: Vec<TrendPoint>,

    /// Top contributing [`Profile`]s by [`Co2Savings`], biggest first.
    pub top_contributors: Vec<Contributor>,
}

impl Snapshot {
    /// Returns the average [`Co2Savings`] per listed [`Item`], rounded to
    /// whole kilograms.
    ///
    /// An empty catalog averages to zero.
    #[must_use]
    pub fn average_co2(&self) -> Co2Savings {
        let total = i32::from(self.total_items);
        if total <= 0 {
            return Co2Savings::ZERO;
        }
        Co2Savings::new(self.total_co2.kilograms() / Decimal::from(total))
            .unwrap_or(Co2Savings::ZERO)
            .round()
    }
}

/// Totals of the [`Item`]s listed by a single owner.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OwnerTotals {
    /// Number of [`Item`]s the owner has listed.
    pub items: usize,

    /// [`Co2Savings`] summed across the owner's [`Item`]s.
    pub co2: Co2Savings,
}

/// Count of [`Item`]s listed under a single [`item::Category`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CategoryCount {
    /// [`item::Category`] the count is for.
    pub category: item::Category,

    /// Number of [`Item`]s listed under the [`item::Category`].
    pub items: usize,
}

/// [`Co2Savings`] accumulated within and by the end of a [`Month`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrendPoint {
    /// [`Month`] this point represents.
    pub month: Month,

    /// [`Co2Savings`] of the [`Item`]s listed within the [`Month`], rounded
    /// to whole kilograms.
    pub co2: Co2Savings,

    /// [`Co2Savings`] accumulated since the beginning of time up to and
    /// including the [`Month`], rounded to whole kilograms.
    pub cumulative_co2: Co2Savings,
}

/// Calendar month a [`TrendPoint`] is bucketed into.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[display("{} {year}", Self::NAMES[usize::from(*month) - 1])]
pub struct Month {
    /// Year of this [`Month`].
    pub year: i32,

    /// 1-indexed month of the year.
    pub month: u8,
}

impl Month {
    /// Short display names of the months of a year.
    const NAMES: [&'static str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct",
        "Nov", "Dec",
    ];
}

/// Ranked contributing [`Profile`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contributor {
    /// ID of the contributing [`Profile`].
    pub id: profile::Id,

    /// [`profile::Username`] of the contributor, falling back to a
    /// placeholder when the [`Profile`] is gone.
    pub username: profile::Username,

    /// Number of [`Item`]s the contributor has listed.
    pub items: usize,

    /// [`Co2Savings`] summed across the contributor's [`Item`]s.
    pub co2: Co2Savings,
}

/// Sums [`Co2Savings`] across the given [`Item`]s, with absent values
/// counting as zero.
#[must_use]
pub fn total_co2(items: &[Item]) -> Co2Savings {
    items.iter().map(Item::co2_or_zero).sum()
}

/// Totals the [`Item`]s of the given `owner_id` in a single pass.
#[must_use]
pub fn owner_totals(items: &[Item], owner_id: profile::Id) -> OwnerTotals {
    items
        .iter()
        .filter(|i| i.owner_id == owner_id)
        .fold(OwnerTotals::default(), |totals, i| OwnerTotals {
            items: totals.items + 1,
            co2: totals.co2 + i.co2_or_zero(),
        })
}

/// Counts [`Item`]s per [`item::Category`].
///
/// Categories are reported in the order they first occur in the input, so
/// a stable input ordering yields a stable report.
#[must_use]
pub fn categories(items: &[Item]) -> Vec<CategoryCount> {
    let mut counts = Vec::<CategoryCount>::new();
    for item in items {
        if let Some(c) =
            counts.iter_mut().find(|c| c.category == item.category)
        {
            c.items += 1;
        } else {
            counts.push(CategoryCount {
                category: item.category.clone(),
                items: 1,
            });
        }
    }
    counts
}

/// Buckets the given [`Item`]s into calendar months of their creation and
/// accumulates [`Co2Savings`] across them, oldest first.
///
/// The cumulative sums always run from the very first month, even when only
/// the last `months` points are kept, so truncation never changes the
/// retained values. Months without listings are skipped rather than
/// interpolated.
#[must_use]
pub fn monthly_trend(items: &[Item], months: usize) -> Vec<TrendPoint> {
    let mut by_month = HashMap::<Month, Co2Savings>::new();
    for item in items {
        let (year, month) = item.created_at.year_month();
        let entry = by_month
            .entry(Month { year, month })
            .or_insert(Co2Savings::ZERO);
        *entry = *entry + item.co2_or_zero();
    }

    let mut buckets: Vec<_> = by_month.into_iter().collect();
    buckets.sort_by_key(|(month, _)| *month);

    let mut running = Co2Savings::ZERO;
    let mut trend: Vec<_> = buckets
        .into_iter()
        .map(|(month, co2)| {
            running = running + co2;
            TrendPoint {
                month,
                co2: co2.round(),
                cumulative_co2: running.round(),
            }
        })
        .collect();

    if trend.len() > months {
        trend.drain(..trend.len() - months);
    }
    trend
}

/// Ranks contributing [`Profile`]s by their summed [`Co2Savings`], biggest
/// first.
///
/// Ties keep the order the contributors first occur in the input. A
/// contributor whose [`Profile`] is absent from the `profiles` mapping is
/// reported under a placeholder [`profile::Username`].
#[must_use]
pub fn top_contributors(
    items: &[Item],
    profiles: &HashMap<profile::Id, Profile>,
    limit: usize,
) -> Vec<Contributor> {
    let mut contributors = Vec::<Contributor>::new();
    for item in items {
        if let Some(c) =
            contributors.iter_mut().find(|c| c.id == item.owner_id)
        {
            c.items += 1;
            c.co2 = c.co2 + item.co2_or_zero();
        } else {
            contributors.push(Contributor {
                id: item.owner_id,
                username: profiles.get(&item.owner_id).map_or_else(
                    profile::Username::anonymous,
                    |p| p.username.clone(),
                ),
                items: 1,
                co2: item.co2_or_zero(),
            });
        }
    }
    contributors.sort_by(|a, b| b.co2.cmp(&a.co2));
    contributors.truncate(limit);
    contributors
}

impl<Db> Query<Impact> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Item>, read::item::list::Filter>>,
            Ok = Vec<Item>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<read::item::list::TotalCount, read::item::list::Filter>,
            >,
            Ok = read::item::list::TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::profile::TotalCount, ()>>,
            Ok = read::profile::TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<profile::Id, Profile>, Vec<profile::Id>>>,
            Ok = HashMap<profile::Id, Profile>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Snapshot;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Impact { viewer }: Impact,
    ) -> Result<Self::Ok, Self::Err> {
        let (items, total_items, total_users) = try_join!(
            async {
                self.database()
                    .execute(Select(By::<Vec<Item>, _>::new(
                        read::item::list::Filter::default(),
                    )))
                    .await
                    .map_err(tracerr::wrap!())
            },
            async {
                self.database()
                    .execute(Select(
                        By::<read::item::list::TotalCount, _>::new(
                            read::item::list::Filter::default(),
                        ),
                    ))
                    .await
                    .map_err(tracerr::wrap!())
            },
            async {
                self.database()
                    .execute(Select(By::<read::profile::TotalCount, _>::new(
                        (),
                    )))
                    .await
                    .map_err(tracerr::wrap!())
            },
        )?;

        let owner_ids: Vec<_> = items.iter().map(|i| i.owner_id).collect();
        let profiles = self
            .database()
            .execute(Select(By::<HashMap<profile::Id, Profile>, _>::new(
                owner_ids,
            )))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Snapshot {
            total_items,
            total_users,
            total_co2: total_co2(&items),
            viewer: viewer
                .id()
                .map(|id| owner_totals(&items, id))
                .unwrap_or_default(),
            categories: categories(&items),
            trend: monthly_trend(&items, self.config().trend_months),
            top_contributors: top_contributors(
                &items,
                &profiles,
                self.config().top_contributors,
            ),
        })
    }
}
