//! Catalog filtering and sorting.

use common::{define_kind, Price};
use smart_default::SmartDefault;

use crate::domain::{item, Item};

/// Combined search/filter/sort request over the catalog.
///
/// The default [`Filter`] matches everything and orders newest first.
#[derive(Clone, Debug, SmartDefault)]
pub struct Filter {
    /// Free text matched case-insensitively against [`item::Title`] and
    /// [`item::Description`].
    ///
    /// Empty or absent text matches every [`Item`].
    pub search: Option<String>,

    /// [`item::Category`] to narrow down to, if any.
    pub category: Option<item::Category>,

    /// [`item::Condition`] to narrow down to, if any.
    pub condition: Option<item::Condition>,

    /// Inclusive [`Price`] bound.
    pub price: PriceRange,

    /// Ordering of the matched [`Item`]s.
    #[default(SortKey::NewestFirst)]
    pub sort: SortKey,
}

impl Filter {
    /// Checks whether the given [`Item`] satisfies every predicate of this
    /// [`Filter`].
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        self.matches_search(item)
            && self
                .category
                .as_ref()
                .map_or(true, |c| item.category == *c)
            && self
                .condition
                .as_ref()
                .map_or(true, |c| item.condition == *c)
            && self.price.contains(item.price_or_zero())
    }

    /// Checks the free-text predicate of this [`Filter`] against the given
    /// [`Item`].
    fn matches_search(&self, item: &Item) -> bool {
        let Some(search) = self.search.as_deref() else {
            return true;
        };
        if search.is_empty() {
            return true;
        }

        let needle = search.to_lowercase();
        AsRef::<str>::as_ref(&item.title)
            .to_lowercase()
            .contains(&needle)
            || AsRef::<str>::as_ref(&item.description)
                .to_lowercase()
                .contains(&needle)
    }
}

/// Inclusive `[min, max]` bound on an [`Item`] [`Price`].
///
/// A bound with `min > max` is satisfiable by no [`Price`], so filtering
/// with it yields an empty result rather than an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct PriceRange {
    /// Lower bound, inclusive.
    #[default(Price::ZERO)]
    pub min: Price,

    /// Upper bound, inclusive.
    #[default(Price::MAX)]
    pub max: Price,
}

impl PriceRange {
    /// Checks whether the given [`Price`] lies within this [`PriceRange`].
    #[must_use]
    pub fn contains(self, price: Price) -> bool {
        self.min <= price && price <= self.max
    }
}

define_kind! {
    #[doc = "Ordering of catalog [`Item`]s."]
    enum SortKey {
        #[doc = "Most recently created first."]
        NewestFirst = 1,

        #[doc = "Cheapest first."]
        PriceAscending = 2,

        #[doc = "Most expensive first."]
        PriceDescending = 3,

        #[doc = "Biggest CO₂ savings first."]
        Co2Descending = 4,
    }
}

/// Applies the given [`Filter`] to the provided [`Item`]s.
///
/// Pure function of its inputs: the result is always a subset of the input
/// satisfying every predicate, ordered by the [`Filter`]'s [`SortKey`] with
/// a stable sort (equal keys keep their input order). Absent
/// [`Price`]/CO₂ values compare as zero.
#[must_use]
pub fn apply(
    items: impl IntoIterator<Item = Item>,
    filter: &Filter,
) -> Vec<Item> {
    let mut matched: Vec<_> =
        items.into_iter().filter(|i| filter.matches(i)).collect();
    match filter.sort {
        SortKey::NewestFirst => {
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        SortKey::PriceAscending => {
            matched.sort_by(|a, b| a.price_or_zero().cmp(&b.price_or_zero()));
        }
        SortKey::PriceDescending => {
            matched.sort_by(|a, b| b.price_or_zero().cmp(&a.price_or_zero()));
        }
        SortKey::Co2Descending => {
            matched.sort_by(|a, b| b.co2_or_zero().cmp(&a.co2_or_zero()));
        }
    }
    matched
}

#[cfg(test)]
mod spec {
    use common::{Co2Savings, DateTime, Price};

    use crate::domain::{item, profile, Item};

    use super::{apply, Filter, PriceRange, SortKey};

    fn item(
        title: &str,
        price: Option<&str>,
        co2: Option<&str>,
        category: &str,
        timestamp: i64,
    ) -> Item {
        Item {
            id: item::Id::new(),
            title: item::Title::new(title).unwrap(),
            description: item::Description::new(format!("{title} description"))
                .unwrap(),
            price: price.map(|p| Price::new(p.parse().unwrap()).unwrap()),
            image_url: item::ImageUrl::new("https://img.test/1.jpg").unwrap(),
            co2_saved: co2
                .map(|c| Co2Savings::new(c.parse().unwrap()).unwrap()),
            category: item::Category::from(category),
            condition: item::Condition::from("Good"),
            created_at: DateTime::from_unix_timestamp(timestamp)
                .unwrap()
                .coerce(),
            owner_id: profile::Id::new(),
        }
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_ref()).collect()
    }

    #[test]
    fn narrows_down_by_category() {
        let items = vec![
            item("Compost bin", Some("10"), Some("5"), "Garden", 1),
            item("Solar charger", Some("50"), Some("20"), "Electronics", 2),
        ];
        let filter = Filter {
            category: Some(item::Category::from("Garden")),
            ..Filter::default()
        };

        assert_eq!(titles(&apply(items, &filter)), ["Compost bin"]);
    }

    #[test]
    fn searches_title_and_description_case_insensitively() {
        let items = vec![
            item("Bamboo Cutlery", Some("5"), None, "Lifestyle", 1),
            item("City bike", Some("120"), Some("80"), "Transportation", 2),
        ];
        let filter = Filter {
            search: Some("bamboo".into()),
            ..Filter::default()
        };
        assert_eq!(titles(&apply(items.clone(), &filter)), ["Bamboo Cutlery"]);

        // Matches against the description as well.
        let filter = Filter {
            search: Some("BIKE DESCRIPTION".into()),
            ..Filter::default()
        };
        assert_eq!(titles(&apply(items.clone(), &filter)), ["City bike"]);

        // Empty search matches everything.
        let filter = Filter {
            search: Some(String::new()),
            ..Filter::default()
        };
        assert_eq!(apply(items, &filter).len(), 2);
    }

    #[test]
    fn zero_width_price_bound_is_inclusive() {
        let items = vec![
            item("Freebie", Some("0"), None, "Lifestyle", 1),
            item("Cheap", Some("5"), None, "Lifestyle", 2),
            item("Pricey", Some("10"), None, "Lifestyle", 3),
        ];
        let filter = Filter {
            price: PriceRange {
                min: Price::ZERO,
                max: Price::ZERO,
            },
            ..Filter::default()
        };

        assert_eq!(titles(&apply(items, &filter)), ["Freebie"]);
    }

    #[test]
    fn inverted_price_bound_yields_empty_result() {
        let items = vec![item("Cheap", Some("5"), None, "Lifestyle", 1)];
        let filter = Filter {
            price: PriceRange {
                min: Price::new(10.into()).unwrap(),
                max: Price::new(1.into()).unwrap(),
            },
            ..Filter::default()
        };

        assert!(apply(items, &filter).is_empty());
    }

    #[test]
    fn sorts_newest_first_by_default() {
        let items = vec![
            item("Old", Some("1"), None, "Garden", 100),
            item("New", Some("1"), None, "Garden", 300),
            item("Middle", Some("1"), None, "Garden", 200),
        ];

        assert_eq!(
            titles(&apply(items, &Filter::default())),
            ["New", "Middle", "Old"],
        );
    }

    #[test]
    fn price_sorts_are_stable_for_equal_prices() {
        let items = vec![
            item("A", Some("5"), None, "Garden", 1),
            item("B", Some("5"), None, "Garden", 2),
            item("C", Some("1"), None, "Garden", 3),
        ];
        let filter = Filter {
            sort: SortKey::PriceAscending,
            ..Filter::default()
        };
        assert_eq!(titles(&apply(items.clone(), &filter)), ["C", "A", "B"]);

        let filter = Filter {
            sort: SortKey::PriceDescending,
            ..Filter::default()
        };
        assert_eq!(titles(&apply(items, &filter)), ["A", "B", "C"]);
    }

    #[test]
    fn missing_co2_sorts_as_zero() {
        let items = vec![
            item("None", Some("1"), None, "Garden", 1),
            item("Big", Some("1"), Some("20"), "Garden", 2),
            item("Small", Some("1"), Some("5"), "Garden", 3),
        ];
        let filter = Filter {
            sort: SortKey::Co2Descending,
            ..Filter::default()
        };

        assert_eq!(titles(&apply(items, &filter)), ["Big", "Small", "None"]);
    }

    #[test]
    fn is_idempotent_and_returns_a_matching_subset() {
        let items = vec![
            item("Compost bin", Some("10"), Some("5"), "Garden", 1),
            item("Solar charger", Some("50"), Some("20"), "Electronics", 2),
            item("City bike", Some("120"), Some("80"), "Transportation", 3),
        ];
        let filter = Filter {
            search: Some("o".into()),
            price: PriceRange {
                min: Price::ZERO,
                max: Price::new(60.into()).unwrap(),
            },
            sort: SortKey::PriceAscending,
            ..Filter::default()
        };

        let once = apply(items.clone(), &filter);
        assert!(once.iter().all(|i| filter.matches(i)));
        assert!(once
            .iter()
            .all(|i| items.iter().any(|source| source.id == i.id)));

        let twice = apply(once.clone(), &filter);
        assert_eq!(titles(&twice), titles(&once));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(apply(vec![], &Filter::default()).is_empty());
    }

    #[test]
    fn unknown_labels_are_matched_verbatim() {
        let items = vec![
            item("Odd one", Some("1"), None, "Upcycled", 1),
            item("Compost bin", Some("1"), None, "Garden", 2),
        ];
        let filter = Filter {
            category: Some(item::Category::from("Upcycled")),
            ..Filter::default()
        };

        assert_eq!(titles(&apply(items, &filter)), ["Odd one"]);
    }
}
