//! [`Query`] collection related to the multiple [`Item`].

use common::operations::By;

use crate::{domain::Item, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`Item`]s.
pub type List = DatabaseQuery<By<Vec<Item>, read::item::list::Filter>>;

/// Queries total count of [`Item`] list items.
pub type TotalCount =
    DatabaseQuery<By<read::item::list::TotalCount, read::item::list::Filter>>;
