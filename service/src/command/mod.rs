//! [`Command`] definition.

pub mod create_item;
pub mod toggle_favorite;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{create_item::CreateItem, toggle_favorite::ToggleFavorite};
