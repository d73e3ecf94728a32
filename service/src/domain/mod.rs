//! Domain definitions.

pub mod favorite;
pub mod item;
pub mod profile;
pub mod viewer;

pub use self::{
    favorite::Favorite, item::Item, profile::Profile, viewer::Viewer,
};
