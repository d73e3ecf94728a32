//! [`Favorite`] definitions.

use std::collections::HashSet;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, Error};

use super::{item, profile, Viewer};
#[cfg(doc)]
use super::{Item, Profile};

/// Viewer-scoped bookmark of an [`Item`].
///
/// At most one [`Favorite`] per ([`Profile`], [`Item`]) pair exists; the
/// backend enforces that uniqueness, not this core.
#[derive(Clone, Copy, Debug)]
pub struct Favorite {
    /// ID of the [`Profile`] this [`Favorite`] belongs to.
    pub viewer_id: profile::Id,

    /// ID of the [`Item`] this [`Favorite`] points at.
    pub item_id: item::Id,

    /// [`DateTime`] when this [`Favorite`] was created.
    pub created_at: CreationDateTime,
}

/// [`DateTime`] when a [`Favorite`] was created.
pub type CreationDateTime = DateTimeOf<(Favorite, unit::Creation)>;

/// Per-[`Viewer`] projection of the favorited [`Item`]s set.
///
/// Toggles are two-phase: [`Projection::begin`] flips the state
/// optimistically and hands out a [`Toggle`] that must either be
/// [`commit`]ted once the backend confirms the change, or [`revert`]ed to
/// roll the flip back. While a [`Toggle`] for an [`Item`] is outstanding,
/// further toggles for the same [`Item`] are rejected.
///
/// [`commit`]: Projection::commit
/// [`revert`]: Projection::revert
#[derive(Clone, Debug)]
pub struct Projection {
    /// [`Viewer`] this [`Projection`] belongs to.
    viewer: Viewer,

    /// IDs of the [`Item`]s the [`Viewer`] has favorited.
    favorited: HashSet<item::Id>,

    /// IDs of the [`Item`]s with an outstanding [`Toggle`].
    in_flight: HashSet<item::Id>,
}

impl Projection {
    /// Creates a new [`Projection`] from the backend's current [`Favorite`]
    /// set.
    ///
    /// Relations belonging to other viewers are ignored, and an
    /// [anonymous] [`Viewer`] always starts empty.
    ///
    /// [anonymous]: Viewer::Anonymous
    #[must_use]
    pub fn new(
        viewer: Viewer,
        favorites: impl IntoIterator<Item = Favorite>,
    ) -> Self {
        let favorited = viewer
            .id()
            .map(|id| {
                favorites
                    .into_iter()
                    .filter(|f| f.viewer_id == id)
                    .map(|f| f.item_id)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            viewer,
            favorited,
            in_flight: HashSet::new(),
        }
    }

    /// Returns the [`Viewer`] of this [`Projection`].
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        self.viewer
    }

    /// Indicates whether the given [`Item`] is currently favorited.
    #[must_use]
    pub fn is_favorited(&self, item_id: item::Id) -> bool {
        self.favorited.contains(&item_id)
    }

    /// Returns an [`Iterator`] over the currently favorited [`Item`] IDs.
    pub fn iter(&self) -> impl Iterator<Item = item::Id> + '_ {
        self.favorited.iter().copied()
    }

    /// Returns the number of currently favorited [`Item`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.favorited.len()
    }

    /// Indicates whether no [`Item`] is currently favorited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favorited.is_empty()
    }

    /// Begins a toggle of the given [`Item`], flipping its state
    /// optimistically.
    ///
    /// # Errors
    ///
    /// - [`BeginError::AuthorizationRequired`] if the [`Viewer`] is not
    ///   signed in (no flip happens, and the backend must not be called).
    /// - [`BeginError::InFlight`] if a [`Toggle`] for the same [`Item`] is
    ///   outstanding already.
    pub fn begin(&mut self, item_id: item::Id) -> Result<Toggle, BeginError> {
        let Some(viewer_id) = self.viewer.id() else {
            return Err(BeginError::AuthorizationRequired);
        };
        if !self.in_flight.insert(item_id) {
            return Err(BeginError::InFlight(item_id));
        }

        let action = if self.favorited.remove(&item_id) {
            Action::Remove
        } else {
            _ = self.favorited.insert(item_id);
            Action::Add
        };

        Ok(Toggle {
            viewer_id,
            item_id,
            action,
        })
    }

    /// Commits the given [`Toggle`], retaining its optimistic flip.
    pub fn commit(&mut self, toggle: Toggle) {
        _ = self.in_flight.remove(&toggle.item_id);
    }

    /// Reverts the given [`Toggle`], rolling its optimistic flip back.
    pub fn revert(&mut self, toggle: Toggle) {
        _ = self.in_flight.remove(&toggle.item_id);
        match toggle.action {
            Action::Add => {
                _ = self.favorited.remove(&toggle.item_id);
            }
            Action::Remove => {
                _ = self.favorited.insert(toggle.item_id);
            }
        }
    }
}

/// Outstanding optimistic flip of a single [`Item`] in a [`Projection`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Toggle {
    /// ID of the [`Profile`] performing this [`Toggle`].
    pub viewer_id: profile::Id,

    /// ID of the toggled [`Item`].
    pub item_id: item::Id,

    /// [`Action`] the backend has to perform for this [`Toggle`].
    pub action: Action,
}

/// Backend action of a [`Toggle`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    /// Create the [`Favorite`] relation.
    Add,

    /// Delete the [`Favorite`] relation.
    Remove,
}

/// Error of beginning a [`Toggle`] on a [`Projection`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum BeginError {
    /// [`Viewer`] is not signed in.
    #[display("signing in is required to favorite items")]
    AuthorizationRequired,

    /// Another [`Toggle`] for the same [`Item`] is outstanding.
    #[display("`Favorite` toggle for `Item(id: {_0})` is already in flight")]
    InFlight(#[error(not(source))] item::Id),
}

#[cfg(test)]
mod spec {
    use crate::domain::{item, profile, Viewer};

    use super::{Action, BeginError, Projection};

    fn authenticated() -> Projection {
        Projection::new(Viewer::from(profile::Id::new()), [])
    }

    #[test]
    fn anonymous_toggle_is_rejected_without_state_change() {
        let mut projection = Projection::new(Viewer::Anonymous, []);
        let item_id = item::Id::new();

        assert_eq!(
            projection.begin(item_id),
            Err(BeginError::AuthorizationRequired),
        );
        assert!(!projection.is_favorited(item_id));
        assert!(projection.is_empty());
    }

    #[test]
    fn toggle_round_trip_restores_initial_state() {
        let mut projection = authenticated();
        let item_id = item::Id::new();

        let toggle = projection.begin(item_id).unwrap();
        assert_eq!(toggle.action, Action::Add);
        assert!(projection.is_favorited(item_id));
        projection.commit(toggle);

        let toggle = projection.begin(item_id).unwrap();
        assert_eq!(toggle.action, Action::Remove);
        assert!(!projection.is_favorited(item_id));
        projection.commit(toggle);

        assert!(!projection.is_favorited(item_id));
    }

    #[test]
    fn revert_rolls_optimistic_flip_back() {
        let mut projection = authenticated();
        let item_id = item::Id::new();

        let toggle = projection.begin(item_id).unwrap();
        assert!(projection.is_favorited(item_id));
        projection.revert(toggle);
        assert!(!projection.is_favorited(item_id));

        // And the same the other way around.
        let toggle = projection.begin(item_id).unwrap();
        projection.commit(toggle);
        let toggle = projection.begin(item_id).unwrap();
        assert!(!projection.is_favorited(item_id));
        projection.revert(toggle);
        assert!(projection.is_favorited(item_id));
    }

    #[test]
    fn second_toggle_for_same_item_is_rejected_while_in_flight() {
        let mut projection = authenticated();
        let item_id = item::Id::new();

        let toggle = projection.begin(item_id).unwrap();
        assert_eq!(
            projection.begin(item_id),
            Err(BeginError::InFlight(item_id)),
        );

        // Toggles for other items stay independent.
        let other = projection.begin(item::Id::new()).unwrap();
        projection.commit(other);

        projection.commit(toggle);
        assert!(projection.begin(item_id).is_ok());
    }

    #[test]
    fn initial_state_is_derived_from_viewer_relations_only() {
        use common::DateTime;

        use super::Favorite;

        let viewer_id = profile::Id::new();
        let mine = item::Id::new();
        let theirs = item::Id::new();

        let projection = Projection::new(
            Viewer::from(viewer_id),
            [
                Favorite {
                    viewer_id,
                    item_id: mine,
                    created_at: DateTime::now().coerce(),
                },
                Favorite {
                    viewer_id: profile::Id::new(),
                    item_id: theirs,
                    created_at: DateTime::now().coerce(),
                },
            ],
        );

        assert!(projection.is_favorited(mine));
        assert!(!projection.is_favorited(theirs));
        assert_eq!(projection.len(), 1);
    }
}
