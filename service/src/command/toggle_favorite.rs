//! [`Command`] for toggling a [`Favorite`] relation.

use common::{
    operations::{By, Delete, Insert},
    DateTime,
};
use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{favorite, item, profile, Favorite},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for persisting a single [`favorite::Toggle`] on the backend.
#[derive(Clone, Copy, Debug)]
pub struct ToggleFavorite(pub favorite::Toggle);

impl<Db> Command<ToggleFavorite> for Service<Db>
where
    Db: Database<Insert<Favorite>, Err = Traced<database::Error>>
        + Database<
            Delete<By<Favorite, (profile::Id, item::Id)>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ToggleFavorite(toggle): ToggleFavorite,
    ) -> Result<Self::Ok, Self::Err> {
        match toggle.action {
            favorite::Action::Add => self
                .database()
                .execute(Insert(Favorite {
                    viewer_id: toggle.viewer_id,
                    item_id: toggle.item_id,
                    created_at: DateTime::now().coerce(),
                }))
                .await
                .map_err(tracerr::wrap!())
                .map(drop),
            favorite::Action::Remove => self
                .database()
                .execute(Delete(By::new((toggle.viewer_id, toggle.item_id))))
                .await
                .map_err(tracerr::wrap!())
                .map(drop),
        }
    }
}

/// Error of [`ToggleFavorite`] [`Command`] execution.
pub type ExecutionError = database::Error;

impl<Db> Service<Db>
where
    Db: Database<Insert<Favorite>, Err = Traced<database::Error>>
        + Database<
            Delete<By<Favorite, (profile::Id, item::Id)>>,
            Err = Traced<database::Error>,
        >,
{
    /// Toggles the given [`Item`] in the [`favorite::Projection`], keeping
    /// it in sync with the backend.
    ///
    /// The flip is applied optimistically before the backend is called, and
    /// rolled back if the call fails.
    ///
    /// # Errors
    ///
    /// - [`ToggleError::Rejected`] if the [`favorite::Projection`] refuses
    ///   the toggle (no backend call happens).
    /// - [`ToggleError::Backend`] if persisting fails (the flip is rolled
    ///   back).
    ///
    /// [`Item`]: crate::domain::Item
    pub async fn toggle_favorite(
        &self,
        projection: &mut favorite::Projection,
        item_id: item::Id,
    ) -> Result<favorite::Toggle, Traced<ToggleError>> {
        let toggle = projection
            .begin(item_id)
            .map_err(tracerr::from_and_wrap!(=> ToggleError))?;

        match self.execute(ToggleFavorite(toggle)).await {
            Ok(()) => {
                projection.commit(toggle);
                Ok(toggle)
            }
            Err(e) => {
                projection.revert(toggle);
                log::warn!(%item_id, "reverted `Favorite` toggle: {e}");
                Err(e).map_err(tracerr::map_from_and_wrap!(=> ToggleError))
            }
        }
    }
}

/// Error of toggling a [`Favorite`] via [`Service::toggle_favorite`].
#[derive(Debug, Display, From, StdError)]
pub enum ToggleError {
    /// [`favorite::Projection`] refused the toggle.
    Rejected(favorite::BeginError),

    /// Persisting the toggle on the backend failed.
    Backend(database::Error),
}

#[cfg(test)]
mod spec {
    use std::{cell::RefCell, collections::HashSet};

    use common::{
        operations::{By, Delete, Insert},
        Handler,
    };
    use futures::executor::block_on;
    use tracerr::Traced;

    use crate::{
        domain::{favorite, item, profile, Favorite, Viewer},
        infra::database,
        Config, Service,
    };

    use super::ToggleError;

    /// In-memory stand-in for the backend `favorites` relation.
    #[derive(Debug, Default)]
    struct StubDb {
        favorites: RefCell<HashSet<(profile::Id, item::Id)>>,
        failing: bool,
    }

    impl StubDb {
        fn fail(&self) -> Option<Traced<database::Error>> {
            #[cfg(feature = "rest")]
            if self.failing {
                return Some(tracerr::new!(database::Error::Rest(
                    crate::infra::database::rest::Error::NotFound,
                )));
            }
            _ = self.failing;
            None
        }
    }

    impl Handler<Insert<Favorite>> for StubDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(favorite): Insert<Favorite>,
        ) -> Result<Self::Ok, Self::Err> {
            if let Some(e) = self.fail() {
                return Err(e);
            }
            _ = self
                .favorites
                .borrow_mut()
                .insert((favorite.viewer_id, favorite.item_id));
            Ok(())
        }
    }

    impl Handler<Delete<By<Favorite, (profile::Id, item::Id)>>> for StubDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Delete(by): Delete<By<Favorite, (profile::Id, item::Id)>>,
        ) -> Result<Self::Ok, Self::Err> {
            if let Some(e) = self.fail() {
                return Err(e);
            }
            _ = self.favorites.borrow_mut().remove(&by.into_inner());
            Ok(())
        }
    }

    fn service(failing: bool) -> Service<StubDb> {
        Service::new(
            Config::default(),
            StubDb {
                failing,
                ..StubDb::default()
            },
        )
    }

    #[test]
    fn round_trip_syncs_projection_and_backend() {
        let service = service(false);
        let viewer_id = profile::Id::new();
        let mut projection =
            favorite::Projection::new(Viewer::from(viewer_id), []);
        let item_id = item::Id::new();

        let toggle =
            block_on(service.toggle_favorite(&mut projection, item_id))
                .unwrap();
        assert_eq!(toggle.action, favorite::Action::Add);
        assert!(projection.is_favorited(item_id));
        assert!(service
            .database()
            .favorites
            .borrow()
            .contains(&(viewer_id, item_id)));

        let toggle =
            block_on(service.toggle_favorite(&mut projection, item_id))
                .unwrap();
        assert_eq!(toggle.action, favorite::Action::Remove);
        assert!(!projection.is_favorited(item_id));
        assert!(service.database().favorites.borrow().is_empty());
    }

    #[test]
    fn anonymous_viewer_is_rejected_without_backend_call() {
        let service = service(false);
        let mut projection =
            favorite::Projection::new(Viewer::Anonymous, []);

        let err = block_on(
            service.toggle_favorite(&mut projection, item::Id::new()),
        )
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ToggleError::Rejected(
                favorite::BeginError::AuthorizationRequired,
            ),
        ));
        assert!(service.database().favorites.borrow().is_empty());
    }

    #[cfg(feature = "rest")]
    #[test]
    fn backend_failure_rolls_the_flip_back() {
        let service = service(true);
        let mut projection =
            favorite::Projection::new(Viewer::from(profile::Id::new()), []);
        let item_id = item::Id::new();

        let err = block_on(service.toggle_favorite(&mut projection, item_id))
            .unwrap_err();

        assert!(matches!(err.into_inner(), ToggleError::Backend(_)));
        assert!(!projection.is_favorited(item_id));

        // The item is togglable again once the failure is rolled back.
        assert!(projection.begin(item_id).is_ok());
    }
}
