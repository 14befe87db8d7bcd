use std::sync::Arc;

use anyhow::Context;
use authn_resolver_sdk::AuthNResolverClient;
use axum::Router;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes;
use crate::config::EstateConfig;
use crate::domain::gate::AccessGate;
use crate::domain::service::{
    DbProvider, FeesService, HierarchyService, MembersService, ProfilesService, ServiceConfig,
};
use crate::domain::session::SessionResolver;
use crate::infra::storage::{Migrator, OrmEntityStore};

/// Every service of the module, wired to the SeaORM entity store.
pub struct AppServices {
    pub hierarchy: HierarchyService<OrmEntityStore>,
    pub members: MembersService<OrmEntityStore>,
    pub profiles: ProfilesService<OrmEntityStore>,
    pub fees: FeesService<OrmEntityStore>,
    pub sessions: SessionResolver<OrmEntityStore>,
    pub gate: AccessGate,
}

impl AppServices {
    /// Wire the services. The database handle and the authentication client
    /// are passed in; nothing is looked up globally.
    ///
    /// # Errors
    ///
    /// Fails if the route gate cannot be built.
    pub fn new(
        db: Arc<DbProvider>,
        authn: Arc<dyn AuthNResolverClient>,
        cfg: &EstateConfig,
    ) -> anyhow::Result<Self> {
        let store = Arc::new(OrmEntityStore::new());
        let service_config = ServiceConfig::from(cfg);

        Ok(Self {
            hierarchy: HierarchyService::new(db.clone(), store.clone(), service_config.clone()),
            members: MembersService::new(db.clone(), store.clone(), service_config.clone()),
            profiles: ProfilesService::new(db.clone(), store.clone()),
            fees: FeesService::new(db.clone(), store.clone(), service_config),
            sessions: SessionResolver::new(db, store, authn),
            gate: AccessGate::new().context("failed to build route gate")?,
        })
    }
}

/// The estate module: migrated database, services and HTTP router.
#[derive(Clone)]
pub struct EstateModule {
    services: Arc<AppServices>,
}

impl EstateModule {
    /// Apply pending migrations and wire the services.
    ///
    /// # Errors
    ///
    /// Fails if migrations cannot be applied or the services cannot be built.
    pub async fn init(
        db: DbProvider,
        authn: Arc<dyn AuthNResolverClient>,
        cfg: &EstateConfig,
    ) -> anyhow::Result<Self> {
        info!("Initializing estate module");

        Migrator::up(&db, None)
            .await
            .context("failed to apply estate migrations")?;
        info!("Estate migrations applied");

        let services = Arc::new(AppServices::new(Arc::new(db), authn, cfg)?);
        Ok(Self { services })
    }

    #[must_use]
    pub fn services(&self) -> &Arc<AppServices> {
        &self.services
    }

    /// The full route surface with session, gate and tracing layers.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.services.clone())
    }
}
