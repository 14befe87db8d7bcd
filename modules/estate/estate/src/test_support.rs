#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use authn_resolver_sdk::AuthNResolverClient;
use estate_sdk::{Building, ColonyHint, Flat, Member, NewBuilding, NewFlat, NewMember, UserProfile};
use estate_security::{Principal, Role};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use static_authn_plugin::StaticAuthNPlugin;
use static_authn_plugin::config::{
    AuthNMode, IdentityConfig, StaticAuthNPluginConfig, TokenMapping,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::repos::ProfilesRepository;
use crate::domain::service::{
    DbProvider, FeesService, HierarchyService, MembersService, ServiceConfig,
};
use crate::infra::storage::{Migrator, OrmEntityStore};

/// Create an in-memory database for testing.
///
/// A single pooled connection, so every query sees the same database.
pub async fn inmem_db() -> (Arc<DbProvider>, Arc<OrmEntityStore>) {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    (Arc::new(db), Arc::new(OrmEntityStore::new()))
}

/// Builder for a static-token authentication backend.
#[derive(Default)]
pub struct StaticTokens {
    tokens: Vec<TokenMapping>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: &str, subject_id: Uuid, email: &str) -> Self {
        self.tokens.push(TokenMapping {
            token: token.to_owned(),
            identity: IdentityConfig {
                subject_id,
                email: email.to_owned(),
            },
        });
        self
    }

    pub fn client(self) -> Arc<dyn AuthNResolverClient> {
        let cfg = StaticAuthNPluginConfig {
            mode: AuthNMode::StaticTokens,
            tokens: self.tokens,
            ..Default::default()
        };
        Arc::new(StaticAuthNPlugin::from_config(&cfg))
    }

    /// A backend that fails every call as unreachable.
    pub fn unavailable() -> Arc<dyn AuthNResolverClient> {
        let cfg = StaticAuthNPluginConfig {
            unavailable: true,
            ..Default::default()
        };
        Arc::new(StaticAuthNPlugin::from_config(&cfg))
    }
}

pub async fn seed_profile(
    db: &Arc<DbProvider>,
    store: &Arc<OrmEntityStore>,
    id: Uuid,
    role: Role,
) -> UserProfile {
    let now = OffsetDateTime::now_utc();
    let profile = UserProfile {
        id,
        email: format!("{id}@example.com"),
        role,
        first_name: "Test".to_owned(),
        last_name: role.as_str().to_owned(),
        colony_id: None,
        building_id: None,
        flat_id: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    store
        .insert_profile(db.as_ref(), profile)
        .await
        .expect("Failed to seed profile")
}

/// Principal with the given role and no jurisdiction restriction.
pub fn principal(role: Role) -> Principal {
    Principal::builder()
        .id(Uuid::new_v4())
        .email(format!("{role}@example.com"))
        .role(role)
        .build()
}

pub fn hierarchy(
    db: &Arc<DbProvider>,
    store: &Arc<OrmEntityStore>,
) -> HierarchyService<OrmEntityStore> {
    HierarchyService::new(db.clone(), store.clone(), ServiceConfig::default())
}

pub fn members(db: &Arc<DbProvider>, store: &Arc<OrmEntityStore>) -> MembersService<OrmEntityStore> {
    MembersService::new(db.clone(), store.clone(), ServiceConfig::default())
}

pub fn fees(db: &Arc<DbProvider>, store: &Arc<OrmEntityStore>) -> FeesService<OrmEntityStore> {
    FeesService::new(db.clone(), store.clone(), ServiceConfig::default())
}

/// A building in the (implicit) default colony.
pub async fn seed_building(db: &Arc<DbProvider>, store: &Arc<OrmEntityStore>, name: &str) -> Building {
    hierarchy(db, store)
        .ensure_building(
            &principal(Role::SuperAdmin),
            ColonyHint::Implicit,
            NewBuilding {
                name: name.to_owned(),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to seed building")
}

pub async fn seed_flat(
    db: &Arc<DbProvider>,
    store: &Arc<OrmEntityStore>,
    building_id: Uuid,
    flat_number: &str,
) -> Flat {
    hierarchy(db, store)
        .ensure_flat(
            &principal(Role::SuperAdmin),
            building_id,
            None,
            NewFlat {
                flat_number: flat_number.to_owned(),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to seed flat")
}

pub async fn seed_member(
    db: &Arc<DbProvider>,
    store: &Arc<OrmEntityStore>,
    flat_id: Option<Uuid>,
    user_id: Option<Uuid>,
) -> Member {
    // A linked account must have a profile.
    if let Some(user_id) = user_id
        && store.get_profile(db.as_ref(), user_id).await.unwrap().is_none()
    {
        seed_profile(db, store, user_id, Role::Resident).await;
    }
    members(db, store)
        .create_member(
            &principal(Role::SuperAdmin),
            NewMember {
                name: "Asha Rao".to_owned(),
                flat_id,
                user_id,
                ..Default::default()
            },
        )
        .await
        .expect("Failed to seed member")
}
