use std::sync::Arc;

use axum::routing::{get, patch, post, put};
use axum::{Extension, Router, middleware};
use estate_security::Role;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::session_middleware;
use crate::domain::gate::{PUBLIC_API_PREFIX, PUBLIC_PAGES};
use crate::module::AppServices;

/// Build the route surface.
///
/// Every request passes the session middleware (token resolution and the
/// route gate); role-scoped handlers then re-check their page guard.
pub fn router(services: Arc<AppServices>) -> Router {
    let mut router = Router::new();

    for page in PUBLIC_PAGES {
        router = router.route(page, get(handlers::public_page));
    }
    router = router.route(&format!("{PUBLIC_API_PREFIX}/health"), get(handlers::health));

    for role in Role::ALL {
        router = router.route(role.landing_route(), get(handlers::dashboard));
    }

    router
        // super admin
        .route("/super-admin/colonies", post(handlers::create_colony))
        .route(
            "/super-admin/profiles/{id}/role",
            put(handlers::update_profile_role),
        )
        // colony admin
        .route(
            "/colony-admin/blocks",
            post(handlers::create_block).get(handlers::list_blocks),
        )
        .route("/colony-admin/flats", post(handlers::create_flat))
        .route(
            "/colony-admin/fee-types",
            post(handlers::create_fee_type).get(handlers::list_fee_types),
        )
        .route(
            "/colony-admin/fee-types/{id}",
            patch(handlers::update_fee_type),
        )
        // block manager
        .route(
            "/block-manager/blocks/{id}/floors",
            get(handlers::list_floors),
        )
        .route(
            "/block-manager/floors/{id}/flats",
            get(handlers::list_flats),
        )
        .route("/block-manager/flats", post(handlers::create_flat))
        .route(
            "/block-manager/flats/{id}",
            patch(handlers::update_flat).delete(handlers::delete_flat),
        )
        .route("/block-manager/members", post(handlers::create_member))
        .route(
            "/block-manager/members/{id}",
            get(handlers::get_member)
                .patch(handlers::update_member)
                .delete(handlers::delete_member),
        )
        .route(
            "/block-manager/members/{id}/fees",
            get(handlers::list_member_fees),
        )
        .route(
            "/block-manager/members/{id}/fees/total",
            get(handlers::member_fee_total),
        )
        .route("/block-manager/fee-entries", post(handlers::create_fee_entry))
        // resident
        .route("/resident/members/{id}", get(handlers::get_member))
        .route("/resident/members/{id}/fees", get(handlers::list_member_fees))
        .route(
            "/resident/members/{id}/fees/total",
            get(handlers::member_fee_total),
        )
        .layer(middleware::from_fn_with_state(
            services.clone(),
            session_middleware,
        ))
        .layer(Extension(services))
        .layer(TraceLayer::new_for_http())
}
