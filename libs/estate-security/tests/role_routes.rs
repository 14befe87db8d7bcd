#![allow(clippy::unwrap_used, clippy::expect_used)]

use estate_security::{PUBLIC_LANDING_ROUTE, Role, default_route};

#[test]
fn every_landing_route_belongs_to_its_role() {
    for role in Role::ALL {
        assert_eq!(Role::owning_path(default_route(Some(role))), Some(role));
    }
}

#[test]
fn anonymous_lands_on_public_home() {
    assert_eq!(default_route(None), PUBLIC_LANDING_ROUTE);
    assert_eq!(Role::owning_path(PUBLIC_LANDING_ROUTE), None);
}
