#![allow(clippy::unwrap_used, clippy::expect_used)]

use estate_sdk::{ColonyHint, FlatPatch, FlatStatus, NewBuilding, NewColony, NewFlat};
use estate_security::{Principal, Role};
use sea_orm::{EntityTrait, PaginatorTrait};
use tracing_test::traced_test;
use uuid::Uuid;

use super::ServiceConfig;
use super::hierarchy::HierarchyService;
use crate::domain::error::DomainError;
use crate::infra::storage::entity::{building, colony, flat, floor, member};
use crate::test_support::{
    hierarchy, inmem_db, principal, seed_building, seed_flat, seed_member,
};

fn new_building(name: &str) -> NewBuilding {
    NewBuilding {
        name: name.to_owned(),
        ..Default::default()
    }
}

fn new_flat(number: &str) -> NewFlat {
    NewFlat {
        flat_number: number.to_owned(),
        ..Default::default()
    }
}

#[tokio::test]
async fn implicit_colony_is_created_once_and_reused() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);

    let first = svc.ensure_colony(ColonyHint::Implicit).await.unwrap();
    let second = svc.ensure_colony(ColonyHint::Implicit).await.unwrap();

    assert!(first.is_default);
    assert_eq!(first.name, "Default Colony");
    assert_eq!(first.id, second.id);
    assert_eq!(colony::Entity::find().count(db.as_ref()).await.unwrap(), 1);
}

#[tokio::test]
async fn explicit_colony_must_exist() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);

    let err = svc
        .ensure_colony(ColonyHint::Id(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "colony", .. }));
    assert_eq!(colony::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

#[tokio::test]
async fn implicit_colony_can_be_disabled() {
    let (db, store) = inmem_db().await;
    let config = ServiceConfig {
        allow_implicit_default_colony: false,
        ..Default::default()
    };
    let svc = HierarchyService::new(db.clone(), store, config);

    let err = svc.ensure_colony(ColonyHint::Implicit).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn default_colony_race_recovers_existing_row() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);

    let winner = svc.insert_or_fetch_default_colony().await.unwrap();
    let loser = svc.insert_or_fetch_default_colony().await.unwrap();

    assert_eq!(winner.id, loser.id);
    assert_eq!(colony::Entity::find().count(db.as_ref()).await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_implicit_blocks_share_one_colony() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);
    let admin = principal(Role::ColonyAdmin);

    let (a, b) = tokio::join!(
        svc.ensure_building(&admin, ColonyHint::Implicit, new_building("Block A")),
        svc.ensure_building(&admin, ColonyHint::Implicit, new_building("Block B")),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.colony_id, b.colony_id);
    assert_ne!(a.id, b.id);
    assert_eq!(colony::Entity::find().count(db.as_ref()).await.unwrap(), 1);
    assert_eq!(building::Entity::find().count(db.as_ref()).await.unwrap(), 2);
}

#[tokio::test]
async fn explicit_colony_is_used_for_building() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);
    let root = principal(Role::SuperAdmin);

    let colony = svc
        .create_colony(
            &root,
            NewColony {
                name: "Green Acres".to_owned(),
                city: Some("Pune".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!colony.is_default);

    let block = svc
        .ensure_building(&root, ColonyHint::Id(colony.id), new_building("Tower 1"))
        .await
        .unwrap();
    assert_eq!(block.colony_id, colony.id);
    let listed = svc.list_buildings(Some(colony.id)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, block.id);
}

#[tokio::test]
async fn building_creation_requires_colony_admin() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);

    let err = svc
        .ensure_building(
            &principal(Role::BlockManager),
            ColonyHint::Implicit,
            new_building("Block A"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    // Rejected before any write: no default colony either.
    assert_eq!(colony::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

#[tokio::test]
async fn building_name_is_validated() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);

    let err = svc
        .ensure_building(
            &principal(Role::ColonyAdmin),
            ColonyHint::Implicit,
            new_building("   "),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "name"));
}

#[tokio::test]
async fn scoped_colony_admin_cannot_target_other_colony() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);
    let own = svc.ensure_colony(ColonyHint::Implicit).await.unwrap();

    let admin = Principal::builder()
        .id(Uuid::new_v4())
        .role(Role::ColonyAdmin)
        .colony_id(Some(own.id))
        .build();

    let err = svc
        .ensure_building(&admin, ColonyHint::Id(Uuid::new_v4()), new_building("X"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let block = svc
        .ensure_building(&admin, ColonyHint::Implicit, new_building("Y"))
        .await
        .unwrap();
    assert_eq!(block.colony_id, own.id);
}

#[tokio::test]
async fn flat_defaults_and_floor_creation() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let svc = hierarchy(&db, &store);

    let created = svc
        .ensure_flat(&principal(Role::BlockManager), block.id, None, new_flat("101"))
        .await
        .unwrap();

    assert_eq!(created.flat_type, "1BHK");
    assert_eq!(created.status, FlatStatus::Vacant);
    assert_eq!(created.rent_amount, 0);
    assert_eq!(created.deposit_amount, 0);

    let mgr = principal(Role::BlockManager);
    let floors = svc.list_floors(&mgr, block.id).await.unwrap();
    assert_eq!(floors.len(), 1);
    assert_eq!(floors[0].floor_number, 1);
    assert_eq!(floors[0].label, "Floor 1");
    assert_eq!(floors[0].maintenance_charge, 0);
    let flats = svc.list_flats(&mgr, floors[0].id).await.unwrap();
    assert_eq!(flats.len(), 1);
    assert_eq!(flats[0].id, created.id);
}

#[tokio::test]
async fn concurrent_flats_share_one_new_floor() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let svc = hierarchy(&db, &store);
    let mgr = principal(Role::BlockManager);

    let (a, b) = tokio::join!(
        svc.ensure_flat(&mgr, block.id, Some(3), new_flat("301")),
        svc.ensure_flat(&mgr, block.id, Some(3), new_flat("302")),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.floor_id, b.floor_id);
    assert_eq!(floor::Entity::find().count(db.as_ref()).await.unwrap(), 1);
    assert_eq!(flat::Entity::find().count(db.as_ref()).await.unwrap(), 2);
}

#[tokio::test]
#[traced_test]
async fn floor_race_recovers_existing_row() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let svc = hierarchy(&db, &store);

    let winner = svc.insert_or_fetch_floor(block.id, 2).await.unwrap();
    let loser = svc.insert_or_fetch_floor(block.id, 2).await.unwrap();

    assert_eq!(winner.id, loser.id);
    assert_eq!(floor::Entity::find().count(db.as_ref()).await.unwrap(), 1);
    assert!(logs_contain("Floor created concurrently"));
}

#[tokio::test]
async fn floor_under_missing_building_is_not_a_race() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);

    let err = svc
        .insert_or_fetch_floor(Uuid::new_v4(), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ReferenceViolation { entity: "floor", .. }));
    assert_eq!(floor::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

#[tokio::test]
async fn ensure_floor_is_idempotent() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let svc = hierarchy(&db, &store);
    let mgr = principal(Role::BlockManager);

    let first = svc.ensure_floor(&mgr, block.id, 0).await.unwrap();
    let again = svc.ensure_floor(&mgr, block.id, 0).await.unwrap();
    assert_eq!(first.id, again.id);
    assert_eq!(first.label, "Floor 0");
}

#[tokio::test]
async fn unknown_block_is_not_found_and_nothing_is_created() {
    let (db, store) = inmem_db().await;
    let svc = hierarchy(&db, &store);

    let err = svc
        .ensure_flat(
            &principal(Role::BlockManager),
            Uuid::new_v4(),
            None,
            new_flat("101"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity: "building", .. }));
    assert_eq!(building::Entity::find().count(db.as_ref()).await.unwrap(), 0);
    assert_eq!(floor::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_flat_number_on_floor_conflicts() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    seed_flat(&db, &store, block.id, "101").await;
    let svc = hierarchy(&db, &store);

    let err = svc
        .ensure_flat(&principal(Role::BlockManager), block.id, None, new_flat("101"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // Same number on another floor is fine.
    svc.ensure_flat(&principal(Role::BlockManager), block.id, Some(2), new_flat("101"))
        .await
        .unwrap();
}

#[tokio::test]
async fn resident_cannot_create_flats() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let svc = hierarchy(&db, &store);

    let err = svc
        .ensure_flat(&principal(Role::Resident), block.id, None, new_flat("101"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert_eq!(floor::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

#[tokio::test]
async fn block_manager_is_limited_to_own_building() {
    let (db, store) = inmem_db().await;
    let own = seed_building(&db, &store, "Block A").await;
    let other = seed_building(&db, &store, "Block B").await;
    let svc = hierarchy(&db, &store);

    let mgr = Principal::builder()
        .id(Uuid::new_v4())
        .role(Role::BlockManager)
        .building_id(Some(own.id))
        .build();

    svc.ensure_flat(&mgr, own.id, None, new_flat("101"))
        .await
        .unwrap();
    let err = svc
        .ensure_flat(&mgr, other.id, None, new_flat("101"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn block_manager_reads_only_own_building() {
    let (db, store) = inmem_db().await;
    let own = seed_building(&db, &store, "Block A").await;
    let other = seed_building(&db, &store, "Block B").await;
    seed_flat(&db, &store, own.id, "101").await;
    seed_flat(&db, &store, other.id, "201").await;
    let svc = hierarchy(&db, &store);

    let mgr = Principal::builder()
        .id(Uuid::new_v4())
        .role(Role::BlockManager)
        .building_id(Some(own.id))
        .build();

    let own_floors = svc.list_floors(&mgr, own.id).await.unwrap();
    assert_eq!(own_floors.len(), 1);
    assert_eq!(svc.list_flats(&mgr, own_floors[0].id).await.unwrap().len(), 1);

    let err = svc.list_floors(&mgr, other.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let root = principal(Role::SuperAdmin);
    let other_floors = svc.list_floors(&root, other.id).await.unwrap();
    let err = svc.list_flats(&mgr, other_floors[0].id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let svc = hierarchy(&db, &store);

    let err = svc
        .ensure_flat(
            &principal(Role::BlockManager),
            block.id,
            None,
            NewFlat {
                flat_number: "101".to_owned(),
                rent_amount: Some(-1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "rent_amount"));
}

#[tokio::test]
async fn update_flat_applies_patch() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let created = seed_flat(&db, &store, block.id, "101").await;
    let svc = hierarchy(&db, &store);

    let updated = svc
        .update_flat(
            &principal(Role::BlockManager),
            created.id,
            FlatPatch {
                status: Some(FlatStatus::Occupied),
                rent_amount: Some(15_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, FlatStatus::Occupied);
    assert_eq!(updated.rent_amount, 15_000);
    assert_eq!(updated.flat_type, "1BHK");
    let stored = svc.get_flat(created.id).await.unwrap();
    assert_eq!(stored.status, FlatStatus::Occupied);
    assert_eq!(stored.rent_amount, 15_000);
}

#[tokio::test]
async fn deleting_flat_with_member_conflicts_and_keeps_rows() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let target = seed_flat(&db, &store, block.id, "101").await;
    let resident = seed_member(&db, &store, Some(target.id), None).await;
    let svc = hierarchy(&db, &store);

    let err = svc
        .delete_flat(&principal(Role::BlockManager), target.id)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict { entity: "flat", .. }));
    assert!(flat::Entity::find_by_id(target.id).one(db.as_ref()).await.unwrap().is_some());
    let kept = member::Entity::find_by_id(resident.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.flat_id, Some(target.id));
}

#[tokio::test]
async fn deleting_unreferenced_flat_succeeds() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let target = seed_flat(&db, &store, block.id, "101").await;
    let svc = hierarchy(&db, &store);
    let mgr = principal(Role::BlockManager);

    svc.delete_flat(&mgr, target.id).await.unwrap();

    let err = svc.delete_flat(&mgr, target.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "flat", .. }));
}
