#![allow(clippy::unwrap_used, clippy::expect_used)]

use authn_resolver_sdk::Identity;
use estate_sdk::{MemberPatch, NewFeeEntry, NewMember};
use estate_security::{Principal, Role};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use super::profiles::ProfilesService;
use crate::domain::error::DomainError;
use crate::domain::repos::ProfilesRepository;
use crate::infra::storage::entity::{member, user_profile};
use crate::test_support::{
    fees, inmem_db, members, principal, seed_building, seed_flat, seed_member, seed_profile,
};

#[tokio::test]
async fn create_and_get_member() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let home = seed_flat(&db, &store, block.id, "101").await;
    let svc = members(&db, &store);
    let mgr = principal(Role::BlockManager);

    let created = svc
        .create_member(
            &mgr,
            NewMember {
                name: "  Ravi Kumar ".to_owned(),
                phone: Some(" ".to_owned()),
                email: Some("ravi@example.com".to_owned()),
                flat_id: Some(home.id),
                user_id: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(created.name, "Ravi Kumar");
    assert_eq!(created.phone, None);
    let fetched = svc.get_member(&mgr, created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.flat_id, Some(home.id));
}

#[tokio::test]
async fn member_flat_must_exist() {
    let (db, store) = inmem_db().await;
    let svc = members(&db, &store);

    let err = svc
        .create_member(
            &principal(Role::BlockManager),
            NewMember {
                name: "Ravi".to_owned(),
                flat_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "flat", .. }));
}

#[tokio::test]
async fn linked_user_is_unique() {
    let (db, store) = inmem_db().await;
    let user = Uuid::new_v4();
    seed_member(&db, &store, None, Some(user)).await;

    let err = members(&db, &store)
        .create_member(
            &principal(Role::BlockManager),
            NewMember {
                name: "Someone Else".to_owned(),
                user_id: Some(user),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { entity: "member", .. }));
}

#[tokio::test]
async fn linked_user_must_have_a_profile() {
    let (db, store) = inmem_db().await;
    let ghost = Uuid::new_v4();

    let err = members(&db, &store)
        .create_member(
            &principal(Role::BlockManager),
            NewMember {
                name: "Nobody".to_owned(),
                user_id: Some(ghost),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity: "user_profile", id } if id == ghost));
    assert_eq!(member::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

#[tokio::test]
async fn profile_with_linked_member_cannot_be_removed_from_store() {
    let (db, store) = inmem_db().await;
    let user = Uuid::new_v4();
    seed_member(&db, &store, None, Some(user)).await;

    let res = user_profile::Entity::delete_by_id(user)
        .exec(db.as_ref())
        .await;

    assert!(res.is_err());
    assert!(store.get_profile(db.as_ref(), user).await.unwrap().is_some());
}

#[tokio::test]
async fn scoped_manager_cannot_touch_members_without_flat() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let home = seed_flat(&db, &store, block.id, "101").await;
    let unplaced = seed_member(&db, &store, None, None).await;
    let svc = members(&db, &store);

    let mgr = Principal::builder()
        .id(Uuid::new_v4())
        .role(Role::BlockManager)
        .building_id(Some(block.id))
        .build();

    let err = svc
        .create_member(
            &mgr,
            NewMember {
                name: "Drifter".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = svc
        .update_member(
            &mgr,
            unplaced.id,
            MemberPatch {
                name: Some("Renamed".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = svc.delete_member(&mgr, unplaced.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    // Inside the manager's building everything still works.
    let placed = svc
        .create_member(
            &mgr,
            NewMember {
                name: "Resident".to_owned(),
                flat_id: Some(home.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(placed.flat_id, Some(home.id));
}

#[tokio::test]
async fn resident_sees_only_own_member() {
    let (db, store) = inmem_db().await;
    let resident = principal(Role::Resident);
    let own = seed_member(&db, &store, None, Some(resident.id())).await;
    let other = seed_member(&db, &store, None, None).await;
    let svc = members(&db, &store);

    assert_eq!(svc.get_member(&resident, own.id).await.unwrap().id, own.id);
    let err = svc.get_member(&resident, other.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn update_member_moves_flat() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let a = seed_flat(&db, &store, block.id, "101").await;
    let b = seed_flat(&db, &store, block.id, "102").await;
    let person = seed_member(&db, &store, Some(a.id), None).await;
    let svc = members(&db, &store);

    let updated = svc
        .update_member(
            &principal(Role::BlockManager),
            person.id,
            MemberPatch {
                name: Some("Asha R.".to_owned()),
                flat_id: Some(b.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Asha R.");
    assert_eq!(updated.flat_id, Some(b.id));
}

#[tokio::test]
async fn member_with_fee_entries_cannot_be_deleted() {
    let (db, store) = inmem_db().await;
    let person = seed_member(&db, &store, None, None).await;
    let mgr = principal(Role::BlockManager);
    fees(&db, &store)
        .record_fee_entry(
            &mgr,
            NewFeeEntry {
                member_id: person.id,
                months: vec!["Jan".to_owned()],
                fee: Some(100),
                payment_type: "cash".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let svc = members(&db, &store);

    let err = svc.delete_member(&mgr, person.id).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(svc.get_member(&mgr, person.id).await.is_ok());
}

#[tokio::test]
async fn delete_member_without_entries() {
    let (db, store) = inmem_db().await;
    let person = seed_member(&db, &store, None, None).await;
    let svc = members(&db, &store);
    let mgr = principal(Role::BlockManager);

    svc.delete_member(&mgr, person.id).await.unwrap();
    let err = svc.get_member(&mgr, person.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn resident_cannot_manage_members() {
    let (db, store) = inmem_db().await;
    let err = members(&db, &store)
        .create_member(
            &principal(Role::Resident),
            NewMember {
                name: "Ravi".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn materialized_profile_is_minimal_and_idempotent() {
    let (db, store) = inmem_db().await;
    let svc = ProfilesService::new(db.clone(), store.clone());
    let identity = Identity {
        subject_id: Uuid::new_v4(),
        email: "new@example.com".to_owned(),
    };

    let first = svc.materialize_minimal_profile(&identity).await.unwrap();
    let again = svc.materialize_minimal_profile(&identity).await.unwrap();

    assert_eq!(first.role, Role::Resident);
    assert!(first.is_active);
    assert_eq!(first.colony_id, None);
    assert_eq!(first.building_id, None);
    assert_eq!(again.id, first.id);
}

#[tokio::test]
async fn only_super_admin_changes_roles() {
    let (db, store) = inmem_db().await;
    let target = Uuid::new_v4();
    seed_profile(&db, &store, target, Role::Resident).await;
    let svc = ProfilesService::new(db.clone(), store.clone());

    let err = svc
        .update_profile_role(&principal(Role::ColonyAdmin), target, Role::BlockManager)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let updated = svc
        .update_profile_role(&principal(Role::SuperAdmin), target, Role::BlockManager)
        .await
        .unwrap();
    assert_eq!(updated.role, Role::BlockManager);
    assert_eq!(svc.get_profile(target).await.unwrap().role, Role::BlockManager);
}

#[tokio::test]
async fn super_admin_cannot_demote_self() {
    let (db, store) = inmem_db().await;
    let id = Uuid::new_v4();
    seed_profile(&db, &store, id, Role::SuperAdmin).await;
    let me = Principal::builder().id(id).role(Role::SuperAdmin).build();
    let svc = ProfilesService::new(db.clone(), store.clone());

    let err = svc
        .update_profile_role(&me, id, Role::Resident)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}
