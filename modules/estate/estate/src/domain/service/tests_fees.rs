#![allow(clippy::unwrap_used, clippy::expect_used)]

use estate_sdk::{FeePeriod, FeeTypePatch, NewFeeEntry, NewFeeType};
use estate_security::{Principal, Role};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::test_support::{fees, inmem_db, principal, seed_building, seed_flat, seed_member};

fn months(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|m| (*m).to_owned()).collect()
}

#[tokio::test]
async fn stored_totals_survive_fee_type_changes() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let home = seed_flat(&db, &store, block.id, "101").await;
    let person = seed_member(&db, &store, Some(home.id), None).await;
    let svc = fees(&db, &store);
    let admin = principal(Role::ColonyAdmin);
    let mgr = principal(Role::BlockManager);

    let maintenance = svc
        .create_fee_type(
            &admin,
            NewFeeType {
                name: "Maintenance".to_owned(),
                amount: 500,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let entry = svc
        .record_fee_entry(
            &mgr,
            NewFeeEntry {
                member_id: person.id,
                fee_type_id: Some(maintenance.id),
                months: months(&["Jan", "Feb"]),
                fee: None,
                payment_type: "cash".to_owned(),
                remarks: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(entry.fee, 500);
    assert_eq!(entry.total_fee, 1000);
    assert_eq!(entry.building_id, Some(block.id));
    assert_eq!(entry.flat_id, Some(home.id));
    assert_eq!(entry.flat_number.as_deref(), Some("101"));

    svc.update_fee_type(
        &admin,
        maintenance.id,
        FeeTypePatch {
            amount: Some(600),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let total = svc
        .compute_member_total(&mgr, person.id, FeePeriod::all())
        .await
        .unwrap();
    assert_eq!(total, 1000);

    let listed = svc.list_member_entries(&mgr, person.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].months, months(&["Jan", "Feb"]));
}

#[tokio::test]
async fn totals_respect_period() {
    let (db, store) = inmem_db().await;
    let person = seed_member(&db, &store, None, None).await;
    let svc = fees(&db, &store);
    let mgr = principal(Role::BlockManager);

    for fee in [100, 250] {
        svc.record_fee_entry(
            &mgr,
            NewFeeEntry {
                member_id: person.id,
                months: months(&["Mar"]),
                fee: Some(fee),
                payment_type: "upi".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let now = OffsetDateTime::now_utc();
    let around_now = FeePeriod::between(now - Duration::hours(1), now + Duration::hours(1));
    let last_year = FeePeriod::between(now - Duration::days(730), now - Duration::days(365));

    assert_eq!(
        svc.compute_member_total(&mgr, person.id, around_now).await.unwrap(),
        350
    );
    assert_eq!(
        svc.compute_member_total(&mgr, person.id, last_year).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn resident_cannot_aggregate_other_member() {
    let (db, store) = inmem_db().await;
    let resident = principal(Role::Resident);
    let own = seed_member(&db, &store, None, Some(resident.id())).await;
    let other = seed_member(&db, &store, None, None).await;
    let svc = fees(&db, &store);

    assert_eq!(
        svc.compute_member_total(&resident, own.id, FeePeriod::all())
            .await
            .unwrap(),
        0
    );
    let err = svc
        .compute_member_total(&resident, other.id, FeePeriod::all())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = svc
        .list_member_entries(&resident, other.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn unknown_member_is_not_found() {
    let (db, store) = inmem_db().await;
    let svc = fees(&db, &store);

    let err = svc
        .compute_member_total(&principal(Role::BlockManager), Uuid::new_v4(), FeePeriod::all())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "member", .. }));
}

#[tokio::test]
async fn entry_validation() {
    let (db, store) = inmem_db().await;
    let person = seed_member(&db, &store, None, None).await;
    let svc = fees(&db, &store);
    let mgr = principal(Role::BlockManager);

    let base = NewFeeEntry {
        member_id: person.id,
        months: months(&["Jan"]),
        fee: Some(100),
        payment_type: "cash".to_owned(),
        ..Default::default()
    };

    let no_months = NewFeeEntry {
        months: Vec::new(),
        ..base.clone()
    };
    assert!(matches!(
        svc.record_fee_entry(&mgr, no_months).await.unwrap_err(),
        DomainError::Validation { ref field, .. } if field == "months"
    ));

    let blank_month = NewFeeEntry {
        months: months(&["Jan", " "]),
        ..base.clone()
    };
    assert!(svc.record_fee_entry(&mgr, blank_month).await.is_err());

    let negative = NewFeeEntry {
        fee: Some(-5),
        ..base.clone()
    };
    assert!(matches!(
        svc.record_fee_entry(&mgr, negative).await.unwrap_err(),
        DomainError::Validation { ref field, .. } if field == "fee"
    ));

    let no_fee = NewFeeEntry {
        fee: None,
        ..base.clone()
    };
    assert!(matches!(
        svc.record_fee_entry(&mgr, no_fee).await.unwrap_err(),
        DomainError::Validation { .. }
    ));

    let overflow = NewFeeEntry {
        fee: Some(i64::MAX),
        months: months(&["Jan", "Feb"]),
        ..base
    };
    assert!(matches!(
        svc.record_fee_entry(&mgr, overflow).await.unwrap_err(),
        DomainError::Validation { .. }
    ));
}

#[tokio::test]
async fn fee_type_rules() {
    let (db, store) = inmem_db().await;
    let svc = fees(&db, &store);
    let admin = principal(Role::ColonyAdmin);
    let new_type = |name: &str| NewFeeType {
        name: name.to_owned(),
        amount: 200,
        ..Default::default()
    };

    let err = svc
        .create_fee_type(&principal(Role::BlockManager), new_type("Parking"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let parking = svc.create_fee_type(&admin, new_type("Parking")).await.unwrap();
    let err = svc
        .create_fee_type(&admin, new_type("Parking"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { entity: "fee_type", .. }));

    svc.update_fee_type(
        &admin,
        parking.id,
        FeeTypePatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    svc.create_fee_type(&admin, new_type("Water")).await.unwrap();

    assert_eq!(svc.list_fee_types(false).await.unwrap().len(), 2);
    let active = svc.list_fee_types(true).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Water");
}

#[tokio::test]
async fn scoped_manager_cannot_charge_member_without_flat() {
    let (db, store) = inmem_db().await;
    let block = seed_building(&db, &store, "Block A").await;
    let home = seed_flat(&db, &store, block.id, "101").await;
    let placed = seed_member(&db, &store, Some(home.id), None).await;
    let unplaced = seed_member(&db, &store, None, None).await;
    let svc = fees(&db, &store);

    let mgr = Principal::builder()
        .id(Uuid::new_v4())
        .role(Role::BlockManager)
        .building_id(Some(block.id))
        .build();
    let entry = |member_id| NewFeeEntry {
        member_id,
        months: months(&["Apr"]),
        fee: Some(300),
        payment_type: "cash".to_owned(),
        ..Default::default()
    };

    let err = svc
        .record_fee_entry(&mgr, entry(unplaced.id))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert!(svc
        .list_member_entries(&mgr, unplaced.id)
        .await
        .unwrap()
        .is_empty());

    let recorded = svc.record_fee_entry(&mgr, entry(placed.id)).await.unwrap();
    assert_eq!(recorded.building_id, Some(block.id));
}
