//! Property hierarchy, profiles and the fee ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Colonies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Colonies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Colonies::Name).string().not_null())
                    .col(ColumnDef::new(Colonies::Address).string())
                    .col(ColumnDef::new(Colonies::City).string())
                    .col(ColumnDef::new(Colonies::State).string())
                    .col(ColumnDef::new(Colonies::Pincode).string())
                    .col(ColumnDef::new(Colonies::DefaultKey).string())
                    .col(
                        ColumnDef::new(Colonies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // NULL for every colony but the default one.
        manager
            .create_index(
                Index::create()
                    .name("idx_colonies_default_key_unique")
                    .table(Colonies::Table)
                    .col(Colonies::DefaultKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Buildings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Buildings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Buildings::ColonyId).uuid().not_null())
                    .col(ColumnDef::new(Buildings::Name).string().not_null())
                    .col(
                        ColumnDef::new(Buildings::TotalFloors)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Buildings::Description).text())
                    .col(
                        ColumnDef::new(Buildings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_buildings_colony")
                            .from(Buildings::Table, Buildings::ColonyId)
                            .to(Colonies::Table, Colonies::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_buildings_colony_id")
                    .table(Buildings::Table)
                    .col(Buildings::ColonyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Floors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Floors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Floors::BuildingId).uuid().not_null())
                    .col(ColumnDef::new(Floors::FloorNumber).integer().not_null())
                    .col(ColumnDef::new(Floors::Label).string().not_null())
                    .col(
                        ColumnDef::new(Floors::MaintenanceCharge)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Floors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_floors_building")
                            .from(Floors::Table, Floors::BuildingId)
                            .to(Buildings::Table, Buildings::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_floors_building_number_unique")
                    .table(Floors::Table)
                    .col(Floors::BuildingId)
                    .col(Floors::FloorNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Flats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Flats::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Flats::FloorId).uuid().not_null())
                    .col(ColumnDef::new(Flats::FlatNumber).string().not_null())
                    .col(ColumnDef::new(Flats::FlatType).string().not_null())
                    .col(ColumnDef::new(Flats::Status).string().not_null())
                    .col(
                        ColumnDef::new(Flats::RentAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Flats::DepositAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Flats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flats_floor")
                            .from(Flats::Table, Flats::FloorId)
                            .to(Floors::Table, Floors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_flats_floor_number_unique")
                    .table(Flats::Table)
                    .col(Flats::FloorId)
                    .col(Flats::FlatNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProfiles::Email).string().not_null())
                    .col(ColumnDef::new(UserProfiles::Role).string().not_null())
                    .col(
                        ColumnDef::new(UserProfiles::FirstName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::LastName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(UserProfiles::ColonyId).uuid())
                    .col(ColumnDef::new(UserProfiles::BuildingId).uuid())
                    .col(ColumnDef::new(UserProfiles::FlatId).uuid())
                    .col(
                        ColumnDef::new(UserProfiles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::Phone).string())
                    .col(ColumnDef::new(Members::Email).string())
                    .col(ColumnDef::new(Members::FlatId).uuid())
                    .col(ColumnDef::new(Members::UserId).uuid())
                    .col(
                        ColumnDef::new(Members::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_flat")
                            .from(Members::Table, Members::FlatId)
                            .to(Flats::Table, Flats::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_user")
                            .from(Members::Table, Members::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_members_user_id_unique")
                    .table(Members::Table)
                    .col(Members::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_members_flat_id")
                    .table(Members::Table)
                    .col(Members::FlatId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeeTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FeeTypes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(FeeTypes::Name).string().not_null())
                    .col(ColumnDef::new(FeeTypes::Description).text())
                    .col(ColumnDef::new(FeeTypes::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(FeeTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(FeeTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fee_types_name_unique")
                    .table(FeeTypes::Table)
                    .col(FeeTypes::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeeEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeeEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeeEntries::MemberId).uuid().not_null())
                    .col(ColumnDef::new(FeeEntries::FeeTypeId).uuid())
                    .col(ColumnDef::new(FeeEntries::BuildingId).uuid())
                    .col(ColumnDef::new(FeeEntries::FlatId).uuid())
                    .col(ColumnDef::new(FeeEntries::FlatNumber).string())
                    .col(ColumnDef::new(FeeEntries::Months).text().not_null())
                    .col(ColumnDef::new(FeeEntries::Fee).big_integer().not_null())
                    .col(ColumnDef::new(FeeEntries::TotalFee).big_integer().not_null())
                    .col(ColumnDef::new(FeeEntries::PaymentType).string().not_null())
                    .col(ColumnDef::new(FeeEntries::Remarks).text())
                    .col(
                        ColumnDef::new(FeeEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_entries_member")
                            .from(FeeEntries::Table, FeeEntries::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_entries_fee_type")
                            .from(FeeEntries::Table, FeeEntries::FeeTypeId)
                            .to(FeeTypes::Table, FeeTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_entries_flat")
                            .from(FeeEntries::Table, FeeEntries::FlatId)
                            .to(Flats::Table, Flats::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fee_entries_member_created")
                    .table(FeeEntries::Table)
                    .col(FeeEntries::MemberId)
                    .col(FeeEntries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeeEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Flats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Floors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Buildings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Colonies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Colonies {
    Table,
    Id,
    Name,
    Address,
    City,
    State,
    Pincode,
    DefaultKey,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Buildings {
    Table,
    Id,
    ColonyId,
    Name,
    TotalFloors,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Floors {
    Table,
    Id,
    BuildingId,
    FloorNumber,
    Label,
    MaintenanceCharge,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Flats {
    Table,
    Id,
    FloorId,
    FlatNumber,
    FlatType,
    Status,
    RentAmount,
    DepositAmount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    Name,
    Phone,
    Email,
    FlatId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    Email,
    Role,
    FirstName,
    LastName,
    ColonyId,
    BuildingId,
    FlatId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FeeTypes {
    Table,
    Id,
    Name,
    Description,
    Amount,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FeeEntries {
    Table,
    Id,
    MemberId,
    FeeTypeId,
    BuildingId,
    FlatId,
    FlatNumber,
    Months,
    Fee,
    TotalFee,
    PaymentType,
    Remarks,
    CreatedAt,
}
