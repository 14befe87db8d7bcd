use async_trait::async_trait;
use estate_sdk::{Member, UserProfile};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use super::OrmEntityStore;
use super::db::{db_err, utc};
use super::entity::member::{
    ActiveModel as MemberAM, Column as MemberColumn, Entity as MemberEntity,
};
use super::entity::user_profile::{
    ActiveModel as ProfileAM, Column as ProfileColumn, Entity as ProfileEntity,
};
use crate::domain::error::DomainError;
use crate::domain::repos::entities::{MEMBER, USER_PROFILE};
use crate::domain::repos::{MembersRepository, ProfilesRepository};

#[async_trait]
impl MembersRepository for OrmEntityStore {
    async fn get_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Member>, DomainError> {
        let found = MemberEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err(MEMBER))?;
        Ok(found.map(Into::into))
    }

    async fn count_members_in_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        flat_id: Uuid,
    ) -> Result<u64, DomainError> {
        MemberEntity::find()
            .filter(MemberColumn::FlatId.eq(flat_id))
            .count(conn)
            .await
            .map_err(db_err(MEMBER))
    }

    async fn insert_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        member: Member,
    ) -> Result<Member, DomainError> {
        MemberEntity::insert(member_active_model(&member))
            .exec_without_returning(conn)
            .await
            .map_err(db_err(MEMBER))?;
        Ok(member)
    }

    async fn update_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        member: Member,
    ) -> Result<Member, DomainError> {
        let result = MemberEntity::update_many()
            .set(member_active_model(&member))
            .filter(MemberColumn::Id.eq(member.id))
            .exec(conn)
            .await
            .map_err(db_err(MEMBER))?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found(MEMBER, member.id));
        }
        Ok(member)
    }

    async fn delete_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = MemberEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err(MEMBER))?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl ProfilesRepository for OrmEntityStore {
    async fn get_profile<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserProfile>, DomainError> {
        ProfileEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err(USER_PROFILE))?
            .map(UserProfile::try_from)
            .transpose()
    }

    async fn insert_profile<C: ConnectionTrait>(
        &self,
        conn: &C,
        profile: UserProfile,
    ) -> Result<UserProfile, DomainError> {
        ProfileEntity::insert(profile_active_model(&profile))
            .exec_without_returning(conn)
            .await
            .map_err(db_err(USER_PROFILE))?;
        Ok(profile)
    }

    async fn update_profile<C: ConnectionTrait>(
        &self,
        conn: &C,
        profile: UserProfile,
    ) -> Result<UserProfile, DomainError> {
        let result = ProfileEntity::update_many()
            .set(profile_active_model(&profile))
            .filter(ProfileColumn::Id.eq(profile.id))
            .exec(conn)
            .await
            .map_err(db_err(USER_PROFILE))?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found(USER_PROFILE, profile.id));
        }
        Ok(profile)
    }
}

fn member_active_model(member: &Member) -> MemberAM {
    MemberAM {
        id: Set(member.id),
        name: Set(member.name.clone()),
        phone: Set(member.phone.clone()),
        email: Set(member.email.clone()),
        flat_id: Set(member.flat_id),
        user_id: Set(member.user_id),
        created_at: Set(utc(member.created_at)),
    }
}

fn profile_active_model(profile: &UserProfile) -> ProfileAM {
    ProfileAM {
        id: Set(profile.id),
        email: Set(profile.email.clone()),
        role: Set(profile.role.as_str().to_owned()),
        first_name: Set(profile.first_name.clone()),
        last_name: Set(profile.last_name.clone()),
        colony_id: Set(profile.colony_id),
        building_id: Set(profile.building_id),
        flat_id: Set(profile.flat_id),
        is_active: Set(profile.is_active),
        created_at: Set(utc(profile.created_at)),
        updated_at: Set(utc(profile.updated_at)),
    }
}
