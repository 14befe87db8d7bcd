use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use estate_sdk::{ColonyHint, FeePeriod};
use estate_security::{Principal, Role};
use tracing::field::Empty;
use uuid::Uuid;

use super::dto::{
    BuildingDto, ColonyDto, CreateBlockReq, CreateColonyReq, CreateFeeEntryReq,
    CreateFeeTypeReq, CreateFlatReq, CreateMemberReq, DashboardDto, FeeEntryDto, FeeTotalDto,
    FeeTotalQuery, FeeTypeDto, FlatDto, FloorDto, HealthDto, ListBlocksQuery, ListFeeTypesQuery,
    MemberDto, PageDto, ProfileDto, UpdateFeeTypeReq, UpdateFlatReq, UpdateMemberReq,
    UpdateRoleReq, parse_rfc3339,
};
use super::error::Problem;
use super::middleware::loading_response;
use crate::domain::error::DomainError;
use crate::domain::gate::{DENIED_REDIRECT, PageDecision, PageGuard};
use crate::domain::session::SessionState;
use crate::module::AppServices;

/// Handler error: a problem document, or the page guard turning the request
/// away.
#[derive(Debug)]
pub enum ApiError {
    Problem(Problem),
    Redirect(&'static str),
    Loading,
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self::Problem(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Problem(problem) => problem.into_response(),
            Self::Redirect(location) => Redirect::to(location).into_response(),
            Self::Loading => loading_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Re-check the page guard of the requested path.
fn authorize_page<'a>(uri: &Uri, session: &'a SessionState) -> ApiResult<&'a Principal> {
    let Some(guard) = PageGuard::for_path(uri.path()) else {
        return Err(ApiError::Redirect(DENIED_REDIRECT));
    };
    match guard.check(session) {
        PageDecision::Render => session
            .principal()
            .ok_or(ApiError::Redirect(DENIED_REDIRECT)),
        PageDecision::Loading => Err(ApiError::Loading),
        PageDecision::Deny { redirect_to } => {
            tracing::debug!(path = %uri.path(), "Page guard denied request");
            Err(ApiError::Redirect(redirect_to))
        }
    }
}

// ==================== Public pages ====================

pub(crate) async fn public_page(uri: Uri) -> Json<PageDto> {
    let page = match uri.path().trim_start_matches('/') {
        "" => "home",
        other => other,
    };
    Json(PageDto {
        page: page.to_owned(),
    })
}

pub(crate) async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_owned(),
    })
}

// ==================== Dashboards ====================

/// Principal summary for `/{role}/dashboard`.
pub(crate) async fn dashboard(
    uri: Uri,
    Extension(session): Extension<SessionState>,
) -> ApiResult<Json<DashboardDto>> {
    let principal = authorize_page(&uri, &session)?;
    Ok(Json(DashboardDto::from(principal)))
}

// ==================== Hierarchy ====================

#[tracing::instrument(skip(svc, session, req_body), fields(colony.name = %req_body.name, principal = Empty))]
pub(crate) async fn create_colony(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req_body): Json<CreateColonyReq>,
) -> ApiResult<impl IntoResponse> {
    let principal = authorize_page(&uri, &session)?;
    tracing::Span::current().record("principal", tracing::field::display(principal.id()));
    let colony = svc
        .hierarchy
        .create_colony(principal, req_body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ColonyDto::from(colony))))
}

#[tracing::instrument(skip(svc, session, req_body), fields(block.name = %req_body.name))]
pub(crate) async fn create_block(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req_body): Json<CreateBlockReq>,
) -> ApiResult<impl IntoResponse> {
    let principal = authorize_page(&uri, &session)?;
    let (colony_id, new_building) = req_body.into_parts();
    let building = svc
        .hierarchy
        .ensure_building(principal, ColonyHint::from(colony_id), new_building)
        .await?;
    Ok((StatusCode::CREATED, Json(BuildingDto::from(building))))
}

pub(crate) async fn list_blocks(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Query(query): Query<ListBlocksQuery>,
) -> ApiResult<Json<Vec<BuildingDto>>> {
    let principal = authorize_page(&uri, &session)?;
    // A colony-scoped admin only ever lists its own colony.
    let colony_id = match principal.role() {
        Role::SuperAdmin => query.colony_id,
        _ => principal.profile().colony_id.or(query.colony_id),
    };
    let buildings = svc.hierarchy.list_buildings(colony_id).await?;
    Ok(Json(buildings.into_iter().map(BuildingDto::from).collect()))
}

pub(crate) async fn list_floors(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(block_id): Path<Uuid>,
) -> ApiResult<Json<Vec<FloorDto>>> {
    let principal = authorize_page(&uri, &session)?;
    let floors = svc.hierarchy.list_floors(principal, block_id).await?;
    Ok(Json(floors.into_iter().map(FloorDto::from).collect()))
}

pub(crate) async fn list_flats(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(floor_id): Path<Uuid>,
) -> ApiResult<Json<Vec<FlatDto>>> {
    let principal = authorize_page(&uri, &session)?;
    let flats = svc.hierarchy.list_flats(principal, floor_id).await?;
    Ok(Json(flats.into_iter().map(FlatDto::from).collect()))
}

#[tracing::instrument(skip(svc, session, req_body), fields(flat.number = %req_body.flat_number, block.id = %req_body.block_id))]
pub(crate) async fn create_flat(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req_body): Json<CreateFlatReq>,
) -> ApiResult<impl IntoResponse> {
    let principal = authorize_page(&uri, &session)?;
    let (block_id, floor_number, new_flat) = req_body.into_parts();
    let flat = svc
        .hierarchy
        .ensure_flat(principal, block_id, floor_number, new_flat)
        .await?;
    Ok((StatusCode::CREATED, Json(FlatDto::from(flat))))
}

pub(crate) async fn update_flat(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<Uuid>,
    Json(req_body): Json<UpdateFlatReq>,
) -> ApiResult<Json<FlatDto>> {
    let principal = authorize_page(&uri, &session)?;
    let flat = svc
        .hierarchy
        .update_flat(principal, id, req_body.into())
        .await?;
    Ok(Json(FlatDto::from(flat)))
}

pub(crate) async fn delete_flat(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let principal = authorize_page(&uri, &session)?;
    svc.hierarchy.delete_flat(principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Members ====================

pub(crate) async fn create_member(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req_body): Json<CreateMemberReq>,
) -> ApiResult<impl IntoResponse> {
    let principal = authorize_page(&uri, &session)?;
    let member = svc.members.create_member(principal, req_body.into()).await?;
    Ok((StatusCode::CREATED, Json(MemberDto::from(member))))
}

pub(crate) async fn get_member(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MemberDto>> {
    let principal = authorize_page(&uri, &session)?;
    let member = svc.members.get_member(principal, id).await?;
    Ok(Json(MemberDto::from(member)))
}

pub(crate) async fn update_member(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<Uuid>,
    Json(req_body): Json<UpdateMemberReq>,
) -> ApiResult<Json<MemberDto>> {
    let principal = authorize_page(&uri, &session)?;
    let member = svc
        .members
        .update_member(principal, id, req_body.into())
        .await?;
    Ok(Json(MemberDto::from(member)))
}

pub(crate) async fn delete_member(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let principal = authorize_page(&uri, &session)?;
    svc.members.delete_member(principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Profiles ====================

#[tracing::instrument(skip(svc, session, req_body), fields(profile.id = %id, role = %req_body.role))]
pub(crate) async fn update_profile_role(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<Uuid>,
    Json(req_body): Json<UpdateRoleReq>,
) -> ApiResult<Json<ProfileDto>> {
    let principal = authorize_page(&uri, &session)?;
    let profile = svc
        .profiles
        .update_profile_role(principal, id, req_body.role)
        .await?;
    Ok(Json(ProfileDto::from(profile)))
}

// ==================== Fees ====================

pub(crate) async fn create_fee_type(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req_body): Json<CreateFeeTypeReq>,
) -> ApiResult<impl IntoResponse> {
    let principal = authorize_page(&uri, &session)?;
    let fee_type = svc.fees.create_fee_type(principal, req_body.into()).await?;
    Ok((StatusCode::CREATED, Json(FeeTypeDto::from(fee_type))))
}

pub(crate) async fn update_fee_type(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<Uuid>,
    Json(req_body): Json<UpdateFeeTypeReq>,
) -> ApiResult<Json<FeeTypeDto>> {
    let principal = authorize_page(&uri, &session)?;
    let fee_type = svc
        .fees
        .update_fee_type(principal, id, req_body.into())
        .await?;
    Ok(Json(FeeTypeDto::from(fee_type)))
}

pub(crate) async fn list_fee_types(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Query(query): Query<ListFeeTypesQuery>,
) -> ApiResult<Json<Vec<FeeTypeDto>>> {
    authorize_page(&uri, &session)?;
    let fee_types = svc.fees.list_fee_types(query.active_only).await?;
    Ok(Json(fee_types.into_iter().map(FeeTypeDto::from).collect()))
}

#[tracing::instrument(skip(svc, session, req_body), fields(member.id = %req_body.member_id))]
pub(crate) async fn create_fee_entry(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req_body): Json<CreateFeeEntryReq>,
) -> ApiResult<impl IntoResponse> {
    let principal = authorize_page(&uri, &session)?;
    let entry = svc.fees.record_fee_entry(principal, req_body.into()).await?;
    Ok((StatusCode::CREATED, Json(FeeEntryDto::from(entry))))
}

pub(crate) async fn list_member_fees(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(member_id): Path<Uuid>,
) -> ApiResult<Json<Vec<FeeEntryDto>>> {
    let principal = authorize_page(&uri, &session)?;
    let entries = svc.fees.list_member_entries(principal, member_id).await?;
    Ok(Json(entries.into_iter().map(FeeEntryDto::from).collect()))
}

#[tracing::instrument(skip(svc, session, query), fields(member.id = %member_id))]
pub(crate) async fn member_fee_total(
    uri: Uri,
    Extension(session): Extension<SessionState>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(member_id): Path<Uuid>,
    Query(query): Query<FeeTotalQuery>,
) -> ApiResult<Json<FeeTotalDto>> {
    let principal = authorize_page(&uri, &session)?;
    let period = FeePeriod {
        from: query
            .from
            .as_deref()
            .map(|v| parse_rfc3339("from", v))
            .transpose()?,
        to: query
            .to
            .as_deref()
            .map(|v| parse_rfc3339("to", v))
            .transpose()?,
    };
    let total = svc
        .fees
        .compute_member_total(principal, member_id, period)
        .await?;
    Ok(Json(FeeTotalDto {
        member_id,
        total,
        from: query.from,
        to: query.to,
    }))
}
