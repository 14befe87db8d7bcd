use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use super::error::Problem;
use crate::domain::error::DomainError;
use crate::domain::gate::GateDecision;
use crate::domain::session::{SessionOutcome, SessionState};
use crate::module::AppServices;

/// Session middleware.
///
/// For each request:
/// 1. Resolves the bearer token (if any) into a [`SessionState`]
/// 2. Materializes a minimal profile for a first-time identity and resolves again
/// 3. Applies the route gate: auth-entry redirects are answered here
/// 4. Inserts the `SessionState` for the handlers' page guards
pub async fn session_middleware(
    State(svc): State<Arc<AppServices>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = extract_bearer_token(req.headers()).map(str::to_owned);

    let session = match resolve_session(&svc, token.as_deref()).await {
        Ok(session) => session,
        Err(e) => return Problem::from(e).into_response(),
    };

    match svc.gate.authorize(req.uri().path(), &session) {
        GateDecision::RedirectTo(location) => {
            tracing::debug!(path = %req.uri().path(), location, "Gate redirect");
            return Redirect::to(location).into_response();
        }
        GateDecision::Allow | GateDecision::Continue => {}
    }

    req.extensions_mut().insert(session);
    next.run(req).await
}

async fn resolve_session(
    svc: &AppServices,
    token: Option<&str>,
) -> Result<SessionState, DomainError> {
    let mut outcome = svc.sessions.resolve_session(token).await?;
    if let SessionOutcome::ProfileMissing(identity) = &outcome {
        svc.profiles.materialize_minimal_profile(identity).await?;
        outcome = svc.sessions.resolve_session(token).await?;
    }
    Ok(SessionState::complete(outcome))
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
}

/// Neutral response of a role page while the session is still resolving.
pub fn loading_response() -> Response {
    (
        StatusCode::ACCEPTED,
        axum::Json(super::dto::LoadingDto {
            status: "loading".to_owned(),
        }),
    )
        .into_response()
}
