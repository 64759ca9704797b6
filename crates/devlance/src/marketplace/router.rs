//! HTTP wiring for the marketplace, generic over the backing store.
//!
//! The caller's identity arrives as an `x-user-id` header resolved by the
//! identity provider in front of this service; the router only parses it.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;

use super::browse::BrowseParams;
use super::domain::{
    ClientProfileRequest, CreateJobRequest, DecisionRequest, DeveloperProfileRequest, JobId,
    ProposalId, SetRoleRequest, SubmitProposalRequest, UpdateJobRequest, UserId,
};
use super::jobs::JobService;
use super::profiles::ProfileService;
use super::proposals::{DecisionOutcome, ProposalService};
use super::store::MarketplaceStore;
use super::MarketplaceError;

/// Shared handler state: one service per concern over the same store.
pub struct MarketplaceState<S> {
    pub jobs: JobService<S>,
    pub proposals: ProposalService<S>,
    pub profiles: ProfileService<S>,
}

impl<S> MarketplaceState<S>
where
    S: MarketplaceStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            jobs: JobService::new(store.clone()),
            proposals: ProposalService::new(store.clone()),
            profiles: ProfileService::new(store),
        }
    }
}

/// The authenticated caller, parsed from the `x-user-id` header.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub UserId);

#[async_trait]
impl<St> FromRequestParts<St> for Identity
where
    St: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok());

        match id {
            Some(id) => Ok(Identity(UserId(id))),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "User ID is required" })),
            )
                .into_response()),
        }
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let status = match &self {
            MarketplaceError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketplaceError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketplaceError::Conflict(_) => StatusCode::CONFLICT,
            MarketplaceError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketplaceError::Store(err) => {
                tracing::error!(error = %err, "marketplace store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            MarketplaceError::Store(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Router builder exposing the marketplace endpoints.
pub fn marketplace_router<S>(state: Arc<MarketplaceState<S>>) -> Router
where
    S: MarketplaceStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            post(create_job_handler::<S>).get(browse_jobs_handler::<S>),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(get_job_handler::<S>)
                .put(update_job_handler::<S>)
                .delete(delete_job_handler::<S>),
        )
        .route(
            "/api/v1/jobs/:job_id/status",
            patch(toggle_job_status_handler::<S>),
        )
        .route(
            "/api/v1/jobs/:job_id/proposals",
            post(submit_proposal_handler::<S>),
        )
        .route(
            "/api/v1/jobs/:job_id/proposals/:proposal_id",
            patch(decide_proposal_handler::<S>),
        )
        .route("/api/v1/clients/:client_id/jobs", get(client_jobs_handler::<S>))
        .route(
            "/api/v1/developers/:developer_id/proposals",
            get(developer_proposals_handler::<S>),
        )
        .route("/api/v1/onboarding/role", post(set_role_handler::<S>))
        .route(
            "/api/v1/onboarding/client-profile",
            post(client_profile_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/developer-profile",
            post(developer_profile_handler::<S>),
        )
        .with_state(state)
}

async fn create_job_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Json(request): Json<CreateJobRequest>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    let job = state.jobs.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": job.id }))).into_response())
}

async fn browse_jobs_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Query(params): Query<BrowseParams>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    let page = state.jobs.browse(params).await?;
    Ok(Json(page).into_response())
}

async fn get_job_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    identity: Identity,
    Path(job_id): Path<i64>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    let detail = state.jobs.get(identity.0, JobId(job_id)).await?;
    Ok(Json(detail).into_response())
}

async fn update_job_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    identity: Identity,
    Path(job_id): Path<i64>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    let job = state.jobs.update(identity.0, JobId(job_id), request).await?;
    Ok(Json(job).into_response())
}

async fn toggle_job_status_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    identity: Identity,
    Path(job_id): Path<i64>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    state.jobs.toggle_status(identity.0, JobId(job_id)).await?;
    Ok(Json(json!({ "message": "Job status updated successfully" })).into_response())
}

async fn delete_job_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    identity: Identity,
    Path(job_id): Path<i64>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    state.jobs.delete(identity.0, JobId(job_id)).await?;
    Ok(Json(json!({ "message": "Job deleted successfully" })).into_response())
}

async fn client_jobs_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Path(client_id): Path<i64>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    let jobs = state.jobs.jobs_for_client(UserId(client_id)).await?;
    Ok(Json(jobs).into_response())
}

async fn submit_proposal_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Path(job_id): Path<i64>,
    Json(request): Json<SubmitProposalRequest>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    let receipt = state.proposals.submit(JobId(job_id), request).await?;
    Ok((StatusCode::CREATED, Json(receipt)).into_response())
}

async fn decide_proposal_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    identity: Identity,
    Path((job_id, proposal_id)): Path<(i64, i64)>,
    Json(request): Json<DecisionRequest>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    let outcome = state
        .proposals
        .decide(identity.0, JobId(job_id), ProposalId(proposal_id), request)
        .await?;

    match outcome {
        DecisionOutcome::Accepted(proposal) => Ok(Json(proposal).into_response()),
        DecisionOutcome::Rejected(_) => {
            Ok(Json(json!({ "message": "Proposal rejected successfully" })).into_response())
        }
    }
}

async fn developer_proposals_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Path(developer_id): Path<i64>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    let proposals = state
        .proposals
        .proposals_for_developer(UserId(developer_id))
        .await?;
    Ok(Json(proposals).into_response())
}

async fn set_role_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    identity: Identity,
    Json(request): Json<SetRoleRequest>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    let role = state.profiles.set_role(identity.0, request).await?;
    Ok(Json(json!({ "message": "role set successfully", "role": role.label() })).into_response())
}

async fn client_profile_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Json(request): Json<ClientProfileRequest>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    state.profiles.create_client_profile(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Client profile created successfully" })),
    )
        .into_response())
}

async fn developer_profile_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Json(request): Json<DeveloperProfileRequest>,
) -> Result<Response, MarketplaceError>
where
    S: MarketplaceStore + 'static,
{
    state.profiles.create_developer_profile(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Developer profile created successfully" })),
    )
        .into_response())
}
