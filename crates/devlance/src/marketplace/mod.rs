//! Marketplace core: job lifecycle, proposal submission, and the
//! accept/reject decision engine, plus the browse listing and onboarding
//! steps that feed them.

pub mod browse;
pub mod domain;
pub mod jobs;
pub mod profiles;
pub mod proposals;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use browse::{BrowsePage, BrowseParams, BrowseQuery, BudgetBucket, Pagination, SortKey};
pub use domain::{
    ClientProfile, ClientProfileRequest, ClientSummary, CreateJobRequest, Decision,
    DecisionRequest, DeveloperProfile, DeveloperProfileRequest, DeveloperProposalView,
    DeveloperSummary, Job, JobDetailView, JobId, JobListingView, JobProposalView, JobStatus,
    Proposal, ProposalId, ProposalReceiptView, ProposalStatus, Role, SetRoleRequest,
    SubmitProposalRequest, UpdateJobRequest, User, UserId,
};
pub use jobs::JobService;
pub use profiles::ProfileService;
pub use proposals::{DecisionOutcome, ProposalService};
pub use router::{marketplace_router, Identity, MarketplaceState};
pub use store::{MarketplaceStore, SqliteStore, StoreError};

/// Error raised by the marketplace services. Variants map one-to-one onto the
/// HTTP failure kinds the router exposes.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("internal store failure")]
    Store(#[source] StoreError),
}

impl From<StoreError> for MarketplaceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict("record already exists".to_string()),
            StoreError::NotFound => Self::NotFound("record not found".to_string()),
            other => Self::Store(other),
        }
    }
}

/// Trimmed, non-empty text or `None`; the services treat blank strings like
/// missing fields.
pub(crate) fn required_text(field: Option<&String>) -> Option<&str> {
    field.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

/// Coerce a raw JSON value into an integer: numbers truncate, numeric strings
/// parse, everything else is a validation error.
pub(crate) fn coerce_integer(
    value: &serde_json::Value,
    field: &str,
) -> Result<i64, MarketplaceError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(raw) => {
            let raw = raw.trim();
            raw.parse::<i64>()
                .ok()
                .or_else(|| raw.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    };

    parsed.ok_or_else(|| MarketplaceError::Validation(format!("{field} must be a number")))
}
