//! Storage abstraction for the marketplace so the service modules can be
//! exercised in isolation from any one backend.

mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;

use super::browse::BrowseQuery;
use super::domain::{
    ClientProfile, DeveloperProfile, DeveloperProposalView, Job, JobDetailView, JobId,
    JobListingView, Proposal, ProposalId, ProposalReceiptView, Role, User, UserId,
};

/// Error enumeration for store failures. `Conflict` and `NotFound` carry
/// domain meaning; everything unexpected lands in `Unavailable` and is
/// surfaced to callers as an internal error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// New job row, validated upstream by the job service.
#[derive(Debug, Clone)]
pub struct NewJob<'a> {
    pub client_id: UserId,
    pub title: &'a str,
    pub description: &'a str,
    pub budget: i64,
    pub skills: &'a [String],
    pub category: &'a str,
}

/// Field-wise job patch; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct JobPatch<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub budget: Option<i64>,
    pub skills: Option<&'a [String]>,
    pub category: Option<&'a str>,
}

/// New proposal row, validated upstream by the submission gate.
#[derive(Debug, Clone)]
pub struct NewProposal<'a> {
    pub job_id: JobId,
    pub developer_id: UserId,
    pub proposal_text: &'a str,
    pub proposed_budget: i64,
    pub delivery_time_days: i64,
}

/// New developer profile row.
#[derive(Debug, Clone)]
pub struct NewDeveloperProfile<'a> {
    pub user_id: UserId,
    pub description: &'a str,
    pub skills: &'a [String],
    pub github_url: &'a str,
    pub portfolio_url: &'a str,
    pub proof_links: &'a [String],
    pub experience_years: i64,
    pub domain: &'a str,
}

/// Durable storage for users, profiles, jobs, and proposals.
///
/// Two methods carry the system's consistency guarantees and must be atomic
/// in any implementation: [`insert_proposal`](Self::insert_proposal) relies
/// on a (job, developer) uniqueness constraint rather than a read-then-write,
/// and [`accept_proposal`](Self::accept_proposal) applies the sibling-reject
/// cascade and the target accept as one transaction.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    // -- users and onboarding ------------------------------------------------

    async fn create_user(&self, email: &str, name: Option<&str>) -> Result<User, StoreError>;

    async fn fetch_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Assign a role to a user that does not have one yet. `Conflict` when
    /// the role is already set, `NotFound` for unknown users.
    async fn assign_role(&self, id: UserId, role: Role) -> Result<(), StoreError>;

    async fn insert_client_profile(
        &self,
        user_id: UserId,
        company: &str,
    ) -> Result<ClientProfile, StoreError>;

    async fn insert_developer_profile(
        &self,
        profile: NewDeveloperProfile<'_>,
    ) -> Result<DeveloperProfile, StoreError>;

    // -- jobs ----------------------------------------------------------------

    async fn insert_job(&self, job: NewJob<'_>) -> Result<Job, StoreError>;

    async fn fetch_job(&self, id: JobId) -> Result<Option<Job>, StoreError>;

    async fn update_job(&self, id: JobId, patch: JobPatch<'_>) -> Result<Option<Job>, StoreError>;

    /// Flip `open` <-> `closed` in a single conditional update.
    async fn toggle_job_status(&self, id: JobId) -> Result<Option<Job>, StoreError>;

    /// Remove a job and cascade-delete its proposals. Returns `false` when
    /// the job did not exist.
    async fn delete_job(&self, id: JobId) -> Result<bool, StoreError>;

    async fn jobs_by_client(&self, client_id: UserId) -> Result<Vec<Job>, StoreError>;

    /// Job with embedded client summary and proposals (newest-first), each
    /// proposal carrying its developer summary and profile skills.
    async fn fetch_job_detail(&self, id: JobId) -> Result<Option<JobDetailView>, StoreError>;

    /// Filtered, sorted page of open jobs plus the total row count.
    async fn browse_jobs(
        &self,
        query: &BrowseQuery,
    ) -> Result<(Vec<JobListingView>, u64), StoreError>;

    // -- proposals -----------------------------------------------------------

    /// Insert a pending proposal. The (job, developer) uniqueness constraint
    /// closes the duplicate-submission race; violations map to `Conflict`.
    async fn insert_proposal(
        &self,
        proposal: NewProposal<'_>,
    ) -> Result<ProposalReceiptView, StoreError>;

    /// Accept one proposal and reject every sibling of the same job, as one
    /// atomic unit. `NotFound` (with nothing mutated) when the compound
    /// (job, proposal) key does not match.
    async fn accept_proposal(
        &self,
        job_id: JobId,
        proposal_id: ProposalId,
    ) -> Result<Proposal, StoreError>;

    /// Reject one proposal; no cascade. Keyed on the compound key like
    /// [`accept_proposal`](Self::accept_proposal).
    async fn reject_proposal(
        &self,
        job_id: JobId,
        proposal_id: ProposalId,
    ) -> Result<Proposal, StoreError>;

    async fn proposals_by_developer(
        &self,
        developer_id: UserId,
    ) -> Result<Vec<DeveloperProposalView>, StoreError>;
}
