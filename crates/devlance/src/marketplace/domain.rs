use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for user accounts (clients and developers alike).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Identifier wrapper for posted jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub i64);

/// Identifier wrapper for submitted proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub i64);

/// Marketplace role a user takes on during onboarding. Unset until then;
/// role-specific operations are blocked while unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Developer,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Developer => "developer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "client" => Some(Role::Client),
            "developer" => Some(Role::Developer),
            _ => None,
        }
    }
}

/// Job visibility toggle. Deliberately binary; richer workflow states do not
/// exist in this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Open,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
        }
    }

    /// Anything that is not `open` decodes as `closed`; the toggle treats any
    /// non-open value as closeable back to `open`.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("open") {
            JobStatus::Open
        } else {
            JobStatus::Closed
        }
    }
}

/// Decision status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "accepted" => ProposalStatus::Accepted,
            "rejected" => ProposalStatus::Rejected,
            _ => ProposalStatus::Pending,
        }
    }
}

/// A client's verdict on one proposal. Parsed case-insensitively so callers
/// sending legacy uppercase values are normalized at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "accept" | "accepted" => Some(Decision::Accept),
            "reject" | "rejected" => Some(Decision::Reject),
            _ => None,
        }
    }
}

/// Account record. Credentials and sessions are handled outside the core;
/// only the identity and role matter here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
}

/// Extension record for users acting as clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub id: i64,
    pub user_id: UserId,
    pub company: String,
    pub created_at: DateTime<Utc>,
}

/// Extension record for users acting as developers. Proof links are opaque
/// URLs produced by an external upload service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperProfile {
    pub id: i64,
    pub user_id: UserId,
    pub description: String,
    pub skills: Vec<String>,
    pub github_url: String,
    pub portfolio_url: String,
    pub proof_links: Vec<String>,
    pub experience_years: i64,
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

/// A unit of work posted by a client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub client_id: UserId,
    pub title: String,
    pub description: String,
    pub budget: i64,
    pub skills: Vec<String>,
    pub category: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

/// A developer's bid on a job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: ProposalId,
    pub job_id: JobId,
    pub developer_id: UserId,
    pub proposal_text: String,
    pub proposed_budget: i64,
    pub delivery_time_days: i64,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Embedded summaries and response views
// ---------------------------------------------------------------------------

/// Client identity embedded in job payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
}

/// Developer identity embedded in proposal payloads, with profile skills.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperSummary {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub skills: Vec<String>,
}

/// One proposal inside a job detail payload.
#[derive(Debug, Clone, Serialize)]
pub struct JobProposalView {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub developer: DeveloperSummary,
}

/// Full job payload returned to the deciding client: the job, its owner, and
/// every proposal newest-first.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetailView {
    #[serde(flatten)]
    pub job: Job,
    pub client: ClientSummary,
    pub proposals: Vec<JobProposalView>,
}

/// Job summary embedded in a freshly submitted proposal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalJobRef {
    pub title: String,
    pub client_id: UserId,
}

/// Developer identity embedded in a freshly submitted proposal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDeveloperRef {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
}

/// Response payload for a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalReceiptView {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub developer: ProposalDeveloperRef,
    pub job: ProposalJobRef,
}

/// Client identity (with company) embedded in a developer's proposal listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalClientRef {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub company: Option<String>,
}

/// Job summary embedded in a developer's proposal listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperProposalJobRef {
    pub id: JobId,
    pub title: String,
    pub client: ProposalClientRef,
}

/// One entry in a developer's "my proposals" listing.
#[derive(Debug, Clone, Serialize)]
pub struct DeveloperProposalView {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub job: DeveloperProposalJobRef,
}

/// Client identity embedded in a browse listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingClientRef {
    pub id: UserId,
    pub name: Option<String>,
}

/// One entry in the public browse listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListingView {
    #[serde(flatten)]
    pub job: Job,
    pub client: ListingClientRef,
    pub proposal_count: i64,
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// Create-job input. Budget arrives as raw JSON so the service can coerce
/// numeric strings and reject everything else with a validation error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateJobRequest {
    pub client_id: Option<UserId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<serde_json::Value>,
    pub skills: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Partial job update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<serde_json::Value>,
    pub skills: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Submit-proposal input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitProposalRequest {
    pub developer_id: Option<UserId>,
    pub proposal_text: Option<String>,
    pub proposed_budget: Option<serde_json::Value>,
    pub delivery_time_days: Option<serde_json::Value>,
}

/// Decide-proposal input; the decision string is parsed case-insensitively.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DecisionRequest {
    pub decision: Option<String>,
}

/// Onboarding role selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetRoleRequest {
    pub role: Option<String>,
}

/// Client onboarding profile input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientProfileRequest {
    pub user_id: Option<UserId>,
    pub company_name: Option<String>,
}

/// Developer onboarding profile input. Experience arrives as raw JSON for the
/// same numeric-string coercion as budgets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeveloperProfileRequest {
    pub user_id: Option<UserId>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub github_url: Option<String>,
    pub portfolio: Option<String>,
    pub domain: Option<String>,
    pub proof_links: Option<Vec<String>>,
    pub experience: Option<serde_json::Value>,
}
