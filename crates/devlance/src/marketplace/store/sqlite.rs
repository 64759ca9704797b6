//! SQLite-backed marketplace store.
//!
//! Owns schema initialization and every query in the system. The two
//! consistency-critical paths live here: proposal insertion leans on the
//! `UNIQUE(job_id, developer_id)` constraint, and the accept cascade runs
//! sibling-reject plus target-accept inside one transaction.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use super::{
    JobPatch, MarketplaceStore, NewDeveloperProfile, NewJob, NewProposal, StoreError,
};
use crate::marketplace::browse::{BrowseQuery, SortKey};
use crate::marketplace::domain::{
    ClientProfile, ClientSummary, DeveloperProfile, DeveloperProposalJobRef, DeveloperProposalView,
    DeveloperSummary, Job, JobDetailView, JobId, JobListingView, JobProposalView, JobStatus,
    ListingClientRef, Proposal, ProposalClientRef, ProposalDeveloperRef, ProposalId,
    ProposalJobRef, ProposalReceiptView, ProposalStatus, Role, User, UserId,
};

const JOB_COLUMNS: &str =
    "id, client_id, title, description, budget, skills, category, status, created_at";
const PROPOSAL_COLUMNS: &str =
    "id, job_id, developer_id, proposal_text, proposed_budget, delivery_time_days, status, created_at";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and ensure the schema
    /// exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_lazy_with(options);
        let store = Self { pool };
        store.initialize_tables().await?;

        info!("marketplace store initialized at {url}");
        Ok(store)
    }

    /// Private in-memory database, used by tests and the CLI demo. A single
    /// pooled connection keeps every query on the same memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|err| StoreError::Unavailable(err.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(StoreError::from)?;

        let store = Self { pool };
        store.initialize_tables().await?;
        Ok(store)
    }

    async fn initialize_tables(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                name TEXT,
                password_hash TEXT,
                role TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS client_profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE,
                company TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS developer_profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE,
                description TEXT NOT NULL,
                skills TEXT NOT NULL DEFAULT '[]',
                github_url TEXT NOT NULL,
                portfolio_url TEXT NOT NULL,
                proof_links TEXT NOT NULL DEFAULT '[]',
                experience_years INTEGER NOT NULL,
                domain TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                budget INTEGER NOT NULL,
                skills TEXT NOT NULL DEFAULT '[]',
                category TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'open',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (client_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS proposals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                job_id INTEGER NOT NULL,
                developer_id INTEGER NOT NULL,
                proposal_text TEXT NOT NULL,
                proposed_budget INTEGER NOT NULL,
                delivery_time_days INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (job_id) REFERENCES jobs(id) ON DELETE CASCADE,
                FOREIGN KEY (developer_id) REFERENCES users(id),
                UNIQUE(job_id, developer_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_client_id ON jobs(client_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_proposals_job_id ON proposals(job_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_proposals_developer_id ON proposals(developer_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::UniqueViolation) => {
                StoreError::Conflict
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Fixed-width RFC 3339 timestamp so TEXT comparison orders chronologically.
fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

fn decode_tags(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn like_pattern(term: &str) -> String {
    format!("%{term}%")
}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: Option<String>,
    role: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.id),
            email: row.email,
            name: row.name,
            role: row.role.as_deref().and_then(Role::parse),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct JobRow {
    id: i64,
    client_id: i64,
    title: String,
    description: String,
    budget: i64,
    skills: String,
    category: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: JobId(row.id),
            client_id: UserId(row.client_id),
            title: row.title,
            description: row.description,
            budget: row.budget,
            skills: decode_tags(&row.skills),
            category: row.category,
            status: JobStatus::parse(&row.status),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProposalRow {
    id: i64,
    job_id: i64,
    developer_id: i64,
    proposal_text: String,
    proposed_budget: i64,
    delivery_time_days: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<ProposalRow> for Proposal {
    fn from(row: ProposalRow) -> Self {
        Proposal {
            id: ProposalId(row.id),
            job_id: JobId(row.job_id),
            developer_id: UserId(row.developer_id),
            proposal_text: row.proposal_text,
            proposed_budget: row.proposed_budget,
            delivery_time_days: row.delivery_time_days,
            status: ProposalStatus::parse(&row.status),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ClientProfileRow {
    id: i64,
    user_id: i64,
    company: String,
    created_at: DateTime<Utc>,
}

impl From<ClientProfileRow> for ClientProfile {
    fn from(row: ClientProfileRow) -> Self {
        ClientProfile {
            id: row.id,
            user_id: UserId(row.user_id),
            company: row.company,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct DeveloperProfileRow {
    id: i64,
    user_id: i64,
    description: String,
    skills: String,
    github_url: String,
    portfolio_url: String,
    proof_links: String,
    experience_years: i64,
    domain: String,
    created_at: DateTime<Utc>,
}

impl From<DeveloperProfileRow> for DeveloperProfile {
    fn from(row: DeveloperProfileRow) -> Self {
        DeveloperProfile {
            id: row.id,
            user_id: UserId(row.user_id),
            description: row.description,
            skills: decode_tags(&row.skills),
            github_url: row.github_url,
            portfolio_url: row.portfolio_url,
            proof_links: decode_tags(&row.proof_links),
            experience_years: row.experience_years,
            domain: row.domain,
            created_at: row.created_at,
        }
    }
}

/// Proposal joined with its developer's identity and profile skills.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProposalWithDeveloperRow {
    id: i64,
    job_id: i64,
    developer_id: i64,
    proposal_text: String,
    proposed_budget: i64,
    delivery_time_days: i64,
    status: String,
    created_at: DateTime<Utc>,
    developer_name: Option<String>,
    developer_email: String,
    developer_skills: Option<String>,
}

impl From<ProposalWithDeveloperRow> for JobProposalView {
    fn from(row: ProposalWithDeveloperRow) -> Self {
        let developer = DeveloperSummary {
            id: UserId(row.developer_id),
            name: row.developer_name.clone(),
            email: row.developer_email.clone(),
            skills: row
                .developer_skills
                .as_deref()
                .map(decode_tags)
                .unwrap_or_default(),
        };
        let proposal = Proposal {
            id: ProposalId(row.id),
            job_id: JobId(row.job_id),
            developer_id: UserId(row.developer_id),
            proposal_text: row.proposal_text,
            proposed_budget: row.proposed_budget,
            delivery_time_days: row.delivery_time_days,
            status: ProposalStatus::parse(&row.status),
            created_at: row.created_at,
        };
        JobProposalView {
            proposal,
            developer,
        }
    }
}

/// Proposal joined with its job and the job's client (plus company).
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProposalWithJobRow {
    id: i64,
    job_id: i64,
    developer_id: i64,
    proposal_text: String,
    proposed_budget: i64,
    delivery_time_days: i64,
    status: String,
    created_at: DateTime<Utc>,
    job_title: String,
    client_id: i64,
    client_name: Option<String>,
    client_email: String,
    client_company: Option<String>,
}

impl From<ProposalWithJobRow> for DeveloperProposalView {
    fn from(row: ProposalWithJobRow) -> Self {
        let job = DeveloperProposalJobRef {
            id: JobId(row.job_id),
            title: row.job_title.clone(),
            client: ProposalClientRef {
                id: UserId(row.client_id),
                name: row.client_name.clone(),
                email: row.client_email.clone(),
                company: row.client_company.clone(),
            },
        };
        let proposal = Proposal {
            id: ProposalId(row.id),
            job_id: JobId(row.job_id),
            developer_id: UserId(row.developer_id),
            proposal_text: row.proposal_text,
            proposed_budget: row.proposed_budget,
            delivery_time_days: row.delivery_time_days,
            status: ProposalStatus::parse(&row.status),
            created_at: row.created_at,
        };
        DeveloperProposalView { proposal, job }
    }
}

/// Open-job listing row with client name and proposal count.
#[derive(Debug, Clone, sqlx::FromRow)]
struct JobListingRow {
    id: i64,
    client_id: i64,
    title: String,
    description: String,
    budget: i64,
    skills: String,
    category: String,
    status: String,
    created_at: DateTime<Utc>,
    client_name: Option<String>,
    proposal_count: i64,
}

impl From<JobListingRow> for JobListingView {
    fn from(row: JobListingRow) -> Self {
        let client = ListingClientRef {
            id: UserId(row.client_id),
            name: row.client_name.clone(),
        };
        let job = Job {
            id: JobId(row.id),
            client_id: UserId(row.client_id),
            title: row.title,
            description: row.description,
            budget: row.budget,
            skills: decode_tags(&row.skills),
            category: row.category,
            status: JobStatus::parse(&row.status),
            created_at: row.created_at,
        };
        JobListingView {
            job,
            client,
            proposal_count: row.proposal_count,
        }
    }
}

fn push_browse_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, query: &'a BrowseQuery) {
    builder.push(" WHERE j.status = 'open'");

    if let Some(search) = query.search.as_deref() {
        builder
            .push(" AND (j.title LIKE ")
            .push_bind(like_pattern(search))
            .push(" OR j.description LIKE ")
            .push_bind(like_pattern(search));
        for term in query.search_terms() {
            builder
                .push(" OR j.skills LIKE ")
                .push_bind(like_pattern(term));
        }
        builder.push(")");
    }

    if let Some(category) = query.category.as_deref() {
        builder
            .push(" AND j.category LIKE ")
            .push_bind(like_pattern(category));
    }

    if let Some(bucket) = query.budget {
        let (min, max) = bucket.bounds();
        if let Some(min) = min {
            builder.push(" AND j.budget >= ").push_bind(min);
        }
        if let Some(max) = max {
            builder.push(" AND j.budget <= ").push_bind(max);
        }
    }
}

const fn order_clause(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Newest => " ORDER BY j.created_at DESC, j.id DESC",
        SortKey::Oldest => " ORDER BY j.created_at ASC, j.id ASC",
        SortKey::BudgetHigh => " ORDER BY j.budget DESC, j.id DESC",
        SortKey::BudgetLow => " ORDER BY j.budget ASC, j.id ASC",
        SortKey::ProposalsHigh => " ORDER BY proposal_count DESC, j.id DESC",
        SortKey::ProposalsLow => " ORDER BY proposal_count ASC, j.id ASC",
    }
}

#[async_trait]
impl MarketplaceStore for SqliteStore {
    async fn create_user(&self, email: &str, name: Option<&str>) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (email, name, created_at) VALUES (?, ?, ?) \
             RETURNING id, email, name, role, created_at",
        )
        .bind(email)
        .bind(name)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn fetch_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, created_at FROM users WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn assign_role(&self, id: UserId, role: Role) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ? AND role IS NULL")
            .bind(role.label())
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        match self.fetch_user(id).await? {
            Some(_) => Err(StoreError::Conflict),
            None => Err(StoreError::NotFound),
        }
    }

    async fn insert_client_profile(
        &self,
        user_id: UserId,
        company: &str,
    ) -> Result<ClientProfile, StoreError> {
        let row = sqlx::query_as::<_, ClientProfileRow>(
            "INSERT INTO client_profiles (user_id, company, created_at) VALUES (?, ?, ?) \
             RETURNING id, user_id, company, created_at",
        )
        .bind(user_id.0)
        .bind(company)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn insert_developer_profile(
        &self,
        profile: NewDeveloperProfile<'_>,
    ) -> Result<DeveloperProfile, StoreError> {
        let row = sqlx::query_as::<_, DeveloperProfileRow>(
            "INSERT INTO developer_profiles \
             (user_id, description, skills, github_url, portfolio_url, proof_links, experience_years, domain, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING id, user_id, description, skills, github_url, portfolio_url, proof_links, experience_years, domain, created_at",
        )
        .bind(profile.user_id.0)
        .bind(profile.description)
        .bind(encode_tags(profile.skills))
        .bind(profile.github_url)
        .bind(profile.portfolio_url)
        .bind(encode_tags(profile.proof_links))
        .bind(profile.experience_years)
        .bind(profile.domain)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn insert_job(&self, job: NewJob<'_>) -> Result<Job, StoreError> {
        let sql = format!(
            "INSERT INTO jobs (client_id, title, description, budget, skills, category, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, 'open', ?) RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(job.client_id.0)
            .bind(job.title)
            .bind(job.description)
            .bind(job.budget)
            .bind(encode_tags(job.skills))
            .bind(job.category)
            .bind(now_timestamp())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn fetch_job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?");
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Job::from))
    }

    async fn update_job(&self, id: JobId, patch: JobPatch<'_>) -> Result<Option<Job>, StoreError> {
        let sql = format!(
            "UPDATE jobs SET \
             title = COALESCE(?, title), \
             description = COALESCE(?, description), \
             budget = COALESCE(?, budget), \
             skills = COALESCE(?, skills), \
             category = COALESCE(?, category) \
             WHERE id = ? RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.budget)
            .bind(patch.skills.map(encode_tags))
            .bind(patch.category)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Job::from))
    }

    async fn toggle_job_status(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        let sql = format!(
            "UPDATE jobs SET status = CASE WHEN status = 'open' THEN 'closed' ELSE 'open' END \
             WHERE id = ? RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Job::from))
    }

    async fn delete_job(&self, id: JobId) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM proposals WHERE job_id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn jobs_by_client(&self, client_id: UserId) -> Result<Vec<Job>, StoreError> {
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE client_id = ? ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(client_id.0)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn fetch_job_detail(&self, id: JobId) -> Result<Option<JobDetailView>, StoreError> {
        let Some(job) = self.fetch_job(id).await? else {
            return Ok(None);
        };

        let client = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, created_at FROM users WHERE id = ?",
        )
        .bind(job.client_id.0)
        .fetch_one(&self.pool)
        .await?;

        let proposals = sqlx::query_as::<_, ProposalWithDeveloperRow>(
            "SELECT p.id, p.job_id, p.developer_id, p.proposal_text, p.proposed_budget, \
                    p.delivery_time_days, p.status, p.created_at, \
                    u.name AS developer_name, u.email AS developer_email, \
                    dp.skills AS developer_skills \
             FROM proposals p \
             JOIN users u ON u.id = p.developer_id \
             LEFT JOIN developer_profiles dp ON dp.user_id = p.developer_id \
             WHERE p.job_id = ? \
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(JobDetailView {
            job,
            client: ClientSummary {
                id: UserId(client.id),
                name: client.name,
                email: client.email,
            },
            proposals: proposals.into_iter().map(JobProposalView::from).collect(),
        }))
    }

    async fn browse_jobs(
        &self,
        query: &BrowseQuery,
    ) -> Result<(Vec<JobListingView>, u64), StoreError> {
        let mut count_builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM jobs j");
        push_browse_filters(&mut count_builder, query);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT j.id, j.client_id, j.title, j.description, j.budget, j.skills, \
                    j.category, j.status, j.created_at, \
                    u.name AS client_name, \
                    (SELECT COUNT(*) FROM proposals p WHERE p.job_id = j.id) AS proposal_count \
             FROM jobs j JOIN users u ON u.id = j.client_id",
        );
        push_browse_filters(&mut builder, query);
        builder.push(order_clause(query.sort));
        builder.push(" LIMIT ").push_bind(query.limit as i64);
        builder.push(" OFFSET ").push_bind(query.offset() as i64);

        let rows = builder
            .build_query_as::<JobListingRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((
            rows.into_iter().map(JobListingView::from).collect(),
            total.max(0) as u64,
        ))
    }

    async fn insert_proposal(
        &self,
        proposal: NewProposal<'_>,
    ) -> Result<ProposalReceiptView, StoreError> {
        let sql = format!(
            "INSERT INTO proposals \
             (job_id, developer_id, proposal_text, proposed_budget, delivery_time_days, status, created_at) \
             VALUES (?, ?, ?, ?, ?, 'pending', ?) RETURNING {PROPOSAL_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProposalRow>(&sql)
            .bind(proposal.job_id.0)
            .bind(proposal.developer_id.0)
            .bind(proposal.proposal_text)
            .bind(proposal.proposed_budget)
            .bind(proposal.delivery_time_days)
            .bind(now_timestamp())
            .fetch_one(&self.pool)
            .await?;

        let developer = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, created_at FROM users WHERE id = ?",
        )
        .bind(proposal.developer_id.0)
        .fetch_one(&self.pool)
        .await?;

        let job: (String, i64) =
            sqlx::query_as("SELECT title, client_id FROM jobs WHERE id = ?")
                .bind(proposal.job_id.0)
                .fetch_one(&self.pool)
                .await?;

        Ok(ProposalReceiptView {
            proposal: row.into(),
            developer: ProposalDeveloperRef {
                id: UserId(developer.id),
                name: developer.name,
                email: developer.email,
            },
            job: ProposalJobRef {
                title: job.0,
                client_id: UserId(job.1),
            },
        })
    }

    async fn accept_proposal(
        &self,
        job_id: JobId,
        proposal_id: ProposalId,
    ) -> Result<Proposal, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE proposals SET status = 'rejected' WHERE job_id = ? AND id <> ?")
            .bind(job_id.0)
            .bind(proposal_id.0)
            .execute(&mut *tx)
            .await?;

        let sql = format!(
            "UPDATE proposals SET status = 'accepted' WHERE job_id = ? AND id = ? \
             RETURNING {PROPOSAL_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, ProposalRow>(&sql)
            .bind(job_id.0)
            .bind(proposal_id.0)
            .fetch_optional(&mut *tx)
            .await?;

        // A miss on the compound key rolls back the sibling updates, so a
        // mismatched (job, proposal) pair leaves nothing mutated.
        match updated {
            Some(row) => {
                tx.commit().await?;
                Ok(row.into())
            }
            None => {
                tx.rollback().await?;
                Err(StoreError::NotFound)
            }
        }
    }

    async fn reject_proposal(
        &self,
        job_id: JobId,
        proposal_id: ProposalId,
    ) -> Result<Proposal, StoreError> {
        let sql = format!(
            "UPDATE proposals SET status = 'rejected' WHERE job_id = ? AND id = ? \
             RETURNING {PROPOSAL_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, ProposalRow>(&sql)
            .bind(job_id.0)
            .bind(proposal_id.0)
            .fetch_optional(&self.pool)
            .await?;

        updated.map(Proposal::from).ok_or(StoreError::NotFound)
    }

    async fn proposals_by_developer(
        &self,
        developer_id: UserId,
    ) -> Result<Vec<DeveloperProposalView>, StoreError> {
        let rows = sqlx::query_as::<_, ProposalWithJobRow>(
            "SELECT p.id, p.job_id, p.developer_id, p.proposal_text, p.proposed_budget, \
                    p.delivery_time_days, p.status, p.created_at, \
                    j.title AS job_title, \
                    u.id AS client_id, u.name AS client_name, u.email AS client_email, \
                    cp.company AS client_company \
             FROM proposals p \
             JOIN jobs j ON j.id = p.job_id \
             JOIN users u ON u.id = j.client_id \
             LEFT JOIN client_profiles cp ON cp.user_id = u.id \
             WHERE p.developer_id = ? \
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .bind(developer_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DeveloperProposalView::from).collect())
    }
}
