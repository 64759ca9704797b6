use std::sync::Arc;

use serde_json::json;

use crate::marketplace::domain::{
    CreateJobRequest, DecisionRequest, JobId, ProposalId, ProposalStatus, Role,
    SubmitProposalRequest, UserId,
};
use crate::marketplace::jobs::JobService;
use crate::marketplace::profiles::ProfileService;
use crate::marketplace::proposals::ProposalService;
use crate::marketplace::store::{MarketplaceStore, NewDeveloperProfile, SqliteStore};

/// Everything a behavior test needs: the services plus direct store access
/// for seeding and assertions.
pub(super) struct Harness {
    pub(super) store: Arc<SqliteStore>,
    pub(super) jobs: JobService<SqliteStore>,
    pub(super) proposals: ProposalService<SqliteStore>,
    pub(super) profiles: ProfileService<SqliteStore>,
}

pub(super) async fn harness() -> Harness {
    let store = Arc::new(
        SqliteStore::in_memory()
            .await
            .expect("in-memory store builds"),
    );
    Harness {
        jobs: JobService::new(store.clone()),
        proposals: ProposalService::new(store.clone()),
        profiles: ProfileService::new(store.clone()),
        store,
    }
}

impl Harness {
    pub(super) async fn client(&self, email: &str, name: &str) -> UserId {
        let user = self
            .store
            .create_user(email, Some(name))
            .await
            .expect("client user");
        self.store
            .assign_role(user.id, Role::Client)
            .await
            .expect("client role");
        user.id
    }

    pub(super) async fn developer(&self, email: &str, name: &str) -> UserId {
        let user = self
            .store
            .create_user(email, Some(name))
            .await
            .expect("developer user");
        self.store
            .assign_role(user.id, Role::Developer)
            .await
            .expect("developer role");
        user.id
    }

    pub(super) async fn developer_with_skills(
        &self,
        email: &str,
        name: &str,
        skills: &[&str],
    ) -> UserId {
        let id = self.developer(email, name).await;
        let skills: Vec<String> = skills.iter().map(|s| s.to_string()).collect();
        self.store
            .insert_developer_profile(NewDeveloperProfile {
                user_id: id,
                description: "seasoned contractor",
                skills: &skills,
                github_url: "https://github.com/example",
                portfolio_url: "https://example.dev",
                proof_links: &[],
                experience_years: 4,
                domain: "Web",
            })
            .await
            .expect("developer profile");
        id
    }

    pub(super) async fn job(&self, client: UserId) -> JobId {
        let job = self
            .jobs
            .create(job_request(client))
            .await
            .expect("job creates");
        job.id
    }

    pub(super) async fn submit(&self, job: JobId, developer: UserId) -> ProposalId {
        self.proposals
            .submit(job, submit_request(developer))
            .await
            .expect("proposal submits")
            .proposal
            .id
    }

    pub(super) async fn decide(
        &self,
        client: UserId,
        job: JobId,
        proposal: ProposalId,
        decision: &str,
    ) -> Result<(), crate::marketplace::MarketplaceError> {
        self.proposals
            .decide(
                client,
                job,
                proposal,
                DecisionRequest {
                    decision: Some(decision.to_string()),
                },
            )
            .await
            .map(|_| ())
    }

    /// Proposal statuses for a job, keyed by proposal id.
    pub(super) async fn statuses(&self, job: JobId) -> Vec<(ProposalId, ProposalStatus)> {
        self.store
            .fetch_job_detail(job)
            .await
            .expect("detail fetch")
            .expect("job present")
            .proposals
            .iter()
            .map(|view| (view.proposal.id, view.proposal.status))
            .collect()
    }

    pub(super) async fn status_of(&self, job: JobId, proposal: ProposalId) -> ProposalStatus {
        self.statuses(job)
            .await
            .into_iter()
            .find(|(id, _)| *id == proposal)
            .map(|(_, status)| status)
            .expect("proposal present")
    }
}

pub(super) fn job_request(client_id: UserId) -> CreateJobRequest {
    CreateJobRequest {
        client_id: Some(client_id),
        title: Some("Build site".to_string()),
        description: Some("Marketing site with a small CMS".to_string()),
        budget: Some(json!(1000)),
        skills: Some(vec!["react".to_string()]),
        category: Some("Web".to_string()),
    }
}

pub(super) fn submit_request(developer_id: UserId) -> SubmitProposalRequest {
    SubmitProposalRequest {
        developer_id: Some(developer_id),
        proposal_text: Some("I can deliver this".to_string()),
        proposed_budget: Some(json!(900)),
        delivery_time_days: Some(json!(10)),
    }
}
