//! Proposal submission gate and decision engine.
//!
//! Submission enforces the one-proposal-per-developer-per-job rule through
//! the store's uniqueness constraint. Decisions are owner-only; accepting a
//! proposal rejects every sibling on the same job in one atomic unit, which
//! keeps the at-most-one-accepted invariant intact under concurrent
//! decisions.

use std::sync::Arc;

use super::domain::{
    Decision, DecisionRequest, DeveloperProposalView, JobId, Proposal, ProposalId,
    ProposalReceiptView, Role, SubmitProposalRequest, UserId,
};
use super::store::{MarketplaceStore, NewProposal, StoreError};
use super::{coerce_integer, required_text, MarketplaceError};

pub struct ProposalService<S> {
    store: Arc<S>,
}

impl<S> Clone for ProposalService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

/// Result of a decision: accepts return the updated proposal, rejects only
/// confirm.
#[derive(Debug, Clone)]
pub enum DecisionOutcome {
    Accepted(Proposal),
    Rejected(Proposal),
}

impl<S> ProposalService<S>
where
    S: MarketplaceStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Submit a developer's bid on a job. The duplicate check is not a
    /// pre-read; the insert itself conflicts on (job, developer).
    pub async fn submit(
        &self,
        job_id: JobId,
        request: SubmitProposalRequest,
    ) -> Result<ProposalReceiptView, MarketplaceError> {
        let all_fields =
            || MarketplaceError::Validation("All fields are required".to_string());

        let developer_id = request.developer_id.ok_or_else(all_fields)?;
        let proposal_text =
            required_text(request.proposal_text.as_ref()).ok_or_else(all_fields)?;
        let proposed_budget =
            coerce_integer(request.proposed_budget.as_ref().ok_or_else(all_fields)?, "proposedBudget")?;
        let delivery_time_days = coerce_integer(
            request.delivery_time_days.as_ref().ok_or_else(all_fields)?,
            "deliveryTimeDays",
        )?;

        self.store
            .fetch_job(job_id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound("Job not found".to_string()))?;

        let developer = self
            .store
            .fetch_user(developer_id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound("User not found".to_string()))?;
        if developer.role != Some(Role::Developer) {
            return Err(MarketplaceError::Forbidden(
                "only developers can submit proposals".to_string(),
            ));
        }

        self.store
            .insert_proposal(NewProposal {
                job_id,
                developer_id,
                proposal_text,
                proposed_budget,
                delivery_time_days,
            })
            .await
            .map_err(|err| match err {
                StoreError::Conflict => MarketplaceError::Conflict(
                    "You have already submitted a proposal for this job".to_string(),
                ),
                other => other.into(),
            })
    }

    /// Apply a client's accept/reject decision to one proposal of an owned
    /// job. The decision string is normalized before anything is touched.
    pub async fn decide(
        &self,
        caller: UserId,
        job_id: JobId,
        proposal_id: ProposalId,
        request: DecisionRequest,
    ) -> Result<DecisionOutcome, MarketplaceError> {
        let decision = request
            .decision
            .as_deref()
            .and_then(Decision::parse)
            .ok_or_else(|| {
                MarketplaceError::Validation("decision must be accept or reject".to_string())
            })?;

        let job = self
            .store
            .fetch_job(job_id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound("Job not found".to_string()))?;
        if job.client_id != caller {
            return Err(MarketplaceError::Forbidden(
                "only the owning client may decide on proposals".to_string(),
            ));
        }

        let map_miss = |err: StoreError| match err {
            StoreError::NotFound => {
                MarketplaceError::NotFound("Proposal not found".to_string())
            }
            other => other.into(),
        };

        match decision {
            Decision::Accept => {
                let accepted = self
                    .store
                    .accept_proposal(job_id, proposal_id)
                    .await
                    .map_err(map_miss)?;
                Ok(DecisionOutcome::Accepted(accepted))
            }
            Decision::Reject => {
                let rejected = self
                    .store
                    .reject_proposal(job_id, proposal_id)
                    .await
                    .map_err(map_miss)?;
                Ok(DecisionOutcome::Rejected(rejected))
            }
        }
    }

    /// A developer's proposals with their jobs and clients, newest-first.
    pub async fn proposals_for_developer(
        &self,
        developer_id: UserId,
    ) -> Result<Vec<DeveloperProposalView>, MarketplaceError> {
        Ok(self.store.proposals_by_developer(developer_id).await?)
    }
}
