use serde_json::json;

use super::common::*;
use crate::marketplace::domain::{DecisionRequest, JobId, ProposalStatus};
use crate::marketplace::proposals::DecisionOutcome;
use crate::marketplace::store::MarketplaceStore;
use crate::marketplace::MarketplaceError;

#[tokio::test]
async fn submit_requires_all_fields() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let developer = h.developer("d@devlance.test", "Dev").await;
    let job_id = h.job(client).await;

    let mut request = submit_request(developer);
    request.proposal_text = Some("   ".to_string());

    match h.proposals.submit(job_id, request).await {
        Err(MarketplaceError::Validation(message)) => {
            assert_eq!(message, "All fields are required");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_against_unknown_job_is_not_found() {
    let h = harness().await;
    let developer = h.developer("d@devlance.test", "Dev").await;

    match h.proposals.submit(JobId(4040), submit_request(developer)).await {
        Err(MarketplaceError::NotFound(message)) => assert_eq!(message, "Job not found"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_requires_developer_role() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let job_id = h.job(client).await;

    let result = h.proposals.submit(job_id, submit_request(client)).await;
    assert!(matches!(result, Err(MarketplaceError::Forbidden(_))));
}

#[tokio::test]
async fn duplicate_submission_conflicts() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let developer = h.developer("d@devlance.test", "Dev").await;
    let job_id = h.job(client).await;

    h.submit(job_id, developer).await;

    match h.proposals.submit(job_id, submit_request(developer)).await {
        Err(MarketplaceError::Conflict(message)) => {
            assert_eq!(message, "You have already submitted a proposal for this job");
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    let detail = h
        .store
        .fetch_job_detail(job_id)
        .await
        .expect("detail")
        .expect("job present");
    assert_eq!(detail.proposals.len(), 1);
}

#[tokio::test]
async fn submit_coerces_numeric_strings() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let developer = h.developer("d@devlance.test", "Dev").await;
    let job_id = h.job(client).await;

    let mut request = submit_request(developer);
    request.proposed_budget = Some(json!("900"));
    request.delivery_time_days = Some(json!("10"));

    let receipt = h
        .proposals
        .submit(job_id, request)
        .await
        .expect("submission succeeds");
    assert_eq!(receipt.proposal.proposed_budget, 900);
    assert_eq!(receipt.proposal.delivery_time_days, 10);
    assert_eq!(receipt.proposal.status, ProposalStatus::Pending);
    assert_eq!(receipt.job.client_id, client);
    assert_eq!(receipt.developer.id, developer);
}

#[tokio::test]
async fn accept_cascades_rejection_to_siblings() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let d1 = h.developer("d1@devlance.test", "One").await;
    let d2 = h.developer("d2@devlance.test", "Two").await;
    let d3 = h.developer("d3@devlance.test", "Three").await;
    let job_id = h.job(client).await;

    let p1 = h.submit(job_id, d1).await;
    let p2 = h.submit(job_id, d2).await;
    let p3 = h.submit(job_id, d3).await;

    h.decide(client, job_id, p2, "accept").await.expect("accept");

    assert_eq!(h.status_of(job_id, p1).await, ProposalStatus::Rejected);
    assert_eq!(h.status_of(job_id, p2).await, ProposalStatus::Accepted);
    assert_eq!(h.status_of(job_id, p3).await, ProposalStatus::Rejected);
}

#[tokio::test]
async fn reject_does_not_cascade() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let d1 = h.developer("d1@devlance.test", "One").await;
    let d2 = h.developer("d2@devlance.test", "Two").await;
    let d3 = h.developer("d3@devlance.test", "Three").await;
    let job_id = h.job(client).await;

    let p1 = h.submit(job_id, d1).await;
    let p2 = h.submit(job_id, d2).await;
    let p3 = h.submit(job_id, d3).await;

    h.decide(client, job_id, p2, "reject").await.expect("reject");

    assert_eq!(h.status_of(job_id, p1).await, ProposalStatus::Pending);
    assert_eq!(h.status_of(job_id, p2).await, ProposalStatus::Rejected);
    assert_eq!(h.status_of(job_id, p3).await, ProposalStatus::Pending);
}

#[tokio::test]
async fn mismatched_pair_fails_and_mutates_nothing() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let d1 = h.developer("d1@devlance.test", "One").await;
    let d2 = h.developer("d2@devlance.test", "Two").await;
    let job_a = h.job(client).await;
    let job_b = h.job(client).await;

    let on_a = h.submit(job_a, d1).await;
    let on_b = h.submit(job_b, d2).await;

    match h.decide(client, job_a, on_b, "accept").await {
        Err(MarketplaceError::NotFound(message)) => assert_eq!(message, "Proposal not found"),
        other => panic!("expected not found, got {other:?}"),
    }

    // The sibling bulk-reject must have rolled back with the failed accept.
    assert_eq!(h.status_of(job_a, on_a).await, ProposalStatus::Pending);
    assert_eq!(h.status_of(job_b, on_b).await, ProposalStatus::Pending);
}

#[tokio::test]
async fn reaccepting_reapplies_the_cascade() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let d1 = h.developer("d1@devlance.test", "One").await;
    let d2 = h.developer("d2@devlance.test", "Two").await;
    let d3 = h.developer("d3@devlance.test", "Three").await;
    let job_id = h.job(client).await;

    let p1 = h.submit(job_id, d1).await;
    let p2 = h.submit(job_id, d2).await;

    h.decide(client, job_id, p1, "accept").await.expect("accept");

    // A later submission on the still-open job starts pending again; the
    // re-accept sweeps it into the rejection cascade.
    let p3 = h.submit(job_id, d3).await;
    assert_eq!(h.status_of(job_id, p3).await, ProposalStatus::Pending);

    h.decide(client, job_id, p1, "accept").await.expect("re-accept");

    assert_eq!(h.status_of(job_id, p1).await, ProposalStatus::Accepted);
    assert_eq!(h.status_of(job_id, p2).await, ProposalStatus::Rejected);
    assert_eq!(h.status_of(job_id, p3).await, ProposalStatus::Rejected);
}

#[tokio::test]
async fn decide_requires_the_owning_client() {
    let h = harness().await;
    let owner = h.client("owner@devlance.test", "Owner").await;
    let other = h.client("other@devlance.test", "Other").await;
    let developer = h.developer("d@devlance.test", "Dev").await;
    let job_id = h.job(owner).await;
    let proposal = h.submit(job_id, developer).await;

    let result = h.decide(other, job_id, proposal, "accept").await;
    assert!(matches!(result, Err(MarketplaceError::Forbidden(_))));
    assert_eq!(h.status_of(job_id, proposal).await, ProposalStatus::Pending);
}

#[tokio::test]
async fn decision_strings_are_normalized_at_the_boundary() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let developer = h.developer("d@devlance.test", "Dev").await;
    let job_id = h.job(client).await;
    let proposal = h.submit(job_id, developer).await;

    // Legacy callers send uppercase past-tense statuses.
    let outcome = h
        .proposals
        .decide(
            client,
            job_id,
            proposal,
            DecisionRequest {
                decision: Some("ACCEPTED".to_string()),
            },
        )
        .await
        .expect("decision applies");

    match outcome {
        DecisionOutcome::Accepted(updated) => {
            assert_eq!(updated.status, ProposalStatus::Accepted);
        }
        other => panic!("expected accepted outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_decision_is_a_validation_error() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let developer = h.developer("d@devlance.test", "Dev").await;
    let job_id = h.job(client).await;
    let proposal = h.submit(job_id, developer).await;

    let result = h.decide(client, job_id, proposal, "maybe").await;
    assert!(matches!(result, Err(MarketplaceError::Validation(_))));
}

#[tokio::test]
async fn developer_listing_embeds_job_and_company() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    h.store
        .insert_client_profile(client, "Cora Consulting")
        .await
        .expect("client profile");
    let developer = h.developer("d@devlance.test", "Dev").await;
    let job_id = h.job(client).await;
    h.submit(job_id, developer).await;

    let listing = h
        .proposals
        .proposals_for_developer(developer)
        .await
        .expect("listing");

    assert_eq!(listing.len(), 1);
    let entry = &listing[0];
    assert_eq!(entry.job.id, job_id);
    assert_eq!(entry.job.title, "Build site");
    assert_eq!(entry.job.client.id, client);
    assert_eq!(entry.job.client.company.as_deref(), Some("Cora Consulting"));
}
