use serde_json::json;

use super::common::*;
use crate::marketplace::domain::{
    ClientProfileRequest, DeveloperProfileRequest, Role, SetRoleRequest, UserId,
};
use crate::marketplace::store::MarketplaceStore;
use crate::marketplace::MarketplaceError;

fn set_role(role: &str) -> SetRoleRequest {
    SetRoleRequest {
        role: Some(role.to_string()),
    }
}

fn developer_profile(user_id: UserId) -> DeveloperProfileRequest {
    DeveloperProfileRequest {
        user_id: Some(user_id),
        description: Some("Full-stack contractor".to_string()),
        skills: Some(vec!["rust".to_string(), "react".to_string()]),
        github_url: Some("https://github.com/dev".to_string()),
        portfolio: Some("https://dev.example".to_string()),
        domain: Some("Web".to_string()),
        proof_links: Some(vec!["https://uploads.example/shot.png".to_string()]),
        experience: Some(json!("5")),
    }
}

#[tokio::test]
async fn role_is_set_exactly_once() {
    let h = harness().await;
    let user = h
        .store
        .create_user("new@devlance.test", Some("Newcomer"))
        .await
        .expect("user");

    let role = h
        .profiles
        .set_role(user.id, set_role("client"))
        .await
        .expect("first role set");
    assert_eq!(role, Role::Client);

    match h.profiles.set_role(user.id, set_role("developer")).await {
        Err(MarketplaceError::Conflict(_)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }

    let stored = h
        .store
        .fetch_user(user.id)
        .await
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.role, Some(Role::Client));
}

#[tokio::test]
async fn invalid_role_is_rejected() {
    let h = harness().await;
    let user = h
        .store
        .create_user("new@devlance.test", None)
        .await
        .expect("user");

    match h.profiles.set_role(user.id, set_role("admin")).await {
        Err(MarketplaceError::Validation(message)) => assert_eq!(message, "Invalid Role"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn role_for_unknown_user_is_not_found() {
    let h = harness().await;
    let result = h.profiles.set_role(UserId(4040), set_role("client")).await;
    assert!(matches!(result, Err(MarketplaceError::NotFound(_))));
}

#[tokio::test]
async fn client_profile_is_unique_per_user() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;

    let request = ClientProfileRequest {
        user_id: Some(client),
        company_name: Some("Cora Consulting".to_string()),
    };
    h.profiles
        .create_client_profile(request.clone())
        .await
        .expect("profile creates");

    match h.profiles.create_client_profile(request).await {
        Err(MarketplaceError::Conflict(_)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn developer_profile_requires_its_fields() {
    let h = harness().await;
    let developer = h.developer("d@devlance.test", "Dev").await;

    let mut request = developer_profile(developer);
    request.github_url = None;

    match h.profiles.create_developer_profile(request).await {
        Err(MarketplaceError::Validation(message)) => {
            assert_eq!(message, "All fields are required");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn developer_profile_coerces_experience() {
    let h = harness().await;
    let developer = h.developer("d@devlance.test", "Dev").await;

    let profile = h
        .profiles
        .create_developer_profile(developer_profile(developer))
        .await
        .expect("profile creates");

    assert_eq!(profile.experience_years, 5);
    assert_eq!(profile.skills, vec!["rust".to_string(), "react".to_string()]);
    assert_eq!(
        profile.proof_links,
        vec!["https://uploads.example/shot.png".to_string()]
    );
}

#[tokio::test]
async fn profile_skills_surface_in_job_detail() {
    let h = harness().await;
    let client = h.client("c@devlance.test", "Cora").await;
    let developer = h
        .developer_with_skills("d@devlance.test", "Dev", &["rust", "sqlite"])
        .await;
    let job_id = h.job(client).await;
    h.submit(job_id, developer).await;

    let detail = h.jobs.get(client, job_id).await.expect("detail loads");
    assert_eq!(
        detail.proposals[0].developer.skills,
        vec!["rust".to_string(), "sqlite".to_string()]
    );
}
