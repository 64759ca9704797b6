//! CLI walkthrough of the marketplace lifecycle: onboarding, a job posting,
//! competing proposals, a duplicate-bid rejection, and the accept cascade.

use clap::Args;
use serde_json::json;
use std::sync::Arc;

use devlance::error::AppError;
use devlance::marketplace::store::{MarketplaceStore, SqliteStore};
use devlance::marketplace::{
    BrowseParams, ClientProfileRequest, CreateJobRequest, DecisionRequest, DeveloperProfileRequest,
    MarketplaceError, MarketplaceState, SetRoleRequest, SubmitProposalRequest, UserId,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Run against this SQLite URL instead of a throwaway in-memory database
    #[arg(long)]
    pub(crate) database_url: Option<String>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = match args.database_url.as_deref() {
        Some(url) => SqliteStore::connect(url).await?,
        None => SqliteStore::in_memory().await?,
    };
    let store = Arc::new(store);
    let state = MarketplaceState::new(store.clone());

    println!("== Onboarding ==");
    let cora = onboard(&store, &state, "cora@devlance.dev", "Cora", "client").await?;
    state
        .profiles
        .create_client_profile(ClientProfileRequest {
            user_id: Some(cora),
            company_name: Some("Cora Consulting".to_string()),
        })
        .await?;
    println!("client Cora onboarded (user {})", cora.0);

    let dana = onboard(&store, &state, "dana@devlance.dev", "Dana", "developer").await?;
    let devon = onboard(&store, &state, "devon@devlance.dev", "Devon", "developer").await?;
    for (id, skills) in [(dana, vec!["react", "rust"]), (devon, vec!["react"])] {
        state
            .profiles
            .create_developer_profile(DeveloperProfileRequest {
                user_id: Some(id),
                description: Some("Freelance engineer".to_string()),
                skills: Some(skills.into_iter().map(String::from).collect()),
                github_url: Some("https://github.com/example".to_string()),
                portfolio: Some("https://example.dev".to_string()),
                domain: Some("Web".to_string()),
                proof_links: Some(Vec::new()),
                experience: Some(json!(4)),
            })
            .await?;
    }
    println!("developers Dana and Devon onboarded");

    println!("\n== Job posting ==");
    let job = state
        .jobs
        .create(CreateJobRequest {
            client_id: Some(cora),
            title: Some("Build site".to_string()),
            description: Some("Marketing site with a small CMS".to_string()),
            budget: Some(json!("1000")),
            skills: Some(vec!["react".to_string()]),
            category: Some("Web".to_string()),
        })
        .await?;
    println!(
        "job {} posted: '{}' ({} budget, {})",
        job.id.0,
        job.title,
        job.budget,
        job.status.label()
    );

    println!("\n== Proposals ==");
    let first = state
        .proposals
        .submit(job.id, bid(dana, 900, 10))
        .await?;
    println!(
        "Dana bids {} with {}-day delivery (proposal {})",
        first.proposal.proposed_budget, first.proposal.delivery_time_days, first.proposal.id.0
    );
    let second = state
        .proposals
        .submit(job.id, bid(devon, 1100, 5))
        .await?;
    println!(
        "Devon bids {} with {}-day delivery (proposal {})",
        second.proposal.proposed_budget, second.proposal.delivery_time_days, second.proposal.id.0
    );

    match state.proposals.submit(job.id, bid(dana, 850, 8)).await {
        Err(MarketplaceError::Conflict(message)) => {
            println!("Dana tries a second bid: rejected ({message})");
        }
        Ok(_) => println!("unexpected: duplicate bid was accepted"),
        Err(other) => return Err(other.into()),
    }

    println!("\n== Decision ==");
    state
        .proposals
        .decide(
            cora,
            job.id,
            first.proposal.id,
            DecisionRequest {
                decision: Some("accept".to_string()),
            },
        )
        .await?;

    let detail = state.jobs.get(cora, job.id).await?;
    for view in &detail.proposals {
        println!(
            "proposal {} by {}: {}",
            view.proposal.id.0,
            view.developer.name.as_deref().unwrap_or("?"),
            view.proposal.status.label()
        );
    }

    println!("\n== Browse ==");
    let page = state.jobs.browse(BrowseParams::default()).await?;
    for listing in &page.jobs {
        println!(
            "[{}] {}: {} proposals, budget {}",
            listing.job.category, listing.job.title, listing.proposal_count, listing.job.budget
        );
    }
    println!(
        "page {}/{} ({} total)",
        page.pagination.page, page.pagination.pages, page.pagination.total
    );

    Ok(())
}

async fn onboard(
    store: &Arc<SqliteStore>,
    state: &MarketplaceState<SqliteStore>,
    email: &str,
    name: &str,
    role: &str,
) -> Result<UserId, AppError> {
    let user = store.create_user(email, Some(name)).await?;
    state
        .profiles
        .set_role(
            user.id,
            SetRoleRequest {
                role: Some(role.to_string()),
            },
        )
        .await?;
    Ok(user.id)
}

fn bid(developer: UserId, rate: i64, delivery_days: i64) -> SubmitProposalRequest {
    SubmitProposalRequest {
        developer_id: Some(developer),
        proposal_text: Some("I can deliver this".to_string()),
        proposed_budget: Some(json!(rate)),
        delivery_time_days: Some(json!(delivery_days)),
    }
}
