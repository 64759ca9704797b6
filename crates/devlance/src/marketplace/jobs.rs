//! Job lifecycle: creation, edits, the open/closed toggle, deletion, and the
//! owner-scoped detail view. Every mutation verifies the caller owns the job.

use std::sync::Arc;

use super::browse::{BrowsePage, BrowseParams, BrowseQuery, Pagination};
use super::domain::{
    CreateJobRequest, Job, JobDetailView, JobId, Role, UpdateJobRequest, UserId,
};
use super::store::{JobPatch, MarketplaceStore, NewJob};
use super::{coerce_integer, required_text, MarketplaceError};

pub struct JobService<S> {
    store: Arc<S>,
}

impl<S> Clone for JobService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

fn all_fields_required() -> MarketplaceError {
    MarketplaceError::Validation("All fields are required".to_string())
}

fn job_not_found() -> MarketplaceError {
    MarketplaceError::NotFound("Job not found".to_string())
}

impl<S> JobService<S>
where
    S: MarketplaceStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a job for a client. All fields are required, the budget is
    /// coerced to an integer, and the poster must have completed client
    /// onboarding.
    pub async fn create(&self, request: CreateJobRequest) -> Result<Job, MarketplaceError> {
        let client_id = request.client_id.ok_or_else(all_fields_required)?;
        let title = required_text(request.title.as_ref()).ok_or_else(all_fields_required)?;
        let description =
            required_text(request.description.as_ref()).ok_or_else(all_fields_required)?;
        let category = required_text(request.category.as_ref()).ok_or_else(all_fields_required)?;
        let skills = request
            .skills
            .as_deref()
            .filter(|skills| !skills.is_empty())
            .ok_or_else(all_fields_required)?;
        let budget_raw = request.budget.as_ref().ok_or_else(all_fields_required)?;
        let budget = coerce_integer(budget_raw, "budget")?;

        let poster = self
            .store
            .fetch_user(client_id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound("User not found".to_string()))?;
        if poster.role != Some(Role::Client) {
            return Err(MarketplaceError::Forbidden(
                "only clients can post jobs".to_string(),
            ));
        }

        let job = self
            .store
            .insert_job(NewJob {
                client_id,
                title,
                description,
                budget,
                skills,
                category,
            })
            .await?;
        Ok(job)
    }

    /// Apply a partial edit to an owned job. Blank strings are treated as
    /// absent fields rather than overwriting stored values with nothing.
    pub async fn update(
        &self,
        caller: UserId,
        job_id: JobId,
        request: UpdateJobRequest,
    ) -> Result<Job, MarketplaceError> {
        self.owned_job(caller, job_id).await?;

        let budget = request
            .budget
            .as_ref()
            .map(|raw| coerce_integer(raw, "budget"))
            .transpose()?;

        let updated = self
            .store
            .update_job(
                job_id,
                JobPatch {
                    title: required_text(request.title.as_ref()),
                    description: required_text(request.description.as_ref()),
                    budget,
                    skills: request.skills.as_deref(),
                    category: required_text(request.category.as_ref()),
                },
            )
            .await?
            .ok_or_else(job_not_found)?;
        Ok(updated)
    }

    /// Flip an owned job between `open` and `closed`.
    pub async fn toggle_status(
        &self,
        caller: UserId,
        job_id: JobId,
    ) -> Result<Job, MarketplaceError> {
        self.owned_job(caller, job_id).await?;

        self.store
            .toggle_job_status(job_id)
            .await?
            .ok_or_else(job_not_found)
    }

    /// Delete an owned job; its proposals go with it.
    pub async fn delete(&self, caller: UserId, job_id: JobId) -> Result<(), MarketplaceError> {
        self.owned_job(caller, job_id).await?;

        if self.store.delete_job(job_id).await? {
            Ok(())
        } else {
            Err(job_not_found())
        }
    }

    /// Job detail with proposals, newest-first. Clients may only see their
    /// own jobs; developers may inspect any job before bidding.
    pub async fn get(
        &self,
        caller: UserId,
        job_id: JobId,
    ) -> Result<JobDetailView, MarketplaceError> {
        let user = self
            .store
            .fetch_user(caller)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound("User not found".to_string()))?;

        let detail = self
            .store
            .fetch_job_detail(job_id)
            .await?
            .ok_or_else(job_not_found)?;

        if user.role == Some(Role::Client) && detail.job.client_id != user.id {
            return Err(MarketplaceError::Forbidden("Forbidden".to_string()));
        }

        Ok(detail)
    }

    /// A client's own postings, oldest-first.
    pub async fn jobs_for_client(&self, client_id: UserId) -> Result<Vec<Job>, MarketplaceError> {
        Ok(self.store.jobs_by_client(client_id).await?)
    }

    /// Public listing of open jobs with filters, sorting, and pagination.
    pub async fn browse(&self, params: BrowseParams) -> Result<BrowsePage, MarketplaceError> {
        let query = BrowseQuery::from_params(params);
        let (jobs, total) = self.store.browse_jobs(&query).await?;
        Ok(BrowsePage {
            jobs,
            pagination: Pagination::new(&query, total),
        })
    }

    async fn owned_job(&self, caller: UserId, job_id: JobId) -> Result<Job, MarketplaceError> {
        let job = self
            .store
            .fetch_job(job_id)
            .await?
            .ok_or_else(job_not_found)?;
        if job.client_id != caller {
            return Err(MarketplaceError::Forbidden(
                "only the owning client may modify this job".to_string(),
            ));
        }
        Ok(job)
    }
}
