//! Onboarding: role selection and the client/developer profile records.
//!
//! The role is set exactly once; profile creation is plain record insertion
//! guarded by one-profile-per-user constraints. Proof links are opaque URLs
//! handed over by an external upload service.

use std::sync::Arc;

use super::domain::{
    ClientProfile, ClientProfileRequest, DeveloperProfile, DeveloperProfileRequest, Role,
    SetRoleRequest, UserId,
};
use super::store::{MarketplaceStore, NewDeveloperProfile, StoreError};
use super::{coerce_integer, required_text, MarketplaceError};

pub struct ProfileService<S> {
    store: Arc<S>,
}

impl<S> Clone for ProfileService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> ProfileService<S>
where
    S: MarketplaceStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Pick a marketplace role during onboarding. Immutable once set.
    pub async fn set_role(
        &self,
        caller: UserId,
        request: SetRoleRequest,
    ) -> Result<Role, MarketplaceError> {
        let role = request
            .role
            .as_deref()
            .and_then(Role::parse)
            .ok_or_else(|| MarketplaceError::Validation("Invalid Role".to_string()))?;

        self.store
            .assign_role(caller, role)
            .await
            .map_err(|err| match err {
                StoreError::Conflict => {
                    MarketplaceError::Conflict("role is already set".to_string())
                }
                StoreError::NotFound => {
                    MarketplaceError::NotFound("User not found".to_string())
                }
                other => other.into(),
            })?;

        Ok(role)
    }

    pub async fn create_client_profile(
        &self,
        request: ClientProfileRequest,
    ) -> Result<ClientProfile, MarketplaceError> {
        let all_fields =
            || MarketplaceError::Validation("All fields are required".to_string());
        let user_id = request.user_id.ok_or_else(all_fields)?;
        let company = required_text(request.company_name.as_ref()).ok_or_else(all_fields)?;

        self.existing_user(user_id).await?;

        self.store
            .insert_client_profile(user_id, company)
            .await
            .map_err(profile_conflict)
    }

    pub async fn create_developer_profile(
        &self,
        request: DeveloperProfileRequest,
    ) -> Result<DeveloperProfile, MarketplaceError> {
        let all_fields =
            || MarketplaceError::Validation("All fields are required".to_string());
        let user_id = request.user_id.ok_or_else(all_fields)?;
        let description = required_text(request.description.as_ref()).ok_or_else(all_fields)?;
        let github_url = required_text(request.github_url.as_ref()).ok_or_else(all_fields)?;
        let portfolio_url = required_text(request.portfolio.as_ref()).ok_or_else(all_fields)?;
        let domain = required_text(request.domain.as_ref()).ok_or_else(all_fields)?;
        let experience_years =
            coerce_integer(request.experience.as_ref().ok_or_else(all_fields)?, "experience")?;

        let skills = request.skills.unwrap_or_default();
        let proof_links = request.proof_links.unwrap_or_default();

        self.existing_user(user_id).await?;

        self.store
            .insert_developer_profile(NewDeveloperProfile {
                user_id,
                description,
                skills: &skills,
                github_url,
                portfolio_url,
                proof_links: &proof_links,
                experience_years,
                domain,
            })
            .await
            .map_err(profile_conflict)
    }

    async fn existing_user(&self, user_id: UserId) -> Result<(), MarketplaceError> {
        self.store
            .fetch_user(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| MarketplaceError::NotFound("User not found".to_string()))
    }
}

fn profile_conflict(err: StoreError) -> MarketplaceError {
    match err {
        StoreError::Conflict => {
            MarketplaceError::Conflict("profile already exists for this user".to_string())
        }
        other => other.into(),
    }
}
