use tracing::{info, warn};
use warden_domain::{EmailAddress, SystemRole, Username, validate_password};

use super::*;

impl AccountService {
    /// Registers an active identity and assigns it the default `user` role.
    ///
    /// The new user is recorded as the assigner of its own default role. If
    /// the role grant fails the identity is deleted again and the grant error
    /// is returned.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<IdentityRecord> {
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        validate_password(password)?;

        if self.identities.exists_by_username(username.as_str()).await? {
            return Err(AppError::Conflict("username is already taken".to_owned()));
        }
        if self.identities.exists_by_email(email.as_str()).await? {
            return Err(AppError::Conflict(
                "email is already registered".to_owned(),
            ));
        }

        let default_role = self
            .authorization
            .get_role_by_name(SystemRole::User.as_str())
            .await
            .map_err(|error| match error {
                AppError::NotFound(_) => AppError::Internal(
                    "default role is missing; system data is not initialized".to_owned(),
                ),
                other => other,
            })?;

        let password_hash = self.hash_bounded(password).await?;
        let identity = self
            .identities
            .create(NewIdentity {
                username: username.as_str().to_owned(),
                email: email.as_str().to_owned(),
                password_hash,
                status: UserStatus::Active,
            })
            .await?;

        if let Err(error) = self
            .authorization
            .assign_role_to_user(identity.id, default_role.id, identity.id)
            .await
        {
            // An identity without its default role must not survive.
            if let Err(cleanup) = self.identities.delete(identity.id).await {
                warn!(user_id = %identity.id, error = %cleanup, "failed to remove roleless user");
            }
            return Err(error);
        }

        info!(user_id = %identity.id, username = %identity.username, "registered user");
        Ok(identity)
    }
}
