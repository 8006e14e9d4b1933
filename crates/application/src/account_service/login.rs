use tracing::debug;

use super::*;

const INVALID_CREDENTIALS: &str = "invalid credentials";

impl AccountService {
    /// Verifies a username and password and issues a token pair.
    ///
    /// Unknown usernames and wrong passwords fail with the same message.
    /// Status is only revealed after the password matched.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let username = username.trim();
        let Some(identity) = self.identities.find_by_username(username).await? else {
            // Spend the same hashing work as a real verification.
            let _ = self.hash_bounded(password).await;
            debug!("login rejected: unknown username");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        if !self
            .verify_bounded(password, &identity.password_hash)
            .await?
        {
            debug!(user_id = %identity.id, "login rejected: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }

        match identity.status {
            UserStatus::Active => {}
            UserStatus::Inactive => {
                return Err(AppError::Forbidden("account is inactive".to_owned()));
            }
            UserStatus::Banned => {
                return Err(AppError::Forbidden("account is banned".to_owned()));
            }
        }

        let tokens = into_app_result(self.token_manager.issue(&identity.token_subject()))?;
        Ok(LoginOutcome { identity, tokens })
    }
}
