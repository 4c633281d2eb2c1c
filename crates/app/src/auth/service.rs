//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenSecret, ApiTokenVersion, AuthServiceError, AuthenticatedUser,
        IssuedApiToken, TokenHasher, build_verifier_input, format_api_token,
        models::NewApiToken, parse_api_token, repository::PgAuthRepository,
    },
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    hasher: TokenHasher,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool, hasher: TokenHasher) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
            hasher,
        }
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or database insertion fails.
    pub async fn issue_api_token(
        &self,
        user_uuid: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = ApiTokenSecret::generate();
        let token = format_api_token(token_uuid, version, &secret);

        let token_hash = self
            .hasher
            .hash(&build_verifier_input(&token_uuid, version, &user_uuid, &secret));

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                user_uuid,
                version,
                token_hash,
                expires_at,
            })
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user_uuid: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens_by_user(user_uuid).await?)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        Ok(self
            .repository
            .revoke_api_token(token_uuid)
            .await?
            .is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|_ignored| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token(parsed.token_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let verifier_input = build_verifier_input(
            &parsed.token_uuid,
            parsed.version,
            &token.user_uuid,
            &parsed.secret,
        );

        if !self.hasher.verify(&verifier_input, &token.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort; a failed touch does not fail authentication.
        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed.token_uuid)
            .await
        {
            debug!(%error, "failed to record api token use");
        }

        Ok(AuthenticatedUser {
            uuid: token.user_uuid,
            role: token.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, ToSpan};
    use testresult::TestResult;

    use crate::{domain::users::records::Role, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_as_its_user() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_user(Role::Admin).await?;

        let issued = ctx.auth.issue_api_token(admin, None).await?;
        let user = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(user.uuid, admin);
        assert!(user.is_admin());

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::User).await?;

        let issued = ctx.auth.issue_api_token(user, None).await?;

        let mut tampered = issued.token.clone();
        let last = if tampered.ends_with('0') { '1' } else { '0' };
        tampered.pop();
        tampered.push(last);

        let result = ctx.auth.authenticate_bearer(&tampered).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::User).await?;

        let issued = ctx.auth.issue_api_token(user, None).await?;

        assert!(ctx.auth.revoke_api_token(issued.metadata.uuid).await?);
        assert!(!ctx.auth.revoke_api_token(issued.metadata.uuid).await?);

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::User).await?;

        let expired_at = Timestamp::now().checked_sub(1.hour())?;
        let issued = ctx.auth.issue_api_token(user, Some(expired_at)).await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn issuing_for_unknown_user_fails() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.issue_api_token(UserUuid::new(), None).await;

        assert!(
            matches!(result, Err(AuthServiceError::UnknownUser)),
            "expected UnknownUser, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_api_tokens_returns_issued_tokens() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::User).await?;

        ctx.auth.issue_api_token(user, None).await?;
        ctx.auth.issue_api_token(user, None).await?;

        let tokens = ctx.auth.list_api_tokens(user).await?;

        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|token| token.user_uuid == user));

        Ok(())
    }
}
