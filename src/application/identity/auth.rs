//! Authentication: login and password change

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::user::UserProfile;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub must_change_password: bool,
    pub user: UserProfile,
}

pub struct AuthService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, hash_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            hash_cost,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    /// Authenticate by email + password and issue a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().find_by_email(email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            warn!(user_id = %user.id, "Login attempt on disabled account");
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &user.email, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Crypto(format!("Failed to create token: {}", e)))?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            must_change_password: user.must_change_password,
            user: user.into(),
        })
    }

    /// Replace the password after verifying the current one. Clears the
    /// must-change flag set for admin-created accounts.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let user = self
            .repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::BadRequest(format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let valid = verify_password(current_password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        let new_hash = hash_password(new_password, self.hash_cost)
            .map_err(|e| DomainError::Crypto(format!("Failed to hash password: {}", e)))?;

        self.repos
            .users()
            .update_password(user_id, &new_hash, false)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::identity::UserDirectory;
    use crate::domain::{CreateUserDto, UserRole};
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::testing::memory_db;

    const TEST_COST: u32 = 4;

    async fn setup() -> (AuthService, UserDirectory) {
        let db = memory_db().await;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        let auth = AuthService::new(repos.clone(), JwtConfig::default(), TEST_COST);
        let dir = UserDirectory::new(repos, TEST_COST);
        (auth, dir)
    }

    async fn create(dir: &UserDirectory, email: &str) -> String {
        dir.create_by_admin(CreateUserDto {
            email: email.into(),
            first_name: "Nodir".into(),
            last_name: "Karimov".into(),
            role: UserRole::Doctor,
            temporary_password: "temporary1".into(),
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn login_issues_token_with_claims() {
        let (auth, dir) = setup().await;
        let id = create(&dir, "nodir@clinic.test").await;

        let result = auth.login("nodir@clinic.test", "temporary1").await.unwrap();
        assert_eq!(result.token_type, "Bearer");
        assert_eq!(result.expires_in, 24 * 3600);
        assert!(result.must_change_password);
        assert_eq!(result.user.id, id);

        let claims = verify_token(&result.token, auth.jwt_config()).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "nodir@clinic.test");
        assert_eq!(claims.role, "doctor");
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let (auth, dir) = setup().await;
        create(&dir, "nodir@clinic.test").await;

        let err = auth.login("nodir@clinic.test", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(ref m) if m == "Invalid credentials"));

        let err = auth.login("nobody@clinic.test", "temporary1").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(ref m) if m == "Invalid credentials"));
    }

    #[tokio::test]
    async fn disabled_account_cannot_log_in() {
        let (auth, dir) = setup().await;
        let id = create(&dir, "nodir@clinic.test").await;
        dir.update_status(&id, false).await.unwrap();

        let err = auth.login("nodir@clinic.test", "temporary1").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(ref m) if m == "Account is disabled"));
    }

    #[tokio::test]
    async fn change_password_clears_flag() {
        let (auth, dir) = setup().await;
        let id = create(&dir, "nodir@clinic.test").await;

        auth.change_password(&id, "temporary1", "brand-new-secret")
            .await
            .unwrap();

        assert!(auth.login("nodir@clinic.test", "temporary1").await.is_err());
        let result = auth
            .login("nodir@clinic.test", "brand-new-secret")
            .await
            .unwrap();
        assert!(!result.must_change_password);
    }

    #[tokio::test]
    async fn change_password_rejections() {
        let (auth, dir) = setup().await;
        let id = create(&dir, "nodir@clinic.test").await;

        assert!(matches!(
            auth.change_password(&id, "temporary1", "short").await,
            Err(DomainError::BadRequest(_))
        ));
        assert!(matches!(
            auth.change_password(&id, "not-it", "long-enough-1").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            auth.change_password("ghost", "temporary1", "long-enough-1").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
