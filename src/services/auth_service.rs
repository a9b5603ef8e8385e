//! Auth Service - login, registration and the account approval workflow
//!
//! New accounts start pending and cannot log in until an admin approves
//! them. Every login attempt pays the same fixed delay and credential
//! failures share one message, so responses leak nothing about which
//! accounts exist.

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::info;

use crate::auth::JwtService;
use crate::db::models::{
    AccountStatus, AuditAction, AuditEntity, LoginRequest, LoginResponse, RegisterRequest, User,
    UserCreate, UserRole,
};
use crate::db::repository::{self, RepoError};
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// Flat cost added to every login attempt.
const LOGIN_DELAY_MS: u64 = 500;

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(pool: SqlitePool, jwt: Arc<JwtService>) -> Self {
        Self { pool, jwt }
    }

    /// Authenticate and issue a token.
    ///
    /// Unknown email and wrong password both answer with the same 401.
    /// Pending and blocked accounts are refused even with the right
    /// password.
    pub async fn login(&self, payload: &LoginRequest) -> AppResult<LoginResponse> {
        tokio::time::sleep(Duration::from_millis(LOGIN_DELAY_MS)).await;

        let user = match repository::user::find_by_email(&self.pool, &payload.email).await? {
            Some(user) => user,
            None => {
                security_log!("WARN", "login_unknown_email", email = payload.email.clone());
                return Err(AppError::invalid_credentials());
            }
        };

        let password_ok = user.verify_password(&payload.password).unwrap_or(false);
        if !password_ok {
            security_log!("WARN", "login_bad_password", user_id = user.id);
            return Err(AppError::invalid_credentials());
        }

        match user.status {
            AccountStatus::Pending => {
                security_log!("WARN", "login_pending_account", user_id = user.id);
                return Err(AppError::account_inactive("Account pending approval"));
            }
            AccountStatus::Blocked => {
                security_log!("WARN", "login_blocked_account", user_id = user.id);
                return Err(AppError::account_inactive("Account blocked"));
            }
            AccountStatus::Active => {}
        }

        let token = self
            .jwt
            .generate_token(&user)
            .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

        security_log!("INFO", "login_success", user_id = user.id);
        Ok(LoginResponse { token, user })
    }

    /// Create a pending account. An admin must approve it before login works.
    pub async fn register(&self, payload: RegisterRequest) -> AppResult<User> {
        let password_hash = User::hash_password(&payload.password)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let data = UserCreate {
            name: payload.name,
            email: payload.email,
            password_hash,
            role: payload.role.unwrap_or(UserRole::Waiter),
            status: AccountStatus::Pending,
        };

        let user = match repository::user::create(&self.pool, data).await {
            Ok(user) => user,
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::business("Email already registered"));
            }
            Err(e) => return Err(e.into()),
        };

        repository::audit::append(
            &self.pool,
            AuditEntity::User,
            user.id,
            AuditAction::Create,
            None,
            None,
        )
        .await?;

        security_log!("INFO", "account_registered", user_id = user.id);
        Ok(user)
    }

    /// Accounts waiting for approval, oldest first.
    pub async fn pending_users(&self) -> AppResult<Vec<User>> {
        let users =
            repository::user::find_by_status(&self.pool, AccountStatus::Pending).await?;
        Ok(users)
    }

    /// Approve a pending account so it can log in.
    pub async fn approve(&self, admin_id: i64, user_id: i64) -> AppResult<User> {
        let user = repository::user::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        if user.status != AccountStatus::Pending {
            return Err(AppError::business("Only pending accounts can be approved"));
        }

        let snapshot = serde_json::to_string(&user)
            .map_err(|e| AppError::internal(format!("Snapshot serialization failed: {e}")))?;
        let user =
            repository::user::update_status(&self.pool, user_id, AccountStatus::Active).await?;

        repository::audit::append(
            &self.pool,
            AuditEntity::User,
            user_id,
            AuditAction::StatusChange,
            Some(admin_id),
            Some(snapshot),
        )
        .await?;

        security_log!("INFO", "account_approved", user_id = user_id, admin_id = admin_id);
        Ok(user)
    }

    /// Reject a pending account. The row is deleted; the audit entry keeps
    /// its snapshot.
    pub async fn reject(&self, admin_id: i64, user_id: i64) -> AppResult<()> {
        let user = repository::user::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        if user.status != AccountStatus::Pending {
            return Err(AppError::business("Only pending accounts can be rejected"));
        }

        let snapshot = serde_json::to_string(&user)
            .map_err(|e| AppError::internal(format!("Snapshot serialization failed: {e}")))?;
        repository::user::delete(&self.pool, user_id).await?;

        repository::audit::append(
            &self.pool,
            AuditEntity::User,
            user_id,
            AuditAction::Delete,
            Some(admin_id),
            Some(snapshot),
        )
        .await?;

        security_log!("INFO", "account_rejected", user_id = user_id, admin_id = admin_id);
        Ok(())
    }

    /// Ensure the admin account exists. Called once at startup; a second
    /// run with the same email is a no-op.
    pub async fn seed_admin(&self, email: &str, password: &str) -> AppResult<()> {
        if repository::user::find_by_email(&self.pool, email)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let password_hash = User::hash_password(password)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        let data = UserCreate {
            name: "Administrator".to_string(),
            email: email.to_string(),
            password_hash,
            role: UserRole::Admin,
            status: AccountStatus::Active,
        };
        let user = repository::user::create(&self.pool, data).await?;

        repository::audit::append(
            &self.pool,
            AuditEntity::User,
            user.id,
            AuditAction::Create,
            None,
            None,
        )
        .await?;

        info!(email, "Admin account seeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::db::DbService;
    use crate::db::models::AuditQuery;

    fn test_jwt() -> Arc<JwtService> {
        Arc::new(JwtService::with_config(JwtConfig {
            secret: "unit-test-signing-secret-0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "comanda-server".to_string(),
            audience: "comanda-clients".to_string(),
        }))
    }

    async fn service() -> AuthService {
        let db = DbService::new_in_memory().await.unwrap();
        AuthService::new(db.pool, test_jwt())
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "segredo1".to_string(),
            role: None,
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn registration_creates_a_pending_waiter() {
        let svc = service().await;
        let user = svc.register(register_request("ana@test.local")).await.unwrap();
        assert_eq!(user.status, AccountStatus::Pending);
        assert_eq!(user.role, UserRole::Waiter);

        let err = svc
            .login(&login_request("ana@test.local", "segredo1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccountInactive(_)));
    }

    #[tokio::test]
    async fn approved_account_can_log_in() {
        let svc = service().await;
        let user = svc.register(register_request("bia@test.local")).await.unwrap();
        svc.approve(1, user.id).await.unwrap();

        let response = svc
            .login(&login_request("bia@test.local", "segredo1"))
            .await
            .unwrap();
        assert!(!response.token.is_empty());
        assert_eq!(response.user.email, "bia@test.local");
    }

    #[tokio::test]
    async fn rejected_account_is_gone_but_audited() {
        let svc = service().await;
        let user = svc.register(register_request("caio@test.local")).await.unwrap();
        svc.reject(1, user.id).await.unwrap();

        let err = svc
            .login(&login_request("caio@test.local", "segredo1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials(_)));

        let entries = repository::audit::find_all(
            &svc.pool,
            &AuditQuery {
                entity: Some(AuditEntity::User),
                action: Some(AuditAction::Delete),
                limit: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(entries.len(), 1);
        let snapshot = entries[0].snapshot.as_deref().unwrap();
        assert!(snapshot.contains("caio@test.local"));
        assert!(!snapshot.contains("password_hash"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_share_a_message() {
        let svc = service().await;
        let user = svc.register(register_request("dora@test.local")).await.unwrap();
        svc.approve(1, user.id).await.unwrap();

        let wrong_password = svc
            .login(&login_request("dora@test.local", "errada99"))
            .await
            .unwrap_err();
        let unknown_email = svc
            .login(&login_request("ninguem@test.local", "segredo1"))
            .await
            .unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn login_pays_the_fixed_delay() {
        let svc = service().await;
        let start = std::time::Instant::now();
        let _ = svc.login(&login_request("x@test.local", "whatever1")).await;
        assert!(start.elapsed() >= Duration::from_millis(LOGIN_DELAY_MS));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_business_error() {
        let svc = service().await;
        svc.register(register_request("eva@test.local")).await.unwrap();
        let err = svc
            .register(register_request("eva@test.local"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn approving_an_active_account_fails() {
        let svc = service().await;
        let user = svc.register(register_request("gil@test.local")).await.unwrap();
        svc.approve(1, user.id).await.unwrap();
        let err = svc.approve(1, user.id).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn admin_seed_is_idempotent() {
        let svc = service().await;
        svc.seed_admin("admin@test.local", "admin123").await.unwrap();
        svc.seed_admin("admin@test.local", "admin123").await.unwrap();

        let admin = repository::user::find_by_email(&svc.pool, "admin@test.local")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.status, AccountStatus::Active);

        let response = svc
            .login(&login_request("admin@test.local", "admin123"))
            .await
            .unwrap();
        assert_eq!(response.user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn pending_list_shows_only_pending() {
        let svc = service().await;
        let first = svc.register(register_request("h1@test.local")).await.unwrap();
        svc.register(register_request("h2@test.local")).await.unwrap();
        svc.approve(1, first.id).await.unwrap();

        let pending = svc.pending_users().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].email, "h2@test.local");
    }
}
