//! Integration tests for the authentication service.

use chrono::{DateTime, Utc};
use warden_auth::config::AuthConfig;
use warden_auth::password::PasswordSecurity;
use warden_auth::service::AuthService;
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::principal::ListScope;
use warden_core::models::role::AccessRole;
use warden_core::models::user::{CreateUser, User};
use warden_core::repository::{PaginatedResult, Pagination, UserRepository};
use warden_db::InMemoryUserRepository;

const TEST_SECRET: &str = "integration-test-signing-secret-0123456789";

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.into(),
        jwt_algorithm: "HS256".into(),
        access_token_lifetime_secs: 900,
        min_password_length: 8,
        password_hash_cost: 1,
        hash_refresh_tokens: true,
    }
}

/// In-memory store with a single user `juzernejm` / `pass`.
async fn setup_with(
    config: &AuthConfig,
    active: bool,
) -> (AuthService<InMemoryUserRepository>, InMemoryUserRepository, User) {
    let repo = InMemoryUserRepository::new();
    let security = PasswordSecurity::from_config(config).unwrap();

    let user = repo
        .create(CreateUser {
            first_name: "Juzer".into(),
            last_name: "Nejm".into(),
            username: "juzernejm".into(),
            email: "juzernejm@mail.com".into(),
            password_hash: security.hash("pass").unwrap(),
            role: AccessRole::User,
            company_id: 1,
            location_id: 1,
            active,
        })
        .await
        .unwrap();

    let service = AuthService::new(repo.clone(), config).unwrap();
    (service, repo, user)
}

async fn setup() -> (AuthService<InMemoryUserRepository>, InMemoryUserRepository, User) {
    setup_with(&test_config(), true).await
}

fn assert_auth_failed(err: WardenError) {
    assert!(
        matches!(err, WardenError::AuthenticationFailed { .. }),
        "expected AuthenticationFailed, got {err:?}"
    );
}

#[tokio::test]
async fn login_success() {
    let (service, repo, user) = setup().await;

    let before = Utc::now();
    let auth = service.authenticate("juzernejm", "pass").await.unwrap();

    assert!(!auth.token.is_empty());
    assert!(!auth.refresh_token.is_empty());

    let expires: DateTime<Utc> = auth.expires.parse().unwrap();
    let expected = before + chrono::TimeDelta::seconds(900);
    assert!((expires - expected).num_seconds().abs() <= 2);

    let stored = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(stored.token.as_deref(), Some(auth.refresh_token.as_str()));
    assert!(stored.last_login.is_some());
}

#[tokio::test]
async fn login_wrong_password_leaves_user_untouched() {
    let (service, repo, user) = setup().await;

    let err = service
        .authenticate("juzernejm", "wrong")
        .await
        .unwrap_err();
    assert_auth_failed(err);

    let stored = repo.get_by_id(user.id).await.unwrap();
    assert!(stored.token.is_none());
    assert!(stored.last_login.is_none());
}

#[tokio::test]
async fn login_unknown_user_matches_wrong_password() {
    let (service, _repo, _user) = setup().await;

    let unknown = service.authenticate("nobody", "pass").await.unwrap_err();
    let wrong = service
        .authenticate("juzernejm", "wrong")
        .await
        .unwrap_err();
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn login_inactive_account() {
    let (service, repo, user) = setup_with(&test_config(), false).await;

    let err = service
        .authenticate("juzernejm", "pass")
        .await
        .unwrap_err();
    match err {
        WardenError::AuthenticationFailed { reason } => assert!(reason.contains("inactive")),
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
    assert!(repo.get_by_id(user.id).await.unwrap().token.is_none());
}

#[tokio::test]
async fn refresh_issues_new_access_token_without_rotation() {
    let (service, _repo, user) = setup().await;
    let auth = service.authenticate("juzernejm", "pass").await.unwrap();

    let first = service.refresh(&auth.refresh_token).await.unwrap();
    let principal = service
        .codec()
        .validate(&first.token)
        .expect("refreshed token should validate");
    assert_eq!(principal.id, user.id);
    assert_eq!(principal.username, "juzernejm");

    // The refresh value stays usable until the next login.
    let second = service.refresh(&auth.refresh_token).await.unwrap();
    assert_ne!(first.token, second.token);
}

#[tokio::test]
async fn refresh_with_unknown_value_fails() {
    let (service, _repo, _user) = setup().await;
    service.authenticate("juzernejm", "pass").await.unwrap();

    assert_auth_failed(service.refresh("not-a-refresh-value").await.unwrap_err());
    assert_auth_failed(service.refresh("").await.unwrap_err());
}

#[tokio::test]
async fn new_login_invalidates_previous_refresh_value() {
    let (service, _repo, _user) = setup().await;

    let old = service.authenticate("juzernejm", "pass").await.unwrap();
    let new = service.authenticate("juzernejm", "pass").await.unwrap();
    assert_ne!(old.refresh_token, new.refresh_token);

    assert_auth_failed(service.refresh(&old.refresh_token).await.unwrap_err());
    service.refresh(&new.refresh_token).await.unwrap();
}

#[tokio::test]
async fn concurrent_logins_leave_exactly_one_refresh_value() {
    let (service, repo, user) = setup().await;

    let (a, b) = tokio::join!(
        service.authenticate("juzernejm", "pass"),
        service.authenticate("juzernejm", "pass"),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.refresh_token, b.refresh_token);

    let stored = repo.get_by_id(user.id).await.unwrap().token.unwrap();
    let (winner, loser) = if stored == a.refresh_token {
        (a, b)
    } else {
        assert_eq!(stored, b.refresh_token);
        (b, a)
    };

    service.refresh(&winner.refresh_token).await.unwrap();
    assert_auth_failed(service.refresh(&loser.refresh_token).await.unwrap_err());
}

#[tokio::test]
async fn unhashed_refresh_value_is_the_access_token() {
    let config = AuthConfig {
        hash_refresh_tokens: false,
        ..test_config()
    };
    let (service, _repo, _user) = setup_with(&config, true).await;

    let auth = service.authenticate("juzernejm", "pass").await.unwrap();
    assert_eq!(auth.refresh_token, auth.token);
}

#[tokio::test]
async fn hashed_refresh_value_is_hex_digest() {
    let (service, _repo, _user) = setup().await;

    let auth = service.authenticate("juzernejm", "pass").await.unwrap();
    assert_ne!(auth.refresh_token, auth.token);
    assert_eq!(auth.refresh_token.len(), 64);
    assert!(auth.refresh_token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn me_returns_own_record() {
    let (service, _repo, user) = setup().await;
    let auth = service.authenticate("juzernejm", "pass").await.unwrap();

    let principal = service
        .validate(&format!("Bearer {}", auth.token))
        .unwrap();
    let me = service.me(&principal).await.unwrap();
    assert_eq!(me.id, user.id);
    assert_eq!(me.email, "juzernejm@mail.com");
}

#[tokio::test]
async fn validate_bearer_header() {
    let (service, _repo, user) = setup().await;
    let auth = service.authenticate("juzernejm", "pass").await.unwrap();

    let principal = service
        .validate(&format!("Bearer {}", auth.token))
        .unwrap();
    assert_eq!(principal.id, user.id);
    assert_eq!(principal.role, AccessRole::User);
    assert_eq!(principal.company_id, 1);
    assert_eq!(principal.location_id, 1);

    assert_auth_failed(service.validate("").unwrap_err());
    assert_auth_failed(service.validate(&auth.token).unwrap_err());
    assert_auth_failed(service.validate(&format!("Basic {}", auth.token)).unwrap_err());
    assert_auth_failed(service.validate("Bearer not.a.jwt").unwrap_err());
}

#[tokio::test]
async fn token_from_other_secret_is_rejected() {
    let (service, _repo, _user) = setup().await;

    let other_config = AuthConfig {
        jwt_secret: "a-completely-different-secret-0123456789".into(),
        ..test_config()
    };
    let (other, _, _) = setup_with(&other_config, true).await;
    let foreign = other.authenticate("juzernejm", "pass").await.unwrap();

    assert_auth_failed(
        service
            .validate(&format!("Bearer {}", foreign.token))
            .unwrap_err(),
    );
}

#[test]
fn unsupported_algorithm_refuses_to_start() {
    let config = AuthConfig {
        jwt_algorithm: "RS256".into(),
        ..test_config()
    };
    assert!(AuthService::new(InMemoryUserRepository::new(), &config).is_err());

    let config = AuthConfig {
        jwt_algorithm: "nope".into(),
        ..test_config()
    };
    assert!(AuthService::new(InMemoryUserRepository::new(), &config).is_err());
}

/// Store that fails every call with a backend error, optionally letting
/// username lookups through.
struct BrokenStore {
    user: Option<User>,
}

fn backend_error(what: &str) -> WardenError {
    WardenError::Database(format!("{what}: connection reset"))
}

impl UserRepository for BrokenStore {
    async fn create(&self, _input: CreateUser) -> WardenResult<User> {
        Err(WardenError::Internal("create is not used here".into()))
    }

    async fn get_by_id(&self, _id: u64) -> WardenResult<User> {
        Err(backend_error("get_by_id"))
    }

    async fn get_by_username(&self, _username: &str) -> WardenResult<User> {
        self.user.clone().ok_or_else(|| backend_error("get_by_username"))
    }

    async fn get_by_refresh_token(&self, _token: &str) -> WardenResult<User> {
        Err(backend_error("get_by_refresh_token"))
    }

    async fn update(&self, _user: &User) -> WardenResult<()> {
        Err(backend_error("update"))
    }

    async fn delete(&self, _id: u64) -> WardenResult<()> {
        Err(backend_error("delete"))
    }

    async fn list(
        &self,
        _scope: ListScope,
        _pagination: Pagination,
    ) -> WardenResult<PaginatedResult<User>> {
        Err(backend_error("list"))
    }
}

fn stored_user(config: &AuthConfig) -> User {
    let security = PasswordSecurity::from_config(config).unwrap();
    let now = Utc::now();
    User {
        id: 1,
        first_name: "Juzer".into(),
        last_name: "Nejm".into(),
        username: "juzernejm".into(),
        email: "juzernejm@mail.com".into(),
        password_hash: security.hash("pass").unwrap(),
        mobile: None,
        phone: None,
        address: None,
        active: true,
        last_login: None,
        last_password_change: None,
        token: None,
        role: AccessRole::User,
        company_id: 1,
        location_id: 1,
        created_at: now,
        updated_at: now,
    }
}

fn assert_backend_error(err: WardenError, what: &str) {
    match err {
        WardenError::Database(msg) => assert_eq!(msg, format!("{what}: connection reset")),
        other => panic!("expected Database error from {what}, got {other:?}"),
    }
}

#[tokio::test]
async fn login_lookup_failure_is_not_invalid_credentials() {
    let service = AuthService::new(BrokenStore { user: None }, &test_config()).unwrap();

    let err = service
        .authenticate("juzernejm", "pass")
        .await
        .unwrap_err();
    assert_backend_error(err, "get_by_username");
}

#[tokio::test]
async fn login_aborts_when_refresh_value_cannot_be_saved() {
    let config = test_config();
    let store = BrokenStore {
        user: Some(stored_user(&config)),
    };
    let service = AuthService::new(store, &config).unwrap();

    let result = service.authenticate("juzernejm", "pass").await;
    assert!(result.is_err(), "no token may be handed out");
    assert_backend_error(result.unwrap_err(), "update");
}

#[tokio::test]
async fn refresh_lookup_failure_is_not_invalid_refresh_token() {
    let service = AuthService::new(BrokenStore { user: None }, &test_config()).unwrap();

    let err = service.refresh("some-refresh-value").await.unwrap_err();
    assert_backend_error(err, "get_by_refresh_token");
}
