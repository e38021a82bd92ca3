use super::*;
use crate::request::{HttpMethod, MockHttpClient};
use crate::storage::MemoryStorage;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::TimeZone;
use serde_json::json;

const BASE: &str = "http://api.test";
const PROFILE_URL: &str = "http://api.test/api/profile/me";

fn token_with(payload: serde_json::Value) -> String {
    format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.sig",
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn authenticator<'a>(
    mock: &'a MockHttpClient,
    mem: &'a MemoryStorage,
) -> Authenticator<&'a MockHttpClient, &'a MemoryStorage> {
    Authenticator::new(ApiClient::new(mock, BASE), mem, Duration::hours(24))
}

fn mock_profile(mock: &MockHttpClient, role: &str) {
    mock.mock_response(
        HttpMethod::Get,
        PROFILE_URL,
        200,
        json!({ "id": 5, "name": "Asha", "email": "asha@example.com", "role": role }),
    );
}

// =========================================================
// 载荷解码
// =========================================================

#[test]
fn payload_without_role_defaults_to_user() {
    let token = token_with(json!({ "sub": "a@b.com" }));
    let snap = AuthSnapshot::derive(Some(&token));
    assert!(snap.is_authenticated);
    let user = snap.user.unwrap();
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.role, Role::User);
    assert_eq!(user.name, "");
}

#[test]
fn malformed_tokens_are_unauthenticated() {
    for token in ["", "abc", "a..c", "a.!!!!.c", "a.bm90IGpzb24.c"] {
        assert_eq!(AuthSnapshot::derive(Some(token)), AuthSnapshot::default(), "{token}");
    }
    assert_eq!(AuthSnapshot::derive(None), AuthSnapshot::default());
}

#[test]
fn standard_alphabet_with_padding_is_accepted() {
    let payload = json!({ "sub": "x@y.z", "role": "ROLE_ADMIN", "name": "Ops", "exp": 1717243200 });
    let token = format!("h.{}.s", STANDARD.encode(payload.to_string()));
    let claims = TokenClaims::decode(&token).unwrap();
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.name, "Ops");
    assert_eq!(
        claims.expires_at,
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    );
}

#[test]
fn store_token_rederives_synchronously() {
    let mock = MockHttpClient::new();
    let mem = MemoryStorage::new();
    let auth = authenticator(&mock, &mem);
    assert!(!auth.snapshot().is_authenticated);

    let token = token_with(json!({ "sub": "a@b.com", "role": "ROLE_ADMIN" }));
    let snap = auth.store_token(&token).unwrap();
    assert_eq!(snap.user.unwrap().role, Role::Admin);
    assert!(auth.snapshot().is_authenticated);

    auth.logout();
    assert!(!auth.snapshot().is_authenticated);
    assert_eq!(mock.request_count(), 0);
}

// =========================================================
// 会话
// =========================================================

#[test]
fn expiry_is_the_earlier_of_exp_and_ttl() {
    let verified = now();
    let ttl = Duration::hours(24);
    let soon = verified + Duration::hours(1);
    let late = verified + Duration::days(7);
    assert_eq!(session_expiry(Some(soon), verified, ttl), soon);
    assert_eq!(session_expiry(Some(late), verified, ttl), verified + ttl);
    assert_eq!(session_expiry(None, verified, ttl), verified + ttl);
}

#[test]
fn expiry_saturates_when_ttl_overflows_the_calendar() {
    let verified = now();
    let huge = Duration::seconds(9_000_000_000_000);
    let exp = verified + Duration::hours(2);
    assert_eq!(session_expiry(Some(exp), verified, huge), exp);
    assert_eq!(session_expiry(None, verified, huge), DateTime::<Utc>::MAX_UTC);
}

#[tokio::test]
async fn login_verifies_then_persists() {
    let mock = MockHttpClient::new();
    let mem = MemoryStorage::new();
    let token = token_with(json!({ "sub": "asha@example.com", "role": "ROLE_USER" }));
    mock.mock_response(
        HttpMethod::Post,
        "http://api.test/api/auth/login",
        200,
        json!({ "token": token }),
    );
    // 服务端角色优先于令牌声明
    mock_profile(&mock, "ROLE_ADMIN");

    let auth = authenticator(&mock, &mem);
    let session = auth.login(" asha@example.com ", "pw", now()).await.unwrap();

    assert!(session.is_admin());
    assert_eq!(session.user.name, "Asha");
    assert_eq!(session.expires_at, now() + Duration::hours(24));
    assert_eq!(auth.stored_token().as_deref(), Some(token.as_str()));

    let login = &mock.requests_to(HttpMethod::Post, "http://api.test/api/auth/login")[0];
    assert_eq!(login.json_body(), json!({ "email": "asha@example.com", "password": "pw" }));
    let verify = &mock.requests_to(HttpMethod::Get, PROFILE_URL)[0];
    assert_eq!(
        verify.headers.get("Authorization").unwrap(),
        &format!("Bearer {}", token)
    );
}

#[tokio::test]
async fn failed_verification_does_not_persist() {
    let mock = MockHttpClient::new();
    let mem = MemoryStorage::new();
    mock.mock_response(
        HttpMethod::Post,
        "http://api.test/api/auth/signup",
        200,
        json!({ "token": token_with(json!({ "sub": "n@e.w" })) }),
    );
    mock.mock_response(HttpMethod::Get, PROFILE_URL, 401, json!({ "error": "Invalid token" }));

    let auth = authenticator(&mock, &mem);
    let err = auth.signup("New", "n@e.w", "secret1", now()).await.unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::Unauthorized);
    assert!(auth.stored_token().is_none());
}

#[tokio::test]
async fn bad_credentials_surface_backend_message() {
    let mock = MockHttpClient::new();
    let mem = MemoryStorage::new();
    mock.mock_response(
        HttpMethod::Post,
        "http://api.test/api/auth/login",
        400,
        json!({ "error": "Invalid email or password" }),
    );

    let auth = authenticator(&mock, &mem);
    let err = auth.login("a@b.c", "nope", now()).await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn restore_rejects_expired_token() {
    let mock = MockHttpClient::new();
    let mem = MemoryStorage::new();
    let auth = authenticator(&mock, &mem);
    let expired = token_with(json!({ "sub": "a@b.c", "exp": (now() - Duration::minutes(1)).timestamp() }));
    auth.store_token(&expired).unwrap();

    assert!(auth.restore(now()).await.is_none());
    assert!(auth.stored_token().is_none());
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn restore_clears_malformed_token() {
    let mock = MockHttpClient::new();
    let mem = MemoryStorage::new();
    mem.set("token", "not-a-jwt").unwrap();

    let auth = authenticator(&mock, &mem);
    assert!(auth.restore(now()).await.is_none());
    assert!(mem.raw("token").is_none());
}

#[tokio::test]
async fn restore_clears_token_on_401() {
    let mock = MockHttpClient::new();
    let mem = MemoryStorage::new();
    mock.mock_response(HttpMethod::Get, PROFILE_URL, 401, json!({ "error": "expired" }));

    let auth = authenticator(&mock, &mem);
    auth.store_token(&token_with(json!({ "sub": "a@b.c" }))).unwrap();

    assert!(auth.restore(now()).await.is_none());
    assert!(auth.stored_token().is_none());
}

#[tokio::test]
async fn restore_keeps_token_when_offline() {
    let mock = MockHttpClient::new();
    let mem = MemoryStorage::new();
    mock.mock_network_error(HttpMethod::Get, PROFILE_URL);

    let auth = authenticator(&mock, &mem);
    auth.store_token(&token_with(json!({ "sub": "a@b.c" }))).unwrap();

    assert!(auth.restore(now()).await.is_none());
    assert!(auth.stored_token().is_some());
}

#[tokio::test]
async fn restore_builds_session_with_claim_expiry() {
    let mock = MockHttpClient::new();
    let mem = MemoryStorage::new();
    mock_profile(&mock, "ROLE_USER");

    let exp = now() + Duration::hours(2);
    let auth = authenticator(&mock, &mem);
    auth.store_token(&token_with(json!({ "sub": "a@b.c", "exp": exp.timestamp() })))
        .unwrap();

    let session = auth.restore(now()).await.unwrap();
    assert_eq!(session.expires_at, exp);
    assert!(!session.is_expired(now()));
    assert!(session.is_expired(exp));
    assert_eq!(session.time_left(now()), Duration::hours(2));

    assert!(!auth.expire_if_due(&session, now()));
    assert!(auth.expire_if_due(&session, exp + Duration::seconds(1)));
    assert!(auth.stored_token().is_none());
}

#[test]
fn only_anonymous_or_rejected_sessions_are_sent_to_login() {
    let out_of_stock = StoreError::invalid_input("Insufficient stock");
    let rejected = StoreError::unauthorized("token expired");

    assert!(needs_sign_in(false, &out_of_stock));
    assert!(needs_sign_in(false, &rejected));
    assert!(needs_sign_in(true, &rejected));
    assert!(!needs_sign_in(true, &out_of_stock));
    assert!(!needs_sign_in(true, &StoreError::network("offline")));
}
