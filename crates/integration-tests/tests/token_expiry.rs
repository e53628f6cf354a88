//! Token-expiry eviction through the full request path.
//!
//! The stub API issues dead tokens; the guard must notice before the first
//! dashboard fetch, clear the session, and redirect. After eviction the
//! login pages must treat the visitor as signed out.

use reqwest::StatusCode;

use trackzone_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, EMPLOYEE_EMAIL, EMPLOYEE_PASSWORD, StubApi, TestSite, client,
    expired_token, future_token, location,
};

#[tokio::test]
async fn test_expired_admin_token_is_evicted() {
    let api = StubApi::spawn_with_tokens(expired_token(), future_token()).await;
    let site = TestSite::spawn(&api).await;
    let client = client();

    // Login itself succeeds - the API vouched for the credentials and the
    // expiry is only inspected on guarded navigation.
    let response = client
        .post(site.url("/admin-login"))
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .send()
        .await
        .expect("admin login request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin-dashboard");

    // The first guarded request evicts the dead token and redirects.
    let guarded = client
        .get(site.url("/admin-dashboard"))
        .send()
        .await
        .expect("guarded request");
    assert_eq!(guarded.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&guarded), "/login-selector");

    // The session is gone, so the login page renders instead of bouncing
    // back to a dashboard.
    let login_page = client
        .get(site.url("/admin-login"))
        .send()
        .await
        .expect("login page request");
    assert_eq!(login_page.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_employee_token_is_evicted() {
    let api = StubApi::spawn_with_tokens(future_token(), expired_token()).await;
    let site = TestSite::spawn(&api).await;
    let client = client();

    let response = client
        .post(site.url("/employee-login"))
        .form(&[("email", EMPLOYEE_EMAIL), ("password", EMPLOYEE_PASSWORD)])
        .send()
        .await
        .expect("employee login request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let guarded = client
        .get(site.url("/employee-dashboard"))
        .send()
        .await
        .expect("guarded request");
    assert_eq!(guarded.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&guarded), "/login-selector");

    // Eviction clears the stored identity along with the credentials, so
    // the employee login page renders fresh.
    let login_page = client
        .get(site.url("/employee-login"))
        .send()
        .await
        .expect("login page request");
    assert_eq!(login_page.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_undecodable_token_is_evicted() {
    let api = StubApi::spawn_with_tokens("not-a-bearer-token".to_owned(), future_token()).await;
    let site = TestSite::spawn(&api).await;
    let client = client();

    let response = client
        .post(site.url("/admin-login"))
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .send()
        .await
        .expect("admin login request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Fail-safe: a token whose expiry cannot be read counts as expired.
    let guarded = client
        .get(site.url("/admin-dashboard"))
        .send()
        .await
        .expect("guarded request");
    assert_eq!(guarded.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&guarded), "/login-selector");
}
