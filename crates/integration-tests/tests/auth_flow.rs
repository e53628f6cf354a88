//! End-to-end login, dashboard, and logout flows.
//!
//! Drives the real site router with a cookie-holding client against the
//! stub TrackZone API. Redirects are never followed automatically so each
//! hop can be asserted.

use reqwest::StatusCode;

use trackzone_integration_tests::{
    ADMIN_EMAIL, ADMIN_NAME, ADMIN_PASSWORD, EMPLOYEE_EMAIL, EMPLOYEE_NAME, EMPLOYEE_PASSWORD,
    TestSite, client, location, spawn_site,
};

async fn login_admin(client: &reqwest::Client, site: &TestSite) {
    let response = client
        .post(site.url("/admin-login"))
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .send()
        .await
        .expect("admin login request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin-dashboard");
}

async fn login_employee(client: &reqwest::Client, site: &TestSite) {
    let response = client
        .post(site.url("/employee-login"))
        .form(&[("email", EMPLOYEE_EMAIL), ("password", EMPLOYEE_PASSWORD)])
        .send()
        .await
        .expect("employee login request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employee-dashboard");
}

#[tokio::test]
async fn test_home_page_renders() {
    let (_api, site) = spawn_site().await;
    let client = client();

    let response = client
        .get(site.url("/"))
        .send()
        .await
        .expect("home page request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("home page body");
    assert!(body.contains("Attendance Tracking"));
    assert!(body.contains("/login-selector"));
}

#[tokio::test]
async fn test_admin_login_reaches_dashboard() {
    let (_api, site) = spawn_site().await;
    let client = client();

    login_admin(&client, &site).await;

    let response = client
        .get(site.url("/admin-dashboard"))
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("dashboard body");
    assert!(body.contains(ADMIN_NAME));
    assert!(body.contains(EMPLOYEE_NAME), "directory should be rendered");
}

#[tokio::test]
async fn test_employee_login_reaches_dashboard() {
    let (_api, site) = spawn_site().await;
    let client = client();

    login_employee(&client, &site).await;

    let response = client
        .get(site.url("/employee-dashboard"))
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("dashboard body");
    assert!(body.contains(EMPLOYEE_NAME));
    assert!(body.contains("6h 30m"), "work metrics should be rendered");
}

#[tokio::test]
async fn test_bad_credentials_bounce_back_to_login() {
    let (_api, site) = spawn_site().await;
    let client = client();

    let response = client
        .post(site.url("/admin-login"))
        .form(&[("email", ADMIN_EMAIL), ("password", "wrong")])
        .send()
        .await
        .expect("admin login request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin-login?error=credentials");

    // The error code renders as user-facing copy, and no session exists.
    let login_page = client
        .get(site.url("/admin-login?error=credentials"))
        .send()
        .await
        .expect("login page request");
    let body = login_page.text().await.expect("login page body");
    assert!(body.contains("Invalid email or password."));

    let guarded = client
        .get(site.url("/admin-dashboard"))
        .send()
        .await
        .expect("guarded request");
    assert_eq!(guarded.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&guarded), "/login-selector");
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let (_api, site) = spawn_site().await;
    let client = client();

    login_admin(&client, &site).await;

    let response = client
        .post(site.url("/logout"))
        .send()
        .await
        .expect("logout request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login-selector");

    let guarded = client
        .get(site.url("/admin-dashboard"))
        .send()
        .await
        .expect("guarded request");
    assert_eq!(guarded.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&guarded), "/login-selector");
}

#[tokio::test]
async fn test_login_pages_bounce_authenticated_sessions() {
    let (_api, site) = spawn_site().await;
    let client = client();

    login_employee(&client, &site).await;

    // Both login pages send an authenticated session to its own dashboard.
    for path in ["/employee-login", "/admin-login"] {
        let response = client
            .get(site.url(path))
            .send()
            .await
            .expect("login page request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/employee-dashboard", "{path}");
    }
}
