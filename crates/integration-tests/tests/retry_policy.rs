//! Retry behavior for dashboard reads against a flaky remote API.
//!
//! The stub's overview endpoint serves a planned sequence of failures; the
//! test site runs with millisecond backoff so these stay fast.

use reqwest::StatusCode;

use trackzone_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, TestSite, client, spawn_site};

async fn login_admin(client: &reqwest::Client, site: &TestSite) {
    let response = client
        .post(site.url("/admin-login"))
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .send()
        .await
        .expect("admin login request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_transient_server_errors_are_retried() {
    let (api, site) = spawn_site().await;
    let client = client();
    login_admin(&client, &site).await;

    api.fail_overview_with(&[500, 503]);

    let response = client
        .get(site.url("/admin-dashboard"))
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(api.overview_hits(), 3, "two failures then one success");

    let body = response.text().await.expect("dashboard body");
    assert!(
        !body.contains("Could not load the attendance overview."),
        "the retried fetch should have succeeded"
    );
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (api, site) = spawn_site().await;
    let client = client();
    login_admin(&client, &site).await;

    api.fail_overview_with(&[404]);

    let response = client
        .get(site.url("/admin-dashboard"))
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(api.overview_hits(), 1, "4xx responses surface immediately");

    let body = response.text().await.expect("dashboard body");
    assert!(body.contains("Could not load the attendance overview."));
}

#[tokio::test]
async fn test_exhausted_retries_degrade_to_a_notice() {
    let (api, site) = spawn_site().await;
    let client = client();
    login_admin(&client, &site).await;

    api.fail_overview_with(&[500, 500, 500]);

    let response = client
        .get(site.url("/admin-dashboard"))
        .send()
        .await
        .expect("dashboard request");
    // A failed section never takes down the page.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(api.overview_hits(), 3, "retries stop at max attempts");

    let body = response.text().await.expect("dashboard body");
    assert!(body.contains("Could not load the attendance overview."));
}
