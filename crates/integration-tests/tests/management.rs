//! Management pages against the fake backend.

#![allow(clippy::unwrap_used)]

use jatim_bissa_integration_tests::{LIVE_TOKEN, TestApp, session_cookie};
use reqwest::Method;

fn admin() -> String {
    session_cookie("admin", LIVE_TOKEN)
}

#[tokio::test]
async fn test_list_renders_records_from_wrapped_collection() {
    let app = TestApp::spawn().await;

    let resp = app.get("/management-user", Some(&admin())).await;
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Andi Wijaya"));
    assert!(body.contains("Rina Lestari"));
    assert!(body.contains("Tunarungu"));
}

#[tokio::test]
async fn test_search_filters_rows() {
    let app = TestApp::spawn().await;

    let resp = app.get("/management-user?q=netra", Some(&admin())).await;
    let body = resp.text().await.unwrap();
    assert!(body.contains("Rina Lestari"));
    assert!(!body.contains("Andi Wijaya"));
}

#[tokio::test]
async fn test_empty_collection_shows_empty_state() {
    let app = TestApp::spawn().await;

    let resp = app.get("/management-job", Some(&admin())).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("No job vacancies yet"));
}

#[tokio::test]
async fn test_update_without_password_omits_password_key() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/management-user/77",
            Some(&admin()),
            &[
                ("name", "Andi W."),
                ("email", "andi@mail.com"),
                ("phone", "628123456789"),
                ("disability", "Tunarungu"),
                ("status", "inactive"),
                ("password", ""),
            ],
        )
        .await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Job seeker updated."));

    let updates = app.backend.requests_to(&Method::PUT, "users/77");
    assert_eq!(updates.len(), 1);
    let payload = updates[0].body.as_object().unwrap();
    assert!(!payload.contains_key("password"));
    assert_eq!(payload["name"], "Andi W.");
    assert_eq!(payload["status"], "inactive");

    // Initial load plus the refetch after saving.
    assert_eq!(app.backend.requests_to(&Method::GET, "users").len(), 2);
}

#[tokio::test]
async fn test_invalid_create_keeps_form_open_without_backend_call() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/management-user",
            Some(&admin()),
            &[("name", ""), ("email", "bukan-email"), ("status", "active")],
        )
        .await;

    assert_eq!(resp.status(), 422);
    let body = resp.text().await.unwrap();
    assert!(body.contains("role=\"dialog\""), "form stays open");
    assert!(app.backend.requests_to(&Method::POST, "users").is_empty());
}

#[tokio::test]
async fn test_edit_unknown_record_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.get("/management-company/999/edit", Some(&admin())).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_delete_needs_confirmation_then_calls_backend() {
    let app = TestApp::spawn().await;

    let resp = app.get("/management-company/10/delete", Some(&admin())).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("PT Inklusi Nusantara"));
    assert!(app.backend.requests_to(&Method::DELETE, "companies/10").is_empty());

    let resp = app
        .post_form("/management-company/10/delete", Some(&admin()), &[])
        .await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Company deleted."));
    assert_eq!(app.backend.requests_to(&Method::DELETE, "companies/10").len(), 1);
}

#[tokio::test]
async fn test_applications_cannot_be_created() {
    let app = TestApp::spawn().await;

    let resp = app.get("/management-application/new", Some(&admin())).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_dashboard_loads_only_permitted_collections() {
    let app = TestApp::spawn().await;

    let resp = app.get("/dashboard", Some(&admin())).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Andi Wijaya"));
    assert!(app.backend.requests_to(&Method::GET, "admins").is_empty());
    assert_eq!(app.backend.requests_to(&Method::GET, "applications").len(), 1);

    let resp = app
        .get("/dashboard", Some(&session_cookie("superadmin", LIVE_TOKEN)))
        .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(app.backend.requests_to(&Method::GET, "admins").len(), 1);
}

#[tokio::test]
async fn test_job_seeker_dashboard_fetches_no_management_collections() {
    let app = TestApp::spawn().await;

    let resp = app
        .get("/dashboard", Some(&session_cookie("user", LIVE_TOKEN)))
        .await;
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert!(!body.contains("/management-company"));
    assert!(!body.contains("Recent applications"));
    assert!(app.backend.requests().is_empty());
}
