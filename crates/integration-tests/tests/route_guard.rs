//! Route guard behaviour over HTTP.

#![allow(clippy::unwrap_used)]

use jatim_bissa_core::Role;
use jatim_bissa_integration_tests::{LIVE_TOKEN, TestApp, location, session_cookie};

#[tokio::test]
async fn test_anonymous_visitor_is_sent_to_login() {
    let app = TestApp::spawn().await;

    for path in ["/dashboard", "/management-company", "/management-admin"] {
        let resp = app.get(path, None).await;
        assert!(resp.status().is_redirection(), "{path} should redirect");
        assert_eq!(location(&resp).as_deref(), Some("/admin/login"), "{path}");
    }
    assert!(app.backend.requests().is_empty());
}

#[tokio::test]
async fn test_admin_cannot_open_admin_management() {
    let app = TestApp::spawn().await;
    let cookies = session_cookie(Role::Admin.as_str(), LIVE_TOKEN);

    let resp = app.get("/management-admin", Some(&cookies)).await;
    assert_eq!(location(&resp).as_deref(), Some("/unauthorized"));

    let resp = app.get("/unauthorized", Some(&cookies)).await;
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn test_superadmin_can_open_admin_management() {
    let app = TestApp::spawn().await;
    let cookies = session_cookie(Role::SuperAdmin.as_str(), LIVE_TOKEN);

    let resp = app.get("/management-admin", Some(&cookies)).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(app.backend.requests_to(&reqwest::Method::GET, "admins").len(), 1);
}

#[tokio::test]
async fn test_signed_in_admin_skips_login_page() {
    let app = TestApp::spawn().await;
    let cookies = session_cookie(Role::Admin.as_str(), LIVE_TOKEN);

    for path in ["/admin/login", "/admin/register", "/admin/forgot-password"] {
        let resp = app.get(path, Some(&cookies)).await;
        assert_eq!(location(&resp).as_deref(), Some("/dashboard"), "{path}");
    }
}

#[tokio::test]
async fn test_forged_login_flag_without_token_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .get("/dashboard", Some("isLogin=true; role=superadmin"))
        .await;
    assert_eq!(location(&resp).as_deref(), Some("/admin/login"));

    // Anything but the exact sentinel is anonymous.
    let resp = app
        .get("/dashboard", Some("isLogin=TRUE; token=tok-live; role=admin"))
        .await;
    assert_eq!(location(&resp).as_deref(), Some("/admin/login"));
}

#[tokio::test]
async fn test_unknown_role_is_forbidden() {
    let app = TestApp::spawn().await;

    let resp = app
        .get("/management-company", Some(&session_cookie("owner", LIVE_TOKEN)))
        .await;
    assert_eq!(location(&resp).as_deref(), Some("/unauthorized"));
}

#[tokio::test]
async fn test_health_is_not_guarded() {
    let app = TestApp::spawn().await;

    let resp = app.get("/health", None).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
