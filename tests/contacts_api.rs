mod common;

use axum::http::{Method, StatusCode};
use common::{expect_json, spawn_app};
use serde_json::json;

fn submission() -> serde_json::Value {
    json!({
        "name": "Meera",
        "email": "meera@example.com",
        "phone": "+91 98765 43210",
        "subject": "Bulk zari pricing",
        "message": "Looking for 200 units of golden zari."
    })
}

#[tokio::test]
async fn submission_missing_email_is_rejected_and_not_persisted() {
    let app = spawn_app().await;
    let mut body = submission();
    body.as_object_mut().unwrap().remove("email");

    let response = app.request(Method::POST, "/contacts", None, Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let list = expect_json(
        app.request(Method::GET, "/contacts", Some(&app.staff_token), None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(list["pagination"]["totalCount"], 0);
}

#[tokio::test]
async fn submission_defaults_to_new_and_general() {
    let app = spawn_app().await;
    let created = expect_json(
        app.request(Method::POST, "/contacts", None, Some(submission()))
            .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["contactId"].as_str().unwrap().to_string();

    let inquiry = expect_json(
        app.request(Method::GET, &format!("/contacts/{id}"), Some(&app.staff_token), None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(inquiry["status"], "new");
    assert_eq!(inquiry["inquiryType"], "general");
}

#[tokio::test]
async fn back_office_endpoints_are_staff_only() {
    let app = spawn_app().await;
    for (method, uri) in [
        (Method::GET, "/contacts"),
        (Method::GET, "/contacts/stats/overview"),
    ] {
        let response = app
            .request(method.clone(), uri, Some(&app.customer_token), None)
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{method} {uri}");
        let response = app.request(method, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn respond_marks_replied_and_feeds_stats() {
    let app = spawn_app().await;
    let created = expect_json(
        app.request(Method::POST, "/contacts", None, Some(submission()))
            .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["contactId"].as_str().unwrap().to_string();
    app.request(Method::POST, "/contacts", None, Some(submission())).await;

    let replied = expect_json(
        app.request(
            Method::POST,
            &format!("/contacts/{id}/respond"),
            Some(&app.staff_token),
            Some(json!({"message": "Quote attached."})),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(replied["status"], "replied");
    assert!(replied["response"]["respondedAt"].is_string());

    let stats = expect_json(
        app.request(
            Method::GET,
            "/contacts/stats/overview",
            Some(&app.staff_token),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(stats["totalContacts"], 2);
    assert_eq!(stats["newContacts"], 1);
    assert_eq!(stats["repliedContacts"], 1);
}

#[tokio::test]
async fn assignment_keeps_status() {
    let app = spawn_app().await;
    let created = expect_json(
        app.request(Method::POST, "/contacts", None, Some(submission()))
            .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["contactId"].as_str().unwrap().to_string();

    let assigned = expect_json(
        app.request(
            Method::PATCH,
            &format!("/contacts/{id}/assign"),
            Some(&app.staff_token),
            Some(json!({"assignedTo": uuid::Uuid::now_v7()})),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert!(assigned["assignedTo"].is_string());
    assert_eq!(assigned["status"], "new");
}

#[tokio::test]
async fn unknown_inquiry_status_is_rejected() {
    let app = spawn_app().await;
    let created = expect_json(
        app.request(Method::POST, "/contacts", None, Some(submission()))
            .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["contactId"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::PATCH,
            &format!("/contacts/{id}/status"),
            Some(&app.staff_token),
            Some(json!({"status": "archived"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::PATCH,
            &format!("/contacts/{id}/status"),
            Some(&app.staff_token),
            Some(json!({"status": "read"})),
        )
        .await;
    let updated = expect_json(response, StatusCode::OK).await;
    assert_eq!(updated["status"], "read");
}
