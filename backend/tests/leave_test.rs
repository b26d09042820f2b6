mod common;

use std::net::SocketAddr;

use leavedesk_backend::{auth::Role, config::ReviewerScope};
use time::Duration;

async fn submit(addr: SocketAddr, token: &str, body: &serde_json::Value) -> reqwest::Response {
    common::http_client()
        .post(format!("http://{}/api/leave", addr))
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .unwrap()
}

async fn review(addr: SocketAddr, token: &str, id: &str, action: &str) -> reqwest::Response {
    common::http_client()
        .put(format!("http://{}/api/leave/{}/{}", addr, id, action))
        .bearer_auth(token)
        .json(&serde_json::json!({ "comments": "Noted" }))
        .send()
        .await
        .unwrap()
}

async fn balance(addr: SocketAddr, token: &str, date: time::Date) -> serde_json::Value {
    let resp = common::http_client()
        .get(format!(
            "http://{}/api/balance?year={}&month={}",
            addr,
            date.year(),
            u8::from(date.month())
        ))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn submit_approve_then_overdraw() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (teacher_id, teacher) = common::login_as(addr, &state, Role::Teacher, "Computer Science").await;
    let (hod_id, hod) = common::login_as(addr, &state, Role::Hod, "Computer Science").await;
    let start = common::next_month(3);

    let resp = submit(addr, &teacher, &common::leave_body(start, 2, "casual")).await;
    assert_eq!(resp.status(), 200);
    let app: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(app["status"], "pending");
    assert_eq!(app["days_count"], 2);
    assert_eq!(app["employee_id"].as_str().unwrap(), teacher_id.to_string());

    // Submitting alone does not consume balance.
    let before = balance(addr, &teacher, start).await;
    assert_eq!(before["total_taken"], 0);
    assert_eq!(before["total_remaining"], 5);

    let resp = review(addr, &hod, app["id"].as_str().unwrap(), "approve").await;
    assert_eq!(resp.status(), 200);
    let approved: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["reviewed_by"].as_str().unwrap(), hod_id.to_string());
    assert_eq!(approved["review_comments"], "Noted");

    let after = balance(addr, &teacher, start).await;
    assert_eq!(after["total_taken"], 2);
    assert_eq!(after["total_remaining"], 3);
    assert_eq!(after["per_category_taken"]["casual"], 2);

    let resp = submit(addr, &teacher, &common::leave_body(start + Duration::days(7), 4, "casual")).await;
    assert_eq!(resp.status(), 409);
    let err: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(err["code"], "insufficient_balance");
}

#[tokio::test]
async fn request_for_exactly_the_allowance_is_accepted() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (_id, teacher) = common::login_as(addr, &state, Role::Teacher, "Physics").await;
    let start = common::next_month(10);

    let ok = submit(addr, &teacher, &common::leave_body(start, 5, "sick")).await;
    assert_eq!(ok.status(), 200);

    let over = submit(addr, &teacher, &common::leave_body(start, 6, "sick")).await;
    assert_eq!(over.status(), 409);
}

#[tokio::test]
async fn invalid_submissions_are_rejected() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (_id, teacher) = common::login_as(addr, &state, Role::Teacher, "Physics").await;
    let start = common::next_month(12);

    let yesterday = time::OffsetDateTime::now_utc().date() - Duration::days(1);
    let resp = submit(addr, &teacher, &common::leave_body(yesterday, 1, "casual")).await;
    assert_eq!(resp.status(), 400);
    let err: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(err["code"], "past_date");

    let mut reversed = common::leave_body(start, 1, "casual");
    reversed["end_date"] = serde_json::json!((start - Duration::days(1)).to_string());
    let resp = submit(addr, &teacher, &reversed).await;
    assert_eq!(resp.status(), 400);
    let err: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(err["code"], "invalid_range");

    let mut blank = common::leave_body(start, 1, "casual");
    blank["reason"] = serde_json::json!("   ");
    assert_eq!(submit(addr, &teacher, &blank).await.status(), 400);

    let mut unknown_type = common::leave_body(start, 1, "casual");
    unknown_type["leave_type"] = serde_json::json!("sabbatical");
    assert_eq!(submit(addr, &teacher, &unknown_type).await.status(), 400);
}

#[tokio::test]
async fn teacher_cannot_review() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (_a, author) = common::login_as(addr, &state, Role::Teacher, "Physics").await;
    let (_b, colleague) = common::login_as(addr, &state, Role::Teacher, "Physics").await;

    let app: serde_json::Value = submit(addr, &author, &common::leave_body(common::next_month(4), 1, "casual"))
        .await
        .json()
        .await
        .unwrap();
    let id = app["id"].as_str().unwrap();

    assert_eq!(review(addr, &colleague, id, "approve").await.status(), 403);
    assert_eq!(review(addr, &author, id, "approve").await.status(), 403);

    // Nor may a colleague read it.
    let resp = common::http_client()
        .get(format!("http://{}/api/leave/{}", addr, id))
        .bearer_auth(&colleague)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn hod_is_limited_to_own_department() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (_t, teacher) = common::login_as(addr, &state, Role::Teacher, "Physics").await;
    let (_h, cs_hod) = common::login_as(addr, &state, Role::Hod, "Computer Science").await;
    let (_p, principal) = common::login_as(addr, &state, Role::Principal, "Administration").await;

    let app: serde_json::Value = submit(addr, &teacher, &common::leave_body(common::next_month(5), 1, "emergency"))
        .await
        .json()
        .await
        .unwrap();
    let id = app["id"].as_str().unwrap();

    let listed: Vec<serde_json::Value> = common::http_client()
        .get(format!("http://{}/api/leave", addr))
        .bearer_auth(&cs_hod)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty(), "Physics application must be hidden from the CS HOD");

    assert_eq!(review(addr, &cs_hod, id, "reject").await.status(), 403);
    assert_eq!(review(addr, &principal, id, "reject").await.status(), 200);
}

#[tokio::test]
async fn all_scope_lets_any_hod_review() {
    let (addr, state) = common::setup_test_app(ReviewerScope::All).await;
    let (_t, teacher) = common::login_as(addr, &state, Role::Teacher, "Physics").await;
    let (_h, cs_hod) = common::login_as(addr, &state, Role::Hod, "Computer Science").await;

    let app: serde_json::Value = submit(addr, &teacher, &common::leave_body(common::next_month(6), 1, "other"))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(review(addr, &cs_hod, app["id"].as_str().unwrap(), "approve").await.status(), 200);
}

#[tokio::test]
async fn processed_application_cannot_be_reviewed_again() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (_t, teacher) = common::login_as(addr, &state, Role::Teacher, "Mathematics").await;
    let (_p, principal) = common::login_as(addr, &state, Role::Principal, "Administration").await;
    let start = common::next_month(7);

    let app: serde_json::Value = submit(addr, &teacher, &common::leave_body(start, 1, "casual"))
        .await
        .json()
        .await
        .unwrap();
    let id = app["id"].as_str().unwrap();

    assert_eq!(review(addr, &principal, id, "approve").await.status(), 200);

    for action in ["approve", "reject"] {
        let resp = review(addr, &principal, id, action).await;
        assert_eq!(resp.status(), 409);
        let err: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(err["code"], "already_processed");
    }

    // Status is reported ahead of the department boundary.
    let (_h, cs_hod) = common::login_as(addr, &state, Role::Hod, "Computer Science").await;
    let resp = review(addr, &cs_hod, id, "reject").await;
    assert_eq!(resp.status(), 409);

    let after = balance(addr, &teacher, start).await;
    assert_eq!(after["total_taken"], 1, "Second approval must not charge again");
}

#[tokio::test]
async fn rejection_leaves_balance_untouched() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (_t, teacher) = common::login_as(addr, &state, Role::Teacher, "Chemistry").await;
    let (_h, hod) = common::login_as(addr, &state, Role::Hod, "Chemistry").await;
    let start = common::next_month(8);

    let app: serde_json::Value = submit(addr, &teacher, &common::leave_body(start, 3, "sick"))
        .await
        .json()
        .await
        .unwrap();

    let resp = common::http_client()
        .put(format!("http://{}/api/leave/{}/reject", addr, app["id"].as_str().unwrap()))
        .bearer_auth(&hod)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let rejected: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(rejected["status"], "rejected");

    let after = balance(addr, &teacher, start).await;
    assert_eq!(after["total_taken"], 0);
    assert_eq!(after["total_remaining"], 5);
}

#[tokio::test]
async fn reviewer_list_puts_pending_first_with_names() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (_t, teacher) = common::login_as(addr, &state, Role::Teacher, "English").await;
    let (_h, hod) = common::login_as(addr, &state, Role::Hod, "English").await;

    let first: serde_json::Value = submit(addr, &teacher, &common::leave_body(common::next_month(9), 1, "casual"))
        .await
        .json()
        .await
        .unwrap();
    submit(addr, &teacher, &common::leave_body(common::next_month(14), 1, "casual")).await;
    review(addr, &hod, first["id"].as_str().unwrap(), "approve").await;

    let listed: Vec<serde_json::Value> = common::http_client()
        .get(format!("http://{}/api/leave", addr))
        .bearer_auth(&hod)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["status"], "pending");
    assert_eq!(listed[1]["status"], "approved");
    assert_eq!(listed[0]["employee_department"], "English");
    assert!(listed[0]["employee_name"].as_str().unwrap().starts_with("Test"));
}

#[tokio::test]
async fn balance_of_another_user_requires_scope() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (teacher_id, _teacher) = common::login_as(addr, &state, Role::Teacher, "Physics").await;
    let (_o, other_teacher) = common::login_as(addr, &state, Role::Teacher, "Physics").await;
    let (_h, hod) = common::login_as(addr, &state, Role::Hod, "Physics").await;

    let url = format!("http://{}/api/balance/{}", addr, teacher_id);
    let client = common::http_client();

    let denied = client.get(&url).bearer_auth(&other_teacher).send().await.unwrap();
    assert_eq!(denied.status(), 403);

    let allowed = client.get(&url).bearer_auth(&hod).send().await.unwrap();
    assert_eq!(allowed.status(), 200);
    let body: serde_json::Value = allowed.json().await.unwrap();
    assert_eq!(body["total_monthly_allowance"], 5);
    assert_eq!(body["employee_id"].as_str().unwrap(), teacher_id.to_string());

    let bad_month = client
        .get(format!("{}?month=13", url))
        .bearer_auth(&hod)
        .send()
        .await
        .unwrap();
    assert_eq!(bad_month.status(), 400);
}

#[tokio::test]
async fn monthly_report_counts_visible_applications() {
    let (addr, state) = common::setup_test_app(ReviewerScope::Department).await;
    let (_t, teacher) = common::login_as(addr, &state, Role::Teacher, "Physics").await;
    let (_p, principal) = common::login_as(addr, &state, Role::Principal, "Administration").await;
    let start = common::next_month(15);

    let app: serde_json::Value = submit(addr, &teacher, &common::leave_body(start, 1, "sick"))
        .await
        .json()
        .await
        .unwrap();
    submit(addr, &teacher, &common::leave_body(start + Duration::days(2), 1, "casual")).await;
    review(addr, &principal, app["id"].as_str().unwrap(), "approve").await;

    let client = common::http_client();
    let url = format!(
        "http://{}/api/reports/monthly?year={}&month={}",
        addr,
        start.year(),
        u8::from(start.month())
    );

    let denied = client.get(&url).bearer_auth(&teacher).send().await.unwrap();
    assert_eq!(denied.status(), 403);

    let resp = client.get(&url).bearer_auth(&principal).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let stats: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["approved"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["by_department"]["Physics"], 2);
    assert_eq!(stats["by_leave_type"]["sick"], 1);
}
