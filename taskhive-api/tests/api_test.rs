/// End-to-end tests for the HTTP surface
///
/// These drive the full router (middleware included) against PostgreSQL
/// and check the status-code contract: denial collapses to 404 for
/// ownership-sensitive resources, 403 where existence is no secret,
/// 409 for uniqueness conflicts, 422 for validation failures.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{seed_user, send, title, token_for, TestContext};
use taskhive_core::models::user::UserRole;

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new().await;

    let (status, body) = send(&ctx.app, "GET", "/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_requests_without_valid_token_are_unauthorized() {
    let ctx = TestContext::new().await;

    let (status, body) = send(&ctx.app, "GET", "/v1/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(
        &ctx.app,
        "GET",
        "/v1/projects",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_project_crud_roundtrip() {
    let ctx = TestContext::new().await;
    let token = Some(ctx.token.as_str());
    let project_title = title("proj");

    let (status, created) = send(
        &ctx.app,
        "POST",
        "/v1/projects",
        token,
        Some(json!({ "title": project_title, "description": "First project" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], project_title.as_str());
    assert_eq!(created["user_id"], ctx.user.id.to_string());
    assert!(created["team_id"].is_null());
    let id = created["id"].as_str().expect("project id").to_string();

    let (status, fetched) = send(&ctx.app, "GET", &format!("/v1/projects/{id}"), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["description"], "First project");

    let (status, listed) = send(&ctx.app, "GET", "/v1/projects", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed
        .as_array()
        .expect("array")
        .iter()
        .any(|p| p["id"] == id.as_str()));

    // Explicit null clears the description.
    let (status, updated) = send(
        &ctx.app,
        "PUT",
        &format!("/v1/projects/{id}"),
        token,
        Some(json!({ "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["description"].is_null());

    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/v1/projects/{id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&ctx.app, "GET", &format!("/v1/projects/{id}"), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_foreign_project_collapses_to_not_found() {
    let ctx = TestContext::new().await;
    let stranger = seed_user(&ctx.db, UserRole::Member, false).await;
    let stranger_token = token_for(&stranger);

    let (status, created) = send(
        &ctx.app,
        "POST",
        "/v1/projects",
        Some(&ctx.token),
        Some(json!({ "title": title("mine") })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("project id");

    // Read, write, and delete by a stranger all look like a missing row.
    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({ "title": title("theirs") }))),
        ("DELETE", None),
    ] {
        let (status, response) = send(
            &ctx.app,
            method,
            &format!("/v1/projects/{id}"),
            Some(&stranger_token),
            body,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} should 404");
        assert_eq!(response["error"], "not_found");
    }

    // And the owner still has it.
    let (status, _) = send(
        &ctx.app,
        "GET",
        &format!("/v1/projects/{id}"),
        Some(&ctx.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup(&[&stranger]).await;
}

#[tokio::test]
async fn test_duplicate_title_is_conflict() {
    let ctx = TestContext::new().await;
    let token = Some(ctx.token.as_str());
    let project_title = title("dup");

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/v1/projects",
        token,
        Some(json!({ "title": project_title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/projects",
        token,
        Some(json!({ "title": project_title })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_out_of_bounds_input_is_unprocessable() {
    let ctx = TestContext::new().await;

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/projects",
        Some(&ctx.token),
        Some(json!({ "title": "a title far too long for the column" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_admin_role_alone_cannot_list_all_teams() {
    let ctx = TestContext::new().await;
    let half_admin = seed_user(&ctx.db, UserRole::Admin, false).await;
    let full_admin = seed_user(&ctx.db, UserRole::Admin, true).await;

    // role = admin without the superuser flag gets an explicit 403.
    let (status, body) = send(
        &ctx.app,
        "GET",
        "/v1/teams/all",
        Some(&token_for(&half_admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = send(
        &ctx.app,
        "GET",
        "/v1/teams/all",
        Some(&token_for(&full_admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());

    ctx.cleanup(&[&half_admin, &full_admin]).await;
}

#[tokio::test]
async fn test_task_comment_flow_with_activity_trail() {
    let ctx = TestContext::new().await;
    let token = Some(ctx.token.as_str());

    let (_, project) = send(
        &ctx.app,
        "POST",
        "/v1/projects",
        token,
        Some(json!({ "title": title("proj") })),
    )
    .await;
    let project_id = project["id"].as_str().expect("project id").to_string();

    let (status, task) = send(
        &ctx.app,
        "POST",
        "/v1/tasks",
        token,
        Some(json!({
            "title": title("task"),
            "project_id": project_id,
            "due_date": "2026-12-31",
            "priority": "high"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "todo");
    assert_eq!(task["priority"], "high");
    let task_id = task["id"].as_str().expect("task id").to_string();

    let (status, comment) = send(
        &ctx.app,
        "POST",
        "/v1/comments",
        token,
        Some(json!({ "task_id": task_id, "body": "Looks good to me" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, thread) = send(
        &ctx.app,
        "GET",
        &format!("/v1/tasks/{task_id}/comments"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(thread.as_array().expect("array").len(), 1);
    assert_eq!(thread[0]["id"], comment["id"]);

    // One trail record per mutation, tagged with its entity kind.
    let (status, trail) = send(
        &ctx.app,
        "GET",
        &format!("/v1/projects/{project_id}/activities"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entities: Vec<&str> = trail
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["entity"].as_str())
        .collect();
    assert_eq!(entities, vec!["project", "task", "comment"]);
    assert_eq!(trail[2]["activity_type"], "comment");

    // The entity filter narrows the same listing.
    let (_, tasks_only) = send(
        &ctx.app,
        "GET",
        &format!("/v1/projects/{project_id}/activities?entity=task"),
        token,
        None,
    )
    .await;
    assert_eq!(tasks_only.as_array().expect("array").len(), 1);

    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/v1/tasks/{task_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    ctx.cleanup(&[]).await;
}

#[tokio::test]
async fn test_membership_endpoints_and_shared_reads() {
    let ctx = TestContext::new().await;
    let owner_token = Some(ctx.token.as_str());
    let helper = seed_user(&ctx.db, UserRole::Member, false).await;
    let helper_token = token_for(&helper);

    let (_, team) = send(
        &ctx.app,
        "POST",
        "/v1/teams",
        owner_token,
        Some(json!({ "title": title("team") })),
    )
    .await;
    let team_id = team["id"].as_str().expect("team id").to_string();

    let (status, member) = send(
        &ctx.app,
        "POST",
        "/v1/members",
        owner_token,
        Some(json!({ "team_id": team_id, "user_id": helper.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let member_id = member["id"].as_str().expect("member id").to_string();

    let (status, count) = send(
        &ctx.app,
        "GET",
        &format!("/v1/teams/{team_id}/members/count"),
        owner_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["count"], 1);

    // A team project is readable by the member through /projects/member.
    let (_, project) = send(
        &ctx.app,
        "POST",
        "/v1/projects",
        owner_token,
        Some(json!({ "title": title("proj"), "team_id": team_id })),
    )
    .await;
    let project_id = project["id"].as_str().expect("project id");

    let (status, shared) = send(
        &ctx.app,
        "GET",
        "/v1/projects/member",
        Some(&helper_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(shared
        .as_array()
        .expect("array")
        .iter()
        .any(|p| p["id"] == project_id));

    // But the member cannot manage the team itself.
    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/v1/members/{member_id}"),
        Some(&helper_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/v1/members/{member_id}"),
        owner_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    ctx.cleanup(&[&helper]).await;
}

#[tokio::test]
async fn test_list_bounds_are_clamped_not_rejected() {
    let ctx = TestContext::new().await;
    let token = Some(ctx.token.as_str());

    let (status, body) = send(
        &ctx.app,
        "GET",
        "/v1/projects?limit=0&offset=-5",
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());

    let (status, body) = send(
        &ctx.app,
        "GET",
        "/v1/projects?order=desc&limit=5000",
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().expect("array").len() <= 100);

    ctx.cleanup(&[]).await;
}
