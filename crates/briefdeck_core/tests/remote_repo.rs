use briefdeck_core::{
    BriefId, BriefInput, BriefListController, BriefRepository, BriefStatus, HttpBriefRepository,
    RepoError,
};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn repo_for(server: &mockito::ServerGuard) -> HttpBriefRepository {
    HttpBriefRepository::new(&format!("{}/api/briefs", server.url()), Duration::from_secs(5))
        .unwrap()
}

#[tokio::test]
async fn create_posts_payload_and_parses_created_brief() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/briefs")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "title": "Logo Concepts",
            "status": "idea",
            "colors": [],
            "tags": []
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":1,"title":"Logo Concepts","status":"idea","colors":[],"tags":[],"references":[],"createdAt":"2024-05-01T08:00:00.000Z"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let created = repo_for(&server)
        .create(&BriefInput {
            status: Some(BriefStatus::Idea),
            ..BriefInput::titled("Logo Concepts")
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.id.as_str(), "1");
    assert_eq!(created.title, "Logo Concepts");
    assert_eq!(created.created_at, "2024-05-01T08:00:00.000Z");
}

#[tokio::test]
async fn create_without_id_in_response_is_invalid_data() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/briefs")
        .with_status(201)
        .with_body(r#"{"title":"No id"}"#)
        .create_async()
        .await;

    let err = repo_for(&server)
        .create(&BriefInput::titled("No id"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[tokio::test]
async fn list_all_keeps_server_order_and_fills_defaults() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/briefs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id":"b","title":"Second by id, first by server","status":"completed"},
                {"id":"a","title":"Mobile Game UI","tags":["mobile","gaming"]}
            ]"#,
        )
        .create_async()
        .await;

    let all = repo_for(&server).list_all().await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id.as_str(), "b");
    assert_eq!(all[0].status, BriefStatus::Completed);
    assert_eq!(all[1].tags, vec!["mobile".to_string(), "gaming".to_string()]);
    assert_eq!(all[1].description, "");
}

#[tokio::test]
async fn list_failure_carries_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/briefs")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let err = repo_for(&server).list_all().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn get_by_id_reads_item_resource() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/briefs/42")
        .with_status(200)
        .with_body(r#"{"id":42,"title":"Poster","references":["https://example.com/ref"]}"#)
        .create_async()
        .await;

    let brief = repo_for(&server)
        .get_by_id(&BriefId::from("42"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(brief.id.as_str(), "42");
    assert_eq!(brief.references, vec!["https://example.com/ref".to_string()]);
}

#[tokio::test]
async fn get_by_id_not_found_is_a_remote_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/briefs/missing")
        .with_status(404)
        .create_async()
        .await;

    let err = repo_for(&server)
        .get_by_id(&BriefId::from("missing"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Remote {
            status: Some(404),
            ..
        }
    ));
}

#[tokio::test]
async fn update_puts_to_item_path_without_id_and_reattaches_it() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/briefs/7")
        .match_body(Matcher::Json(json!({
            "title": "Renamed",
            "description": "",
            "colors": [],
            "references": [],
            "tags": [],
            "status": "in-progress"
        })))
        .with_status(200)
        .with_body(r#"{"title":"Renamed","status":"in-progress"}"#)
        .expect(1)
        .create_async()
        .await;

    let updated = repo_for(&server)
        .update(
            &BriefId::from("7"),
            &BriefInput {
                id: Some(BriefId::from("7")),
                status: Some(BriefStatus::InProgress),
                ..BriefInput::titled("Renamed")
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(updated.id.as_str(), "7");
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.status, BriefStatus::InProgress);
}

#[tokio::test]
async fn update_with_empty_response_body_echoes_payload() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/api/briefs/7")
        .with_status(204)
        .create_async()
        .await;

    let updated = repo_for(&server)
        .update(&BriefId::from("7"), &BriefInput::titled("Quiet server"))
        .await
        .unwrap();
    assert_eq!(updated.id.as_str(), "7");
    assert_eq!(updated.title, "Quiet server");
}

#[tokio::test]
async fn controller_update_sends_listed_created_at() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/api/briefs")
        .with_status(200)
        .with_body(r#"[{"id":"7","title":"Old","createdAt":"2020-01-01T00:00:00.000Z"}]"#)
        .expect_at_least(1)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/api/briefs/7")
        .match_body(Matcher::PartialJson(json!({
            "title": "Renamed",
            "createdAt": "2020-01-01T00:00:00.000Z"
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let mut controller = BriefListController::new(repo_for(&server));
    controller.load().await.unwrap();
    let updated = controller
        .update(&BriefId::from("7"), BriefInput::titled("Renamed"))
        .await
        .unwrap();

    put.assert_async().await;
    assert_eq!(updated.created_at, "2020-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn delete_returns_true_without_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/briefs/7")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    assert!(repo_for(&server)
        .delete(&BriefId::from("7"))
        .await
        .unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_failure_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/briefs/7")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let err = repo_for(&server)
        .delete(&BriefId::from("7"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_backend_is_a_remote_error_without_status() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let repo = HttpBriefRepository::new(
        &format!("http://127.0.0.1:{port}/api/briefs"),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = repo.list_all().await.unwrap_err();
    assert!(matches!(err, RepoError::Remote { status: None, .. }));
}
