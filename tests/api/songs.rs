use crate::helpers::TestApp;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn create_returns_a_201_and_persists_the_song() {
    let app = TestApp::spawn_app().await;
    app.mock_song_details(
        "Muse",
        "Supermassive Black Hole",
        "2006-06-19",
        "Ooh baby, don't you know I suffer?",
        "https://example.com/supermassive",
    )
    .await;

    let response = app
        .post_create_song(serde_json::json!({
            "group": "Muse",
            "song": "Supermassive Black Hole"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);

    let row: (String, String, String) = sqlx::query_as(
        r#"SELECT "group", song, release_date FROM songs"#,
    )
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to fetch saved song.");

    assert_eq!(row.0, "Muse");
    assert_eq!(row.1, "Supermassive Black Hole");
    assert_eq!(row.2, "2006-06-19");
}

#[tokio::test]
async fn creating_then_fetching_by_the_returned_id_round_trips() {
    let app = TestApp::spawn_app().await;
    app.mock_song_details(
        "Muse",
        "Uprising",
        "2009-09-14",
        "Paranoia is in bloom",
        "https://example.com/uprising",
    )
    .await;

    let response = app
        .post_create_song(serde_json::json!({"group": "Muse", "song": "Uprising"}))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let created: serde_json::Value = response.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);

    let response = app.get_song(id).await;
    assert_eq!(response.status().as_u16(), 200);
    let fetched: serde_json::Value = response.json().await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched["group"], "Muse");
    assert_eq!(fetched["song"], "Uprising");
    assert_eq!(fetched["release_date"], "2009-09-14");
    assert_eq!(fetched["text"], "Paranoia is in bloom");
    assert_eq!(fetched["link"], "https://example.com/uprising");
}

#[tokio::test]
async fn create_returns_a_500_when_the_metadata_api_fails() {
    let app = TestApp::spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.metadata_server)
        .await;

    let response = app
        .post_create_song(serde_json::json!({"group": "Muse", "song": "Uprising"}))
        .await;

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn create_returns_a_400_when_the_merged_song_is_invalid() {
    let app = TestApp::spawn_app().await;
    // The metadata API answers, but with a malformed release date.
    app.mock_song_details(
        "Muse",
        "Uprising",
        "September 2009",
        "Paranoia is in bloom",
        "https://example.com/uprising",
    )
    .await;

    let response = app
        .post_create_song(serde_json::json!({"group": "Muse", "song": "Uprising"}))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn create_returns_a_400_when_the_group_is_empty() {
    let app = TestApp::spawn_app().await;
    app.mock_song_details(
        "",
        "Uprising",
        "2009-09-14",
        "Paranoia is in bloom",
        "https://example.com/uprising",
    )
    .await;

    let response = app
        .post_create_song(serde_json::json!({"group": "", "song": "Uprising"}))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn list_requires_limit_and_offset() {
    let app = TestApp::spawn_app().await;
    let test_cases = vec![
        ("limit=10", "missing the offset"),
        ("offset=0", "missing the limit"),
        ("", "missing both limit and offset"),
    ];

    for (query, error_message) in test_cases {
        let response = app.get_songs(query).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not fail with 400 Bad Request when the query was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn list_rejects_bad_pagination_bounds() {
    let app = TestApp::spawn_app().await;
    let test_cases = vec![
        ("limit=0&offset=0", "a zero limit"),
        ("limit=-1&offset=0", "a negative limit"),
        ("limit=10&offset=-1", "a negative offset"),
        ("limit=0&offset=0&group=Muse", "a zero limit with a filter"),
    ];

    for (query, description) in test_cases {
        let response = app.get_songs(query).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not return a 400 Bad Request for {}.",
            description
        );
    }
}

#[tokio::test]
async fn list_rejects_an_empty_group_filter() {
    let app = TestApp::spawn_app().await;
    let response = app.get_songs("limit=10&offset=0&group=").await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn list_filters_by_group_exactly() {
    let app = TestApp::spawn_app().await;
    app.create_song("Muse", "Uprising").await;
    app.create_song("Ash", "Burn Baby Burn").await;

    let response = app.get_songs("limit=10&offset=0&group=Muse").await;
    assert_eq!(response.status().as_u16(), 200);
    let songs: Vec<serde_json::Value> = response.json().await.unwrap();

    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0]["group"], "Muse");
    assert_eq!(songs[0]["song"], "Uprising");
}

#[tokio::test]
async fn list_paginates_with_a_stable_order() {
    let app = TestApp::spawn_app().await;
    let first = app.create_song("Muse", "Uprising").await;
    let second = app.create_song("Muse", "Starlight").await;

    let response = app.get_songs("limit=1&offset=0").await;
    let page_one: Vec<serde_json::Value> = response.json().await.unwrap();
    let response = app.get_songs("limit=1&offset=1").await;
    let page_two: Vec<serde_json::Value> = response.json().await.unwrap();

    assert_eq!(page_one.len(), 1);
    assert_eq!(page_two.len(), 1);
    assert_eq!(page_one[0]["id"].as_i64().unwrap(), first);
    assert_eq!(page_two[0]["id"].as_i64().unwrap(), second);
}

#[tokio::test]
async fn list_returns_an_empty_array_when_nothing_matches() {
    let app = TestApp::spawn_app().await;
    let response = app.get_songs("limit=10&offset=0&group=Nobody").await;
    assert_eq!(response.status().as_u16(), 200);
    let songs: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(songs.is_empty());
}

#[tokio::test]
async fn get_returns_a_404_for_an_unknown_id() {
    let app = TestApp::spawn_app().await;
    let response = app.get_song(4242).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn get_returns_a_400_for_a_non_positive_id() {
    let app = TestApp::spawn_app().await;
    let response = app.get_song(0).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn update_then_get_reflects_the_new_fields() {
    let app = TestApp::spawn_app().await;
    let id = app.create_song("Muse", "Uprising").await;

    let response = app
        .put_update_song(
            id,
            serde_json::json!({
                "group": "Muse",
                "song": "Uprising (Live)",
                "release_date": "2010-01-01",
                "text": "Paranoia is in bloom",
                "link": "https://example.com/uprising-live"
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let fetched: serde_json::Value = app.get_song(id).await.json().await.unwrap();
    assert_eq!(fetched["song"], "Uprising (Live)");
    assert_eq!(fetched["release_date"], "2010-01-01");
    assert_eq!(fetched["id"].as_i64().unwrap(), id);
}

#[tokio::test]
async fn update_returns_a_404_for_an_unknown_id() {
    let app = TestApp::spawn_app().await;
    let response = app
        .put_update_song(
            4242,
            serde_json::json!({
                "group": "Muse",
                "song": "Uprising",
                "release_date": "2009-09-14",
                "text": "Paranoia is in bloom",
                "link": "https://example.com/uprising"
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn update_returns_a_400_for_an_invalid_payload() {
    let app = TestApp::spawn_app().await;
    let id = app.create_song("Muse", "Uprising").await;

    let response = app
        .put_update_song(
            id,
            serde_json::json!({
                "group": "Muse",
                "song": "Uprising",
                "release_date": "2009-09-14",
                "text": "Paranoia is in bloom",
                "link": "not-a-url"
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn deleting_the_same_id_twice_succeeds_both_times() {
    let app = TestApp::spawn_app().await;
    let id = app.create_song("Muse", "Uprising").await;

    let response = app.delete_song(id).await;
    assert_eq!(response.status().as_u16(), 200);
    // Idempotent: the second delete is a no-op, not an error.
    let response = app.delete_song(id).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.get_song(id).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn song_routes_reject_requests_without_the_api_key() {
    let app = TestApp::spawn_app().await;
    let client = reqwest::Client::new();

    let requests = vec![
        client.get(format!("{}/api/v1/songs?limit=10&offset=0", app.address)),
        client.get(format!("{}/api/v1/songs/1", app.address)),
        client
            .post(format!("{}/api/v1/songs/create", app.address))
            .json(&serde_json::json!({"group": "Muse", "song": "Uprising"})),
        client.delete(format!("{}/api/v1/songs/delete/1", app.address)),
    ];

    for request in requests {
        let response = request.send().await.expect("Failed to execute request.");
        assert_eq!(response.status().as_u16(), 401);
    }
}

#[tokio::test]
async fn song_routes_reject_a_wrong_api_key() {
    let app = TestApp::spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/v1/songs?limit=10&offset=0", app.address))
        .header("Authorization", "not-the-key")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 401);
}
