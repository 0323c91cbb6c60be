//! Integration tests for the public project list, landing page and detail view.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json, row, FakeTable};
use huma_core::home::{DEFAULT_CARD_IMAGE, EMPTY_GRID_MESSAGE};
use serde_json::json;

#[tokio::test]
async fn list_returns_normalized_records_in_table_order() {
    let app = build_test_app(
        FakeTable::with_rows(vec![
            row(2, "Altos del Sol", -32.95, -68.85),
            row(1, "Lomas", -32.90, -68.80),
        ]),
        None,
    )
    .await;

    let json = body_json(get(app.app(), "/api/v1/projects").await).await;
    let data = &json["data"];
    assert_eq!(data["origin"], "remote");
    assert!(data["error"].is_null());
    assert_eq!(data["version"], 1);
    assert_eq!(data["records"][0]["id"], "2");
    assert_eq!(data["records"][0]["name"], "Altos del Sol");
    assert_eq!(data["records"][0]["coordinates"], json!([-32.95, -68.85]));
    assert_eq!(data["records"][1]["media"][1]["alt_text"], "Lote");
}

#[tokio::test]
async fn malformed_rows_degrade_instead_of_failing() {
    let mut broken = row(3, "", 0.0, 0.0);
    broken.nombre = None;
    broken.coordinates = Some(json!("not json"));
    broken.map_description = None;
    let app = build_test_app(FakeTable::with_rows(vec![broken]), None).await;

    let json = body_json(get(app.app(), "/api/v1/projects").await).await;
    let record = &json["data"]["records"][0];
    assert_eq!(record["name"], "Nombre no disponible");
    assert_eq!(record["coordinates"], json!([-32.976, -68.783]));
    assert_eq!(json["data"]["degraded"], 1);
}

#[tokio::test]
async fn first_load_failure_serves_sample_list_with_error() {
    let table = FakeTable::default();
    table.set_failing(true);
    let app = build_test_app(table, None).await;

    let json = body_json(get(app.app(), "/api/v1/projects").await).await;
    let data = &json["data"];
    assert_eq!(data["origin"], "fallback");
    assert_eq!(data["records"][0]["id"], "arena_maipu_default");
    assert!(data["error"]
        .as_str()
        .unwrap()
        .starts_with("Error al cargar proyectos"));
}

#[tokio::test]
async fn later_failure_keeps_last_good_list() {
    let app = build_test_app(
        FakeTable::with_rows(vec![row(1, "Lomas", -32.9, -68.8)]),
        None,
    )
    .await;
    app.table.set_failing(true);

    let response = post_json(app.app(), "/api/v1/projects/refresh", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["origin"], "remote");
    assert_eq!(data["records"][0]["name"], "Lomas");
    assert!(data["error"].is_string());
    assert_eq!(data["version"], 2);
}

#[tokio::test]
async fn refresh_picks_up_new_rows() {
    let app = build_test_app(FakeTable::default(), None).await;
    app.table.set_rows(vec![row(9, "Nuevo", -33.0, -68.9)]);

    let data = body_json(post_json(app.app(), "/api/v1/projects/refresh", json!({})).await).await;
    assert_eq!(data["data"]["records"][0]["id"], "9");
    assert_eq!(app.table.selects.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[tokio::test]
async fn home_features_newest_project() {
    let app = build_test_app(
        FakeTable::with_rows(vec![row(2, "Altos", -32.95, -68.85), row(1, "Lomas", -32.9, -68.8)]),
        None,
    )
    .await;

    let json = body_json(get(app.app(), "/api/v1/home?hero_slide=3").await).await;
    let data = &json["data"];
    assert_eq!(data["hero"]["slides"][0]["source_url"], "https://cdn.test/2-a.jpg");
    assert_eq!(data["hero"]["current"], 1);
    assert_eq!(data["hero"]["autoplay_secs"], 5);
    assert_eq!(data["cards"].as_array().unwrap().len(), 2);
    assert!(data["empty_message"].is_null());
    assert!(data["contact"]["href"]
        .as_str()
        .unwrap()
        .starts_with("https://wa.me/5492612765652?text="));
}

#[tokio::test]
async fn home_with_no_projects_shows_empty_message() {
    let app = build_test_app(FakeTable::default(), None).await;

    let data = body_json(get(app.app(), "/api/v1/home").await).await["data"].clone();
    assert_eq!(data["empty_message"], EMPTY_GRID_MESSAGE);
    assert_eq!(data["hero"]["slides"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn card_without_media_gets_default_thumbnail() {
    let mut bare = row(4, "Sin Fotos", -32.9, -68.8);
    bare.media = None;
    let app = build_test_app(FakeTable::with_rows(vec![bare]), None).await;

    let data = body_json(get(app.app(), "/api/v1/home").await).await["data"].clone();
    assert_eq!(data["cards"][0]["thumbnail"]["source_url"], DEFAULT_CARD_IMAGE);
}

#[tokio::test]
async fn detail_wraps_slide_and_links_contact() {
    let app = build_test_app(
        FakeTable::with_rows(vec![row(1, "Lomas", -32.9, -68.8)]),
        None,
    )
    .await;

    let response = get(app.app(), "/api/v1/projects/1?slide=3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["long_description"], "Detalles de Lomas");
    assert_eq!(data["carousel"]["current"], 1);
    assert_eq!(data["carousel"]["next"], 0);
    assert_eq!(data["back_label"], "Volver al Mapa");
    assert!(data["contact"]["href"].as_str().unwrap().contains("Lomas"));
}

#[tokio::test]
async fn unknown_project_is_404() {
    let app = build_test_app(FakeTable::default(), None).await;

    let response = get(app.app(), "/api/v1/projects/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
