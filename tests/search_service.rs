//! End-to-end tests: CSV dataset and index file on disk, stub embedder,
//! disabled re-ranker, requests through the real router.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use foodie::embedding::{MiniLmConfig, MiniLmEmbedder};
use foodie::gateway::{AppState, create_router};
use foodie::index::VectorIndex;
use foodie::llm::MistralReranker;
use foodie::search::RankingPipeline;

const HEADER: &str = "Name,BORO,Buildings,Street,Zipcode,Type,Rating,Review,Review_clean,link";

/// (name, zipcode cell, cuisine, review)
const ROWS: &[(&str, &str, &str, &str)] = &[
    ("Ramen Ya", "10003.0", "Japanese", "rich spicy tonkotsu broth"),
    ("Udon House", "10009", "Japanese", "chewy handmade udon"),
    ("Dim Sum Palace", "10013", "Chinese", "soup dumplings and har gow"),
    ("Taco Sol", "10011.0", "Mexican", "al pastor with pineapple"),
    ("Bagel Corner", "", "Cafe", "classic lox and schmear"),
];

fn build_service() -> (axum::Router, TempDir) {
    let dir = TempDir::new().unwrap();

    let csv_path = dir.path().join("restaurants.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for (name, zipcode, cuisine, review) in ROWS {
        writeln!(
            file,
            "{name},MANHATTAN,1,Main St,{zipcode},{cuisine},4.5,{review},{review},"
        )
        .unwrap();
    }
    drop(file);

    let restaurants = foodie::load_restaurants(&csv_path).expect("load dataset");
    assert_eq!(restaurants.len(), ROWS.len());

    // The corpus embeddings come from the same stub model the queries will
    // use, keyed on the review text.
    let embedder = MiniLmEmbedder::load(MiniLmConfig::stub()).unwrap();
    let vectors: Vec<Vec<f32>> = restaurants
        .iter()
        .map(|r| embedder.embed(r.review_clean.as_deref().unwrap_or("")).unwrap())
        .collect();

    let index_path = dir.path().join("reviews.idx");
    VectorIndex::write(&index_path, embedder.embedding_dim(), &vectors).unwrap();
    let index = VectorIndex::open(&index_path).unwrap();

    let pipeline = RankingPipeline::new(
        Arc::new(restaurants),
        Arc::new(index),
        Arc::new(embedder),
        Arc::new(MistralReranker::disabled()),
    );

    (create_router(AppState::new(Arc::new(pipeline))), dir)
}

async fn search(router: axum::Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/search-restaurants")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn full_search_round_trip() {
    let (router, _dir) = build_service();

    let (status, body) = search(
        router,
        serde_json::json!({"query": "rich spicy tonkotsu broth", "top_k": 5}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_matches"], 5);

    let restaurants = body["restaurants"].as_array().unwrap();
    assert_eq!(restaurants[0]["name"], "Ramen Ya");
    assert_eq!(restaurants[0]["zipcode"], 10003);
    assert_eq!(restaurants[0]["neighborhood"], "lower-east-side");
    assert_eq!(restaurants[0]["llm_rank"], 1);

    let mut previous = f64::INFINITY;
    for r in restaurants {
        let score = r["match_score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&score));
        assert!(score <= previous);
        previous = score;
    }
}

#[tokio::test]
async fn neighborhood_scoped_search_only_returns_that_neighborhood() {
    let (router, _dir) = build_service();

    let (status, body) = search(
        router,
        serde_json::json!({
            "query": "noodles",
            "neighborhood": "east-village",
            "top_k": 5
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let restaurants = body["restaurants"].as_array().unwrap();
    // Ramen Ya (10003) and Udon House (10009) only.
    assert_eq!(restaurants.len(), 2);
    for r in restaurants {
        let zipcode = r["zipcode"].as_u64().unwrap();
        assert!(zipcode == 10003 || zipcode == 10009, "leaked zipcode {zipcode}");
    }
}

#[tokio::test]
async fn same_request_twice_yields_identical_candidates() {
    let (router, _dir) = build_service();

    let request = serde_json::json!({"query": "soup dumplings", "top_k": 4});
    let (_, first) = search(router.clone(), request.clone()).await;
    let (_, second) = search(router, request).await;

    assert_eq!(first["restaurants"], second["restaurants"]);
    assert_eq!(first["total_matches"], second["total_matches"]);
}

#[tokio::test]
async fn restaurant_without_zipcode_is_searchable_but_unlabeled() {
    let (router, _dir) = build_service();

    let (_, body) = search(
        router,
        serde_json::json!({"query": "classic lox and schmear", "top_k": 1}),
    )
    .await;

    let top = &body["restaurants"][0];
    assert_eq!(top["name"], "Bagel Corner");
    assert_eq!(top["zipcode"], serde_json::Value::Null);
    assert_eq!(top["neighborhood"], serde_json::Value::Null);
}

#[tokio::test]
async fn degraded_service_returns_empty_results_not_errors() {
    // No dataset, no index: the service still answers.
    let embedder = MiniLmEmbedder::load(MiniLmConfig::stub()).unwrap();
    let pipeline = RankingPipeline::new(
        Arc::new(Vec::new()),
        Arc::new(VectorIndex::unavailable()),
        Arc::new(embedder),
        Arc::new(MistralReranker::disabled()),
    );
    let router = create_router(AppState::new(Arc::new(pipeline)));

    let (status, body) = search(router, serde_json::json!({"query": "anything"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_matches"], 0);
}
