use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;

use movie_recommender::{
    error::{AppError, AppResult},
    models::{Catalog, CatalogEntry, SimilarityMatrix, TmdbMovie},
    routes::{create_router, AppState},
    services::{providers::MetadataProvider, PosterResolver, Recommender},
    store::ModelArtifacts,
};

const PLACEHOLDER: &str = "https://via.placeholder.com/200x300?text=No+Image";

/// Canned metadata keyed by movie ID; unknown IDs fail like a 404
struct FakeProvider {
    posters: HashMap<i64, Option<String>>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl MetadataProvider for FakeProvider {
    async fn fetch_movie(&self, movie_id: i64) -> AppResult<TmdbMovie> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.posters.get(&movie_id) {
            Some(poster_path) => Ok(TmdbMovie {
                poster_path: poster_path.clone(),
            }),
            None => Err(AppError::ExternalApi(
                "TMDB API returned status 404 Not Found".to_string(),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn create_test_server() -> (TestServer, Arc<FakeProvider>) {
    let catalog = Catalog::new(vec![
        CatalogEntry::new(1, "Movie A"),
        CatalogEntry::new(2, "Movie B"),
        CatalogEntry::new(3, "Movie C"),
        CatalogEntry::new(4, "Movie D"),
        CatalogEntry::new(5, "Movie E"),
        CatalogEntry::new(6, "Movie F"),
        CatalogEntry::new(7, "Movie G"),
    ]);
    let similarity = SimilarityMatrix::new(vec![
        vec![1.0, 0.2, 0.9, 0.4, 0.4, 0.1, 0.8],
        vec![0.2, 1.0, 0.3, 0.5, 0.6, 0.7, 0.1],
        vec![0.9, 0.3, 1.0, 0.2, 0.2, 0.2, 0.3],
        vec![0.4, 0.5, 0.2, 1.0, 0.9, 0.1, 0.2],
        vec![0.4, 0.6, 0.2, 0.9, 1.0, 0.3, 0.2],
        vec![0.1, 0.7, 0.2, 0.1, 0.3, 1.0, 0.5],
        vec![0.8, 0.1, 0.3, 0.2, 0.2, 0.5, 1.0],
    ])
    .unwrap();
    let artifacts = ModelArtifacts::new(catalog, similarity).unwrap();

    let provider = Arc::new(FakeProvider {
        posters: HashMap::from([
            (2, Some("/b.jpg".to_string())),
            (3, Some("/c.jpg".to_string())),
            (4, Some("/d.jpg".to_string())),
            (5, None),
            (7, Some("/g.jpg".to_string())),
        ]),
        calls: AtomicUsize::new(0),
    });

    let posters = PosterResolver::new(
        provider.clone(),
        "https://image.tmdb.org/t/p/w500".to_string(),
        PLACEHOLDER.to_string(),
    );
    let recommender = Recommender::new(&artifacts, posters);
    let app = create_router(AppState::new(recommender));

    (TestServer::new(app).unwrap(), provider)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_titles_in_catalog_order() {
    let (server, _) = create_test_server();
    let response = server.get("/api/v1/titles").await;
    response.assert_status_ok();

    let titles: Vec<String> = response.json();
    assert_eq!(titles.len(), 7);
    assert_eq!(titles[0], "Movie A");
    assert_eq!(titles[6], "Movie G");
}

#[tokio::test]
async fn test_recommendations_for_known_title() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Movie A")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let titles: Vec<&str> = body["titles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    let posters: Vec<&str> = body["posters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();

    // Row 0: C 0.9, G 0.8, D 0.4, E 0.4 (tie keeps row order), B 0.2
    assert_eq!(
        titles,
        vec!["Movie C", "Movie G", "Movie D", "Movie E", "Movie B"]
    );
    assert_eq!(
        posters,
        vec![
            "https://image.tmdb.org/t/p/w500//c.jpg",
            "https://image.tmdb.org/t/p/w500//g.jpg",
            "https://image.tmdb.org/t/p/w500//d.jpg",
            PLACEHOLDER,
            "https://image.tmdb.org/t/p/w500//b.jpg",
        ]
    );
    assert_eq!(body["messages"].as_array().unwrap().len(), 0);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_recommendations_poster_failure_falls_back() {
    let (server, _) = create_test_server();

    // Row 1: F 0.7 (no metadata), E 0.6, D 0.5, C 0.3, A 0.2 (no metadata)
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Movie B")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["titles"][0], "Movie F");
    assert_eq!(body["posters"][0], PLACEHOLDER);
    assert_eq!(body["titles"][4], "Movie A");
    assert_eq!(body["posters"][4], PLACEHOLDER);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0]
        .as_str()
        .unwrap()
        .starts_with("Error fetching poster: "));
}

#[tokio::test]
async fn test_recommendations_unknown_title() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "movie a")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["titles"].as_array().unwrap().len(), 0);
    assert_eq!(body["posters"].as_array().unwrap().len(), 0);
    assert_eq!(body["messages"][0], "Selected movie not found in the dataset.");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_recommendations_blank_title_rejected() {
    let (server, _) = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "   ")
        .expect_failure()
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_missing_title_rejected() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .expect_failure()
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("missing"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_request_id_echoed() {
    let (server, _) = create_test_server();
    let request_id = "2f1c5a4e-8d3b-4c7a-9e6f-0a1b2c3d4e5f";

    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(request_id),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), request_id);
}
