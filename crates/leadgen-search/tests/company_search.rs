//! End-to-end tests for `CompanySearch` against a wiremock places provider
//! and in-memory store / identity fakes.

use std::sync::{Arc, Mutex};

use leadgen_core::{Company, SearchRequest};
use leadgen_places::PlacesClient;
use leadgen_search::{
    CompanySearch, CompanyStore, IdentityError, IdentityResolver, SearchError, StoreError,
    MAX_PLACES,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct HistoryRecord {
    user_id: String,
    keywords: Vec<String>,
    location: Option<String>,
    results_count: usize,
}

#[derive(Clone, Default)]
struct MemoryStore {
    companies: Arc<Mutex<Vec<(Company, Vec<String>)>>>,
    history: Arc<Mutex<Vec<HistoryRecord>>>,
    fail_companies: bool,
    fail_history: bool,
}

impl MemoryStore {
    fn failing() -> Self {
        Self {
            fail_companies: true,
            fail_history: true,
            ..Self::default()
        }
    }

    fn saved_companies(&self) -> Vec<(Company, Vec<String>)> {
        self.companies.lock().unwrap().clone()
    }

    fn saved_history(&self) -> Vec<HistoryRecord> {
        self.history.lock().unwrap().clone()
    }
}

impl CompanyStore for MemoryStore {
    async fn save_company(&self, company: &Company, keywords: &[String]) -> Result<(), StoreError> {
        if self.fail_companies {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.companies
            .lock()
            .unwrap()
            .push((company.clone(), keywords.to_vec()));
        Ok(())
    }

    async fn save_search_history(
        &self,
        user_id: &str,
        request: &SearchRequest,
        results_count: usize,
    ) -> Result<(), StoreError> {
        if self.fail_history {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.history.lock().unwrap().push(HistoryRecord {
            user_id: user_id.to_string(),
            keywords: request.keywords.clone(),
            location: request.location.clone(),
            results_count,
        });
        Ok(())
    }
}

/// Resolves exactly one token to one user.
struct StaticIdentity {
    token: &'static str,
    user_id: &'static str,
}

impl IdentityResolver for StaticIdentity {
    async fn resolve(&self, token: &str) -> Result<Option<String>, IdentityError> {
        Ok((token == self.token).then(|| self.user_id.to_string()))
    }
}

struct BrokenIdentity;

impl IdentityResolver for BrokenIdentity {
    async fn resolve(&self, _token: &str) -> Result<Option<String>, IdentityError> {
        Err(IdentityError::MissingUserId)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn identity() -> StaticIdentity {
    StaticIdentity {
        token: "good-token",
        user_id: "user-42",
    }
}

fn search_with<I: IdentityResolver>(
    server: &MockServer,
    store: MemoryStore,
    identity: I,
    concurrency: usize,
) -> CompanySearch<MemoryStore, I> {
    let places = PlacesClient::with_base_url("test-key", 5, &server.uri())
        .expect("client construction should not fail");
    CompanySearch::new(places, store, identity, concurrency)
}

fn request(keywords: &[&str], location: Option<&str>) -> SearchRequest {
    SearchRequest::new(
        keywords.iter().map(|k| (*k).to_string()).collect(),
        location.map(str::to_string),
    )
}

fn place_json(i: usize) -> serde_json::Value {
    json!({
        "name": format!("Company {i}"),
        "place_id": format!("p{i}"),
        "formatted_address": format!("{i} Main St"),
        "types": ["establishment"]
    })
}

async fn mount_text_search(server: &MockServer, results: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": results
        })))
        .mount(server)
        .await;
}

async fn mount_details(server: &MockServer, place_id: &str, result: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", place_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": result
        })))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_builds_company_with_inferred_email() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("query", "软件开发 in 北京"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "name": "未来科技",
                "place_id": "future-1",
                "formatted_address": "北京市海淀区中关村",
                "types": ["point_of_interest", "establishment"]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_details(
        &server,
        "future-1",
        json!({
            "formatted_phone_number": "010 8888 0000",
            "website": "https://future-tech.com"
        }),
    )
    .await;

    let store = MemoryStore::default();
    let search = search_with(&server, store.clone(), identity(), 1);
    let companies = search
        .search(&request(&["软件开发"], Some("北京")), None)
        .await
        .expect("search should succeed");

    assert_eq!(companies.len(), 1);
    let company = &companies[0];
    assert_eq!(company.name, "未来科技");
    assert_eq!(company.address.as_deref(), Some("北京市海淀区中关村"));
    assert_eq!(company.phone.as_deref(), Some("010 8888 0000"));
    assert_eq!(company.website.as_deref(), Some("https://future-tech.com"));
    assert_eq!(company.email.as_deref(), Some("contact@future-tech.com"));
    assert!(company.email_inferred);
    assert_eq!(
        company.description.as_deref(),
        Some("point_of_interest, establishment")
    );

    let saved = store.saved_companies();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, *company);
    assert_eq!(saved[0].1, vec!["软件开发".to_string()]);
}

#[tokio::test]
async fn address_falls_back_to_details_and_email_tracks_website() {
    let server = MockServer::start().await;

    mount_text_search(
        &server,
        vec![
            json!({"name": "No Site", "place_id": "a"}),
            json!({"name": "Has Site", "place_id": "b", "formatted_address": ""}),
        ],
    )
    .await;
    mount_details(&server, "a", json!({"formatted_address": "1 Detail Rd"})).await;
    mount_details(
        &server,
        "b",
        json!({"formatted_address": "2 Detail Rd", "website": "http://www.shop.io"}),
    )
    .await;

    let search = search_with(&server, MemoryStore::default(), identity(), 2);
    let companies = search
        .search(&request(&["shop"], None), None)
        .await
        .expect("search should succeed");

    assert_eq!(companies.len(), 2);
    assert_eq!(companies[0].address.as_deref(), Some("1 Detail Rd"));
    assert!(companies[0].website.is_none());
    assert!(companies[0].email.is_none());
    assert!(companies[0].description.is_none());

    assert_eq!(companies[1].address.as_deref(), Some("2 Detail Rd"));
    assert_eq!(companies[1].email.as_deref(), Some("contact@shop.io"));

    for company in &companies {
        assert_eq!(company.email.is_some(), company.website.is_some());
    }
}

#[tokio::test]
async fn results_are_capped_and_keep_provider_order() {
    let server = MockServer::start().await;

    mount_text_search(&server, (0..25).map(place_json).collect()).await;
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "result": {}})),
        )
        .expect(u64::try_from(MAX_PLACES).unwrap())
        .mount(&server)
        .await;

    let search = search_with(&server, MemoryStore::default(), identity(), 8);
    let companies = search
        .search(&request(&["company"], None), None)
        .await
        .expect("search should succeed");

    assert_eq!(companies.len(), MAX_PLACES);
    let names: Vec<String> = companies.into_iter().map(|c| c.name).collect();
    let expected: Vec<String> = (0..MAX_PLACES).map(|i| format!("Company {i}")).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn empty_provider_results_return_empty_list() {
    let server = MockServer::start().await;
    mount_text_search(&server, vec![]).await;

    let search = search_with(&server, MemoryStore::default(), identity(), 4);
    let companies = search
        .search(&request(&["nothing"], None), None)
        .await
        .expect("search should succeed");
    assert!(companies.is_empty());
}

// ---------------------------------------------------------------------------
// Fatal failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_keywords_fail_before_any_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let search = search_with(&server, MemoryStore::default(), identity(), 4);
    let result = search
        .search(&request(&[], Some("北京")), Some("Bearer good-token"))
        .await;

    assert!(
        matches!(result, Err(SearchError::Validation(_))),
        "expected Validation, got: {result:?}"
    );
}

#[tokio::test]
async fn missing_results_field_is_upstream_error_with_no_side_effects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    let search = search_with(&server, store.clone(), identity(), 4);
    let result = search
        .search(&request(&["bakery"], None), Some("Bearer good-token"))
        .await;

    assert!(
        matches!(result, Err(SearchError::Upstream(_))),
        "expected Upstream, got: {result:?}"
    );
    assert!(store.saved_companies().is_empty());
    assert!(store.saved_history().is_empty());
}

#[tokio::test]
async fn text_search_http_failure_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    let search = search_with(&server, store.clone(), identity(), 4);
    let result = search
        .search(&request(&["bakery"], None), Some("Bearer good-token"))
        .await;

    assert!(matches!(result, Err(SearchError::Upstream(_))));
    assert!(store.saved_history().is_empty());
}

// ---------------------------------------------------------------------------
// Per-place isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_failed_detail_lookup_skips_only_that_place() {
    let server = MockServer::start().await;

    mount_text_search(&server, (0..4).map(place_json).collect()).await;
    for i in [0, 1, 3] {
        mount_details(&server, &format!("p{i}"), json!({"website": "https://ok.example"})).await;
    }
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "p2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    let search = search_with(&server, store.clone(), identity(), 4);
    let companies = search
        .search(&request(&["company"], None), None)
        .await
        .expect("search should succeed");

    let names: Vec<&str> = companies.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Company 0", "Company 1", "Company 3"]);
    assert_eq!(store.saved_companies().len(), 3);
}

#[tokio::test]
async fn places_without_id_or_name_are_skipped() {
    let server = MockServer::start().await;

    mount_text_search(
        &server,
        vec![
            json!({"name": "No Id"}),
            json!({"place_id": "nameless"}),
            json!({"name": 7, "place_id": "bad-shape"}),
            place_json(1),
        ],
    )
    .await;
    mount_details(&server, "nameless", json!({})).await;
    mount_details(&server, "p1", json!({})).await;

    let search = search_with(&server, MemoryStore::default(), identity(), 2);
    let companies = search
        .search(&request(&["company"], None), None)
        .await
        .expect("search should succeed");

    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].name, "Company 1");
}

#[tokio::test]
async fn unreachable_store_does_not_affect_response() {
    let server = MockServer::start().await;

    mount_text_search(&server, (0..3).map(place_json).collect()).await;
    for i in 0..3 {
        mount_details(&server, &format!("p{i}"), json!({"website": format!("https://c{i}.com")}))
            .await;
    }

    let store = MemoryStore::failing();
    let search = search_with(&server, store.clone(), identity(), 3);
    let companies = search
        .search(&request(&["company"], None), Some("Bearer good-token"))
        .await
        .expect("store failures are not fatal");

    assert_eq!(companies.len(), 3);
    assert_eq!(companies[2].email.as_deref(), Some("contact@c2.com"));
    assert!(store.saved_companies().is_empty());
    assert!(store.saved_history().is_empty());
}

// ---------------------------------------------------------------------------
// Search history
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolved_identity_records_history_with_final_count() {
    let server = MockServer::start().await;

    mount_text_search(&server, (0..2).map(place_json).collect()).await;
    mount_details(&server, "p0", json!({})).await;
    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "p1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = MemoryStore::default();
    let search = search_with(&server, store.clone(), identity(), 2);
    let companies = search
        .search(
            &request(&["company"], Some("Paris")),
            Some("Bearer good-token"),
        )
        .await
        .expect("search should succeed");

    assert_eq!(companies.len(), 1);
    assert_eq!(
        store.saved_history(),
        vec![HistoryRecord {
            user_id: "user-42".to_string(),
            keywords: vec!["company".to_string()],
            location: Some("Paris".to_string()),
            results_count: 1,
        }]
    );
}

#[tokio::test]
async fn no_authorization_means_no_history() {
    let server = MockServer::start().await;
    mount_text_search(&server, vec![]).await;

    let store = MemoryStore::default();
    let search = search_with(&server, store.clone(), identity(), 1);
    search
        .search(&request(&["company"], None), None)
        .await
        .expect("search should succeed");

    assert!(store.saved_history().is_empty());
}

#[tokio::test]
async fn unknown_token_means_no_history() {
    let server = MockServer::start().await;
    mount_text_search(&server, vec![]).await;

    let store = MemoryStore::default();
    let search = search_with(&server, store.clone(), identity(), 1);
    search
        .search(&request(&["company"], None), Some("Bearer someone-else"))
        .await
        .expect("search should succeed");

    assert!(store.saved_history().is_empty());
}

#[tokio::test]
async fn identity_failure_is_tolerated() {
    let server = MockServer::start().await;
    mount_text_search(&server, vec![place_json(0)]).await;
    mount_details(&server, "p0", json!({})).await;

    let store = MemoryStore::default();
    let search = search_with(&server, store.clone(), BrokenIdentity, 1);
    let companies = search
        .search(&request(&["company"], None), Some("Bearer good-token"))
        .await
        .expect("identity failure is not fatal");

    assert_eq!(companies.len(), 1);
    assert!(store.saved_history().is_empty());
}
