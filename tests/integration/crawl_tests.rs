//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch → extract → accumulate → write cycle end-to-end.

use shelf_scraper::config::{Config, SelectorConfig};
use shelf_scraper::crawler::{run_scrape, Coordinator, Fetcher};
use shelf_scraper::output::FetchStage;
use shelf_scraper::{FetchError, FieldValue, RunPhase};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given seeds
fn create_test_config(seeds: Vec<String>, pages: u32) -> Config {
    Config {
        urls: seeds,
        pages,
        time: 0.0,
        csv_name: "unused.csv".to_string(),
        sequential_ids: false,
        user_agent: "TestBot/1.0".to_string(),
        selectors: SelectorConfig {
            homepage: "a.product-link".to_string(),
            home_product: ".item".to_string(),
            product_name: ".name".to_string(),
            review: ".review".to_string(),
            price: ".price".to_string(),
            discount_price: ".discount".to_string(),
        },
    }
}

fn listing_html(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a class="product-link" href="{}">item</a></li>"#, href))
        .collect();
    format!(
        r#"<html><body><a href="/about">About</a><ul>{}</ul></body></html>"#,
        links
    )
}

async fn mount_listing(server: &MockServer, page: &str, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("p", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(hrefs)))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, page_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open output");
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

const PRODUCTS_AB: &str = r#"<html><body>
    <div class="item"><h2 class="name">A</h2><span class="price">10</span></div>
    <div class="item"><h2 class="name">B</h2><span class="price">20</span></div>
</body></html>"#;

const PRODUCT_C: &str = r#"<html><body>
    <div class="item"><h2 class="name">C</h2></div>
</body></html>"#;

#[tokio::test]
async fn test_end_to_end_scenario() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", &["/product/1"]).await;
    mount_listing(&mock_server, "2", &["/product/2"]).await;
    mount_page(&mock_server, "/product/1", PRODUCTS_AB).await;
    mount_page(&mock_server, "/product/2", PRODUCT_C).await;

    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("data").join("products.csv");
    let config = create_test_config(vec![format!("{}/list?p=", base_url)], 2);

    let outcome = run_scrape(config, &destination)
        .await
        .expect("Scrape failed");

    let records = &outcome.records;
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].product_name, FieldValue::Text("A".to_string()));
    assert_eq!(records[0].price, FieldValue::Text("10".to_string()));
    assert_eq!(records[1].product_name, FieldValue::Text("B".to_string()));
    assert_eq!(records[1].price, FieldValue::Text("20".to_string()));
    assert_eq!(records[2].product_name, FieldValue::Text("C".to_string()));
    assert_eq!(records[2].price, FieldValue::Missing);

    // One stamp and one column set for the whole seed
    for record in records {
        assert_eq!(record.date, records[0].date);
        assert_eq!(record.headers(), records[0].headers());
    }

    assert_eq!(outcome.report.listing_pages_fetched, 2);
    assert_eq!(outcome.report.product_pages_fetched, 2);
    assert_eq!(outcome.report.records_written, 3);
    assert!(outcome.report.failures.is_empty());

    let rows = read_rows(&destination);
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[0],
        vec!["product_name", "review", "price", "discount_price", "date"]
    );
    assert_eq!(rows[3][0], "C");
    assert_eq!(rows[3][2], "");
}

#[tokio::test]
async fn test_listing_failure_does_not_abort_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", &["/product/1"]).await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("p", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_listing(&mock_server, "3", &["/product/3"]).await;
    mount_page(&mock_server, "/product/1", PRODUCTS_AB).await;
    mount_page(&mock_server, "/product/3", PRODUCT_C).await;

    let config = create_test_config(vec![format!("{}/list?p=", base_url)], 3);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let outcome = coordinator.run().await;

    let names: Vec<&str> = outcome
        .records
        .iter()
        .filter_map(|r| r.product_name.as_text())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);

    assert_eq!(outcome.report.listing_pages_fetched, 2);
    assert_eq!(outcome.report.listing_pages_failed, 1);
    let failure = outcome
        .report
        .failures_for(FetchStage::Listing)
        .next()
        .expect("Listing failure should be recorded");
    assert!(failure.url.ends_with("/list?p=2"));
    assert!(failure.message.contains("500"));

    assert_eq!(coordinator.phase(), RunPhase::Done);
}

#[tokio::test]
async fn test_product_failure_skips_only_that_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", &["/product/gone", "/product/1"]).await;
    mount_status(&mock_server, "/product/gone", 404).await;
    mount_page(&mock_server, "/product/1", PRODUCTS_AB).await;

    let config = create_test_config(vec![format!("{}/list?p=", base_url)], 1);
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await;

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.report.links_found, 2);
    assert_eq!(outcome.report.product_pages_failed, 1);
    assert_eq!(outcome.report.product_pages_fetched, 1);
    assert!(outcome.report.failures[0].url.ends_with("/product/gone"));
}

#[tokio::test]
async fn test_absolute_and_unresolvable_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let absolute = format!("{}/product/abs", base_url);

    mount_listing(&mock_server, "1", &["", "javascript:void(0)", absolute.as_str()]).await;
    mount_page(&mock_server, "/product/abs", PRODUCT_C).await;

    let config = create_test_config(vec![format!("{}/list?p=", base_url)], 1);
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.report.links_found, 3);
    assert_eq!(outcome.report.product_pages_failed, 2);
}

#[tokio::test]
async fn test_listing_without_products_is_not_an_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", &[]).await;

    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("products.csv");
    let config = create_test_config(vec![format!("{}/list?p=", base_url)], 1);

    let outcome = run_scrape(config, &destination).await.unwrap();

    assert!(outcome.records.is_empty());
    assert!(outcome.report.failures.is_empty());
    assert_eq!(outcome.report.records_written, 0);
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_each_product_page_fetched_once_with_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/list"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["/product/1"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/1"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCTS_AB))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/list?p=", base_url)], 1);
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await;

    assert_eq!(outcome.records.len(), 2);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_stamp_shared_within_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", &["/product/1"]).await;
    mount_listing(&mock_server, "2", &["/product/2"]).await;
    mount_page(&mock_server, "/product/1", PRODUCTS_AB).await;
    mount_page(&mock_server, "/product/2", PRODUCT_C).await;

    let seed = format!("{}/list?p=", base_url);
    let config = create_test_config(vec![seed.clone(), seed], 2);
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await;

    assert_eq!(outcome.records.len(), 6);
    let (first_seed, second_seed) = outcome.records.split_at(3);
    assert!(first_seed.iter().all(|r| r.date == first_seed[0].date));
    assert!(second_seed.iter().all(|r| r.date == second_seed[0].date));
}

#[tokio::test]
async fn test_pause_between_seed_urls() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", &[]).await;

    let seed = format!("{}/list?p=", base_url);
    let mut config = create_test_config(vec![seed.clone(), seed], 1);
    config.time = 0.2;

    let started = std::time::Instant::now();
    let mut coordinator = Coordinator::new(config).unwrap();
    coordinator.run().await;

    assert!(started.elapsed() >= std::time::Duration::from_millis(200));
}

#[tokio::test]
async fn test_no_pause_after_last_seed_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", &[]).await;

    let mut config = create_test_config(vec![format!("{}/list?p=", base_url)], 1);
    config.time = 30.0;

    let started = std::time::Instant::now();
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await;

    assert!(started.elapsed() < std::time::Duration::from_secs(10));
    assert_eq!(outcome.report.listing_pages_fetched, 1);
    assert_eq!(coordinator.phase(), RunPhase::Done);
}

#[tokio::test]
async fn test_zero_time_skips_pause() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", &[]).await;

    let seed = format!("{}/list?p=", base_url);
    let config = create_test_config(vec![seed.clone(), seed.clone(), seed], 1);
    assert_eq!(config.time, 0.0);

    let started = std::time::Instant::now();
    let mut coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await;

    assert!(started.elapsed() < std::time::Duration::from_secs(10));
    assert_eq!(outcome.report.listing_pages_fetched, 3);
}

#[tokio::test]
async fn test_sequential_ids_and_repeated_runs_append() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", &["/product/1"]).await;
    mount_page(&mock_server, "/product/1", PRODUCTS_AB).await;

    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("products.csv");
    let mut config = create_test_config(vec![format!("{}/list?p=", base_url)], 1);
    config.sequential_ids = true;

    run_scrape(config.clone(), &destination).await.unwrap();
    run_scrape(config, &destination).await.unwrap();

    let rows = read_rows(&destination);
    assert_eq!(rows.len(), 1 + 2 + 2);
    assert_eq!(rows[0][0], "id");
    let ids: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "1", "2"]);
}

#[tokio::test]
async fn test_fetcher_reports_http_status() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/unavailable", 503).await;

    let fetcher = Fetcher::new("TestBot/1.0").unwrap();
    let result = fetcher
        .fetch(&format!("{}/unavailable", mock_server.uri()), None)
        .await;

    match result {
        Err(FetchError::Status { status, url }) => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/unavailable"));
        }
        other => panic!("expected status error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_fetcher_appends_page_index() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("page", "7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><h1 class="title">Page seven</h1></body></html>"#),
        )
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new("TestBot/1.0").unwrap();
    let document = fetcher
        .fetch(&format!("{}/list?page=", mock_server.uri()), Some(7))
        .await
        .expect("Fetch failed");

    let selector = scraper::Selector::parse("h1.title").unwrap();
    assert_eq!(
        shelf_scraper::crawler::extract_document_text(&document, &selector),
        FieldValue::Text("Page seven".to_string())
    );
}

#[tokio::test]
async fn test_fetcher_reports_transport_failure() {
    let fetcher = Fetcher::new("TestBot/1.0").unwrap();
    // Nothing listens on port 1
    let result = fetcher.fetch("http://127.0.0.1:1/", None).await;
    assert!(matches!(result, Err(FetchError::Transport { .. })));
}
