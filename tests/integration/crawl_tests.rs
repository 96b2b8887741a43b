//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the Artifactory storage API and
//! run full crawls against it.

use ear_inventory::config::Config;
use ear_inventory::crawler::{CancelFlag, Crawler, Diagnostic, DiagnosticKind};
use ear_inventory::listing::FetchError;
use ear_inventory::output::{CsvSink, MemorySink, OutputRow, RowSink, SinkError, SinkResult};
use ear_inventory::InventoryError;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-api-key";

/// Creates a test configuration with the given depth limit
fn create_test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.client.timeout_secs = 5;
    config.client.connect_timeout_secs = 2;
    config
}

fn create_crawler(max_depth: u32) -> Crawler {
    Crawler::new(&create_test_config(max_depth), API_KEY).expect("Failed to create crawler")
}

fn leaf(uri: &str, size: i64) -> Value {
    json!({ "uri": uri, "folder": false, "size": size })
}

fn folder(uri: &str) -> Value {
    json!({ "uri": uri, "folder": true })
}

fn listing(children: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "repo": "tci-releases",
        "path": "/",
        "children": children,
    }))
}

/// Mounts a GET listing at `listing_path`
async fn mount_listing(server: &MockServer, listing_path: &str, children: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(listing_path))
        .respond_with(listing(children))
        .mount(server)
        .await;
}

fn names(sink: &MemorySink) -> Vec<&str> {
    sink.rows().iter().map(|r| r.artifact_name.as_str()).collect()
}

/// Sink that fails on every write
struct FailingSink;

impl RowSink for FailingSink {
    fn write_row(&mut self, _row: &OutputRow) -> SinkResult<()> {
        Err(SinkError::Write("disk full".to_string()))
    }
}

/// Sink that requests cancellation as soon as the first row arrives
struct CancellingSink {
    inner: MemorySink,
    cancel: CancelFlag,
}

impl RowSink for CancellingSink {
    fn write_row(&mut self, row: &OutputRow) -> SinkResult<()> {
        self.cancel.cancel();
        self.inner.write_row(row)
    }
}

#[tokio::test]
async fn test_single_leaf_is_written_to_csv() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![leaf("a.ear", 1024)]).await;
    let root = format!("{}/root/", server.uri());

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("ears.csv");
    let config = create_test_config(32);
    let mut sink = CsvSink::create(&csv_path, &config.output.header).unwrap();

    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(result.rows_written, 1);
    assert_eq!(result.folders_visited, 1);
    assert!(result.is_clean());

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Interface,Ear Name,Size".to_string(),
            format!("{},a.ear,1024", root),
        ]
    );
}

#[tokio::test]
async fn test_folder_is_descended_through_development_listing() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![folder("sub")]).await;
    mount_listing(
        &server,
        "/root/sub/Development/Dev-1/",
        vec![leaf("b.ear", 2048)],
    )
    .await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(result.rows_written, 1);
    assert_eq!(result.folders_visited, 2);
    assert_eq!(
        sink.rows(),
        &[OutputRow::new(
            format!("{}sub/Development/Dev-1/", root),
            "b.ear",
            2048
        )]
    );
}

#[tokio::test]
async fn test_failed_subfolder_keeps_sibling_rows() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "/root/",
        vec![leaf("before.ear", 1), folder("sub"), leaf("after.ear", 2)],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/root/sub/Development/Dev-1/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(names(&sink), vec!["before.ear", "after.ear"]);
    assert_eq!(result.rows_written, 2);
    assert_eq!(
        result.diagnostics,
        vec![Diagnostic::ListingFetchFailure {
            url: format!("{}sub/Development/Dev-1/", root),
            cause: FetchError::Status { status: 500 },
        }]
    );
    assert!(!result.cancelled);
}

#[tokio::test]
async fn test_rows_are_complete_and_depth_first() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "/root/",
        vec![
            leaf("a1.ear", 1),
            folder("f1"),
            leaf("a2.ear", 2),
            folder("f2"),
        ],
    )
    .await;
    mount_listing(
        &server,
        "/root/f1/Development/Dev-1/",
        vec![leaf("b1.ear", 3), folder("g"), leaf("b2.ear", 4)],
    )
    .await;
    mount_listing(
        &server,
        "/root/f1/Development/Dev-1/g/Development/Dev-1/",
        vec![leaf("c1.ear", 5)],
    )
    .await;
    mount_listing(
        &server,
        "/root/f2/Development/Dev-1/",
        vec![leaf("d1.ear", 6)],
    )
    .await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert!(result.is_clean());
    assert_eq!(result.rows_written, 6);
    assert_eq!(result.folders_visited, 4);
    assert_eq!(
        names(&sink),
        vec!["a1.ear", "b1.ear", "c1.ear", "b2.ear", "a2.ear", "d1.ear"]
    );

    let c1 = &sink.rows()[2];
    assert_eq!(
        c1.source_url,
        format!("{}f1/Development/Dev-1/g/Development/Dev-1/", root)
    );
    assert_eq!(c1.artifact_size, 5);
}

#[tokio::test]
async fn test_duplicate_folder_is_reported_as_cycle() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![folder("sub"), folder("sub")]).await;
    Mock::given(method("GET"))
        .and(path("/root/sub/Development/Dev-1/"))
        .respond_with(listing(vec![leaf("once.ear", 10)]))
        .expect(1)
        .mount(&server)
        .await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(names(&sink), vec!["once.ear"]);
    assert_eq!(result.count_of(DiagnosticKind::CycleDetected), 1);
    assert_eq!(result.diagnostics.len(), 1);
}

#[tokio::test]
async fn test_folder_resolving_back_to_visited_listing_is_a_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/Development/Dev-1/"))
        .respond_with(listing(vec![leaf("x.ear", 1), folder("/../../..")]))
        .expect(1)
        .mount(&server)
        .await;
    let root = format!("{}/a/Development/Dev-1/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(result.rows_written, 1);
    assert_eq!(result.folders_visited, 1);
    assert_eq!(result.count_of(DiagnosticKind::CycleDetected), 1);
}

#[tokio::test]
async fn test_depth_limit_abandons_deep_branch() {
    let server = MockServer::start().await;

    // Every listing contains one more folder: an endless chain
    Mock::given(method("GET"))
        .respond_with(listing(vec![folder("x")]))
        .expect(4)
        .mount(&server)
        .await;
    let root = format!("{}/chain/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(3).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(result.rows_written, 0);
    assert_eq!(result.folders_visited, 4);
    assert_eq!(result.diagnostics.len(), 1);
    match &result.diagnostics[0] {
        Diagnostic::DepthLimitExceeded { depth, .. } => assert_eq!(*depth, 4),
        other => panic!("Expected DepthLimitExceeded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_tree_leaves_only_header() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![]).await;
    let root = format!("{}/root/", server.uri());

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("ears.csv");
    let config = create_test_config(32);
    let mut sink = CsvSink::create(&csv_path, &config.output.header).unwrap();

    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(result.rows_written, 0);
    assert!(result.is_clean());
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content, "Interface,Ear Name,Size\r\n");
}

#[tokio::test]
async fn test_missing_and_negative_sizes_become_zero() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "/root/",
        vec![
            json!({ "uri": "/nosize.ear", "folder": false }),
            leaf("/negative.ear", -5),
            leaf("/ok.ear", 99),
        ],
    )
    .await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    let sizes: Vec<u64> = sink.rows().iter().map(|r| r.artifact_size).collect();
    assert_eq!(sizes, vec![0, 0, 99]);
    assert_eq!(names(&sink), vec!["nosize.ear", "negative.ear", "ok.ear"]);
    assert_eq!(result.count_of(DiagnosticKind::InvalidSize), 2);
    assert!(result.diagnostics.contains(&Diagnostic::InvalidSize {
        url: root.clone(),
        artifact: "negative.ear".to_string(),
        raw: Some("-5".to_string()),
    }));
}

#[tokio::test]
async fn test_oversized_and_text_sizes_keep_siblings() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "/root/",
        vec![
            leaf("/ok.ear", 10),
            json!({ "uri": "/big.ear", "folder": false, "size": 9223372036854775808u64 }),
            json!({ "uri": "/str.ear", "folder": false, "size": "20" }),
            json!({ "uri": "/float.ear", "folder": false, "size": 1.5 }),
        ],
    )
    .await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(result.count_of(DiagnosticKind::ListingFetchFailure), 0);
    assert_eq!(result.folders_visited, 1);
    assert_eq!(names(&sink), vec!["ok.ear", "big.ear", "str.ear", "float.ear"]);

    let sizes: Vec<u64> = sink.rows().iter().map(|r| r.artifact_size).collect();
    assert_eq!(sizes, vec![10, 9_223_372_036_854_775_808, 0, 0]);

    assert_eq!(result.count_of(DiagnosticKind::InvalidSize), 2);
    assert!(result.diagnostics.contains(&Diagnostic::InvalidSize {
        url: root.clone(),
        artifact: "str.ear".to_string(),
        raw: Some("\"20\"".to_string()),
    }));
}

#[tokio::test]
async fn test_malformed_listing_is_recoverable() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![folder("bad"), folder("good")]).await;
    Mock::given(method("GET"))
        .and(path("/root/bad/Development/Dev-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;
    mount_listing(
        &server,
        "/root/good/Development/Dev-1/",
        vec![leaf("good.ear", 7)],
    )
    .await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(names(&sink), vec!["good.ear"]);
    assert_eq!(result.failure_count(), 1);
    match &result.diagnostics[0] {
        Diagnostic::ListingFetchFailure { cause, .. } => {
            assert!(matches!(cause, FetchError::Decode { .. }))
        }
        other => panic!("Expected ListingFetchFailure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_key_header_is_sent_on_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/root/"))
        .and(header("X-JFrog-Art-Api", API_KEY))
        .respond_with(listing(vec![folder("sub")]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/root/sub/Development/Dev-1/"))
        .and(header("X-JFrog-Art-Api", API_KEY))
        .respond_with(listing(vec![leaf("a.ear", 1)]))
        .expect(1)
        .mount(&server)
        .await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert!(result.is_clean());
    assert_eq!(result.rows_written, 1);
}

#[tokio::test]
async fn test_artifactory_style_uris_keep_leading_slash() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![folder("/iface")]).await;
    mount_listing(
        &server,
        "/root//iface/Development/Dev-1/",
        vec![leaf("/iface-1.0.ear", 4096)],
    )
    .await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert!(result.is_clean());
    assert_eq!(
        sink.rows(),
        &[OutputRow::new(
            format!("{}/iface/Development/Dev-1/", root),
            "iface-1.0.ear",
            4096
        )]
    );
}

#[tokio::test]
async fn test_empty_uri_is_skipped_with_diagnostic() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![folder(""), leaf("a.ear", 1)]).await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(names(&sink), vec!["a.ear"]);
    assert_eq!(result.count_of(DiagnosticKind::InvalidEntry), 1);
    assert_eq!(result.folders_visited, 1);
}

#[tokio::test]
async fn test_cancellation_stops_before_next_fetch() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![leaf("first.ear", 1), folder("sub")]).await;
    Mock::given(method("GET"))
        .and(path("/root/sub/Development/Dev-1/"))
        .respond_with(listing(vec![leaf("never.ear", 2)]))
        .expect(0)
        .mount(&server)
        .await;
    let root = format!("{}/root/", server.uri());

    let crawler = create_crawler(32);
    let mut sink = CancellingSink {
        inner: MemorySink::new(),
        cancel: crawler.cancel_flag(),
    };

    let result = crawler.crawl(&root, &mut sink).await.expect("Crawl failed");

    assert!(result.cancelled);
    assert_eq!(result.rows_written, 1);
    assert_eq!(names(&sink.inner), vec!["first.ear"]);
}

#[tokio::test]
async fn test_cancellation_interrupts_slow_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/root/"))
        .respond_with(listing(vec![leaf("late.ear", 1)]).set_delay(Duration::from_secs(4)))
        .mount(&server)
        .await;
    let root = format!("{}/root/", server.uri());

    let crawler = create_crawler(32);
    let flag = crawler.cancel_flag();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        flag.cancel();
    });

    let started = Instant::now();
    let mut sink = MemorySink::new();
    let result = crawler.crawl(&root, &mut sink).await.expect("Crawl failed");

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(result.cancelled);
    assert_eq!(result.rows_written, 0);
    assert_eq!(result.folders_visited, 0);
    assert!(result.diagnostics.is_empty());
}

#[tokio::test]
async fn test_sink_failure_aborts_crawl() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![leaf("a.ear", 1), folder("sub")]).await;
    Mock::given(method("GET"))
        .and(path("/root/sub/Development/Dev-1/"))
        .respond_with(listing(vec![]))
        .expect(0)
        .mount(&server)
        .await;
    let root = format!("{}/root/", server.uri());

    let result = create_crawler(32).crawl(&root, &mut FailingSink).await;

    assert!(matches!(result, Err(InventoryError::Sink(_))));
}

#[tokio::test]
async fn test_missing_root_listing_is_recorded_not_fatal() {
    let server = MockServer::start().await;
    let root = format!("{}/root/", server.uri());

    let mut sink = MemorySink::new();
    let result = create_crawler(32).crawl(&root, &mut sink).await.expect("Crawl failed");

    assert_eq!(result.rows_written, 0);
    assert_eq!(result.folders_visited, 0);
    assert_eq!(
        result.diagnostics,
        vec![Diagnostic::ListingFetchFailure {
            url: root.clone(),
            cause: FetchError::Status { status: 404 },
        }]
    );
}

#[tokio::test]
async fn test_crawl_entry_point_with_custom_suffix() {
    let server = MockServer::start().await;
    mount_listing(&server, "/root/", vec![folder("svc")]).await;
    mount_listing(
        &server,
        "/root/svc/Release/Prod-1/",
        vec![leaf("svc.ear", 12)],
    )
    .await;
    let root = format!("{}/root/", server.uri());

    let mut config = create_test_config(32);
    config.crawler.folder_suffix = "/Release/Prod-1/".to_string();

    let mut sink = MemorySink::new();
    let result = ear_inventory::crawl(&config, &root, API_KEY, &mut sink)
        .await
        .expect("Crawl failed");

    assert!(result.is_clean());
    assert_eq!(names(&sink), vec!["svc.ear"]);
}
