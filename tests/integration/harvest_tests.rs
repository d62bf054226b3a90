//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve a small listing site and run the full
//! pipeline into a temporary directory.

use md_harvest::config::{CollisionPolicy, Config};
use md_harvest::content::MarkdownConverter;
use md_harvest::crawler::{harvest, Coordinator};
use md_harvest::images::FormatSniffer;
use md_harvest::HarvestError;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Passes the selected HTML through so tests can assert exact file content
struct Verbatim;

impl MarkdownConverter for Verbatim {
    fn convert(&self, html: &str) -> String {
        html.trim().to_string()
    }
}

fn test_config(save_path: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.request_timeout_secs = 5;
    config.images.min_delay_ms = 0;
    config.images.max_delay_ms = 0;
    config.output.save_path = save_path.to_path_buf();
    config
}

fn listing_page(nodes: &[&str], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><div class=\"view\">");
    for node in nodes {
        html.push_str(&format!(
            r#"<div class="node-teaser"><h2><a href="{}">teaser</a></h2><p>Intro</p></div>"#,
            node
        ));
    }
    html.push_str("</div>");
    if let Some(next) = next {
        html.push_str(&format!(
            r#"<ul class="pager"><li class="pager-current">1</li><li class="pager-next"><a href="{}">next ›</a></li></ul>"#,
            next
        ));
    }
    html.push_str("</body></html>");
    html
}

fn node_page(title: &str, body: &str) -> String {
    format!("<html><head><title>{title}</title></head><body><h1>{title}</h1>{body}</body></html>")
}

async fn mount_html(server: &MockServer, at: &str, body: String, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).expect("file should exist")
}

#[tokio::test]
async fn test_single_listing_two_nodes() {
    let server = MockServer::start().await;
    mount_html(&server, "/list", listing_page(&["/node/1", "/node/2"], None), 0).await;
    mount_html(&server, "/node/1", node_page("Hello, World!", "<p>First body</p>"), 0).await;
    mount_html(&server, "/node/2", node_page("Second node", "<p>Second body</p>"), 0).await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::with_capabilities(
        test_config(dir.path()),
        Arc::new(Verbatim),
        Arc::new(FormatSniffer),
    )
    .unwrap();

    let report = coordinator
        .run(&format!("{}/list", server.uri()), &CancellationToken::new())
        .await
        .expect("harvest should succeed");

    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.nodes_found, 2);
    assert!(report.failures.is_empty());
    assert_eq!(report.images_saved, 0);

    assert_eq!(
        read(dir.path().join("summary.md")),
        "* [Hello, World!](hello-world/index.md)\n* [Second node](second-node/index.md)\n"
    );
    assert_eq!(
        read(dir.path().join("hello-world/index.md")),
        "<h1>Hello, World!</h1><p>First body</p>"
    );
    assert_eq!(
        read(dir.path().join("second-node/index.md")),
        "<h1>Second node</h1><p>Second body</p>"
    );
}

#[tokio::test]
async fn test_node_image_is_archived_and_rewritten() {
    let server = MockServer::start().await;
    let uri = server.uri();
    mount_html(&server, "/list", listing_page(&["/node/1"], None), 0).await;
    mount_html(
        &server,
        "/node/1",
        node_page("Pictures", &format!(r#"<p>Look:</p><p><img src="{uri}/a.png"></p>"#)),
        0,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG.to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let report = harvest(
        test_config(dir.path()),
        &format!("{uri}/list"),
        &CancellationToken::new(),
    )
    .await
    .expect("harvest should succeed");

    assert_eq!(report.images_saved, 1);
    assert_eq!(std::fs::read(dir.path().join("pictures/1.png")).unwrap(), PNG);

    let markdown = read(dir.path().join("pictures/index.md"));
    assert!(markdown.contains("](1.png)"), "got: {}", markdown);
    assert!(!markdown.contains(&format!("{uri}/a.png")));
}

#[tokio::test]
async fn test_images_named_by_position_not_arrival() {
    let server = MockServer::start().await;
    let uri = server.uri();
    mount_html(&server, "/list", listing_page(&["/node/1"], None), 0).await;
    mount_html(
        &server,
        "/node/1",
        node_page(
            "Gallery",
            &format!(r#"<p><img src="{uri}/first.png" alt="one"></p><p><img src="{uri}/second.gif"></p>"#),
        ),
        0,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/first.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(PNG.to_vec())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/second.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"GIF89a\x01\0\x01\0".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    harvest(
        test_config(dir.path()),
        &format!("{uri}/list"),
        &CancellationToken::new(),
    )
    .await
    .expect("harvest should succeed");

    let folder = dir.path().join("gallery");
    assert!(folder.join("1.png").exists());
    assert!(folder.join("2.gif").exists());

    let markdown = read(folder.join("index.md"));
    let first = markdown.find("1.png").expect("1.png referenced");
    let second = markdown.find("2.gif").expect("2.gif referenced");
    assert!(first < second);
    assert!(!markdown.contains(&uri));
}

#[tokio::test]
async fn test_pagination_and_discovery_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_page(&["/node/c"], None)),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    // Without a page parameter: the first listing page
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &["/node/a", "/node/b"],
            Some("/list?page=1"),
        )))
        .mount(&server)
        .await;

    // The first node is the slowest to load
    mount_html(&server, "/node/a", node_page("Alpha", "<p>a</p>"), 300).await;
    mount_html(&server, "/node/b", node_page("Beta", "<p>b</p>"), 100).await;
    mount_html(&server, "/node/c", node_page("Gamma", "<p>c</p>"), 0).await;

    let dir = TempDir::new().unwrap();
    let report = harvest(
        test_config(dir.path()),
        &format!("{}/list", server.uri()),
        &CancellationToken::new(),
    )
    .await
    .expect("harvest should succeed");

    assert_eq!(report.pages_visited, 2);
    assert_eq!(
        read(dir.path().join("summary.md")),
        "* [Alpha](alpha/index.md)\n* [Beta](beta/index.md)\n* [Gamma](gamma/index.md)\n"
    );
}

#[tokio::test]
async fn test_failed_nodes_do_not_stop_siblings() {
    let server = MockServer::start().await;
    let uri = server.uri();
    mount_html(
        &server,
        "/list",
        listing_page(&["/node/ok", "/node/missing", "/node/untitled", "/node/badimg"], None),
        0,
    )
    .await;
    mount_html(&server, "/node/ok", node_page("Fine", "<p>ok</p>"), 0).await;
    Mock::given(method("GET"))
        .and(path("/node/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_html(&server, "/node/untitled", "<html><body><p>no heading</p></body></html>".to_string(), 0).await;
    mount_html(
        &server,
        "/node/badimg",
        node_page("Broken image", &format!(r#"<img src="{uri}/nope.png">"#)),
        0,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/nope.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(test_config(dir.path())).unwrap();
    let report = coordinator
        .run(&format!("{uri}/list"), &CancellationToken::new())
        .await
        .expect("listing succeeded, so the run reports");

    assert_eq!(report.nodes_found, 4);
    assert_eq!(report.saved.len(), 1);
    assert_eq!(report.failures.len(), 3);
    assert_eq!(report.failures[0].url, format!("{uri}/node/missing"));
    assert_eq!(report.failures[1].url, format!("{uri}/node/untitled"));
    assert_eq!(report.failures[2].url, format!("{uri}/node/badimg"));

    assert_eq!(read(dir.path().join("summary.md")), "* [Fine](fine/index.md)\n");
    assert!(!dir.path().join("broken-image").exists());

    assert!(matches!(
        report.into_result(),
        Err(HarvestError::Aggregate { failed: 3, total: 4 })
    ));
}

#[tokio::test]
async fn test_failed_node_leaves_existing_folder_alone() {
    let server = MockServer::start().await;
    let uri = server.uri();
    mount_html(&server, "/list", listing_page(&["/node/1"], None), 0).await;
    mount_html(
        &server,
        "/node/1",
        node_page(
            "Broken image",
            &format!(r#"<img src="{uri}/ok.png"><img src="{uri}/nope.png">"#),
        ),
        0,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/ok.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG.to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nope.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("broken-image");
    std::fs::create_dir(&folder).unwrap();
    std::fs::write(folder.join("notes.txt"), "kept").unwrap();

    let report = Coordinator::new(test_config(dir.path()))
        .unwrap()
        .run(&format!("{uri}/list"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(read(folder.join("notes.txt")), "kept");
    assert!(!folder.join("index.md").exists());
}

#[tokio::test]
async fn test_harvest_reports_aggregate_error() {
    let server = MockServer::start().await;
    mount_html(&server, "/list", listing_page(&["/node/1", "/node/2"], None), 0).await;
    mount_html(&server, "/node/1", node_page("One", "<p>1</p>"), 0).await;
    Mock::given(method("GET"))
        .and(path("/node/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let result = harvest(
        test_config(dir.path()),
        &format!("{}/list", server.uri()),
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(HarvestError::Aggregate { failed: 1, total: 2 })
    ));
    // The summary is still written for the nodes that succeeded
    assert_eq!(read(dir.path().join("summary.md")), "* [One](one/index.md)\n");
}

#[tokio::test]
async fn test_title_collision_gets_suffix() {
    let server = MockServer::start().await;
    mount_html(&server, "/list", listing_page(&["/node/1", "/node/2"], None), 0).await;
    mount_html(&server, "/node/1", node_page("Same title", "<p>first</p>"), 0).await;
    mount_html(&server, "/node/2", node_page("Same Title!", "<p>second</p>"), 0).await;

    let dir = TempDir::new().unwrap();
    let report = harvest(
        test_config(dir.path()),
        &format!("{}/list", server.uri()),
        &CancellationToken::new(),
    )
    .await
    .expect("harvest should succeed");

    assert_eq!(report.saved[0].folder_name, "same-title");
    let second = &report.saved[1].folder_name;
    assert!(second.starts_with("same-title-"));
    assert_ne!(second, "same-title");

    assert!(read(dir.path().join("same-title/index.md")).contains("first"));
    assert!(read(dir.path().join(second).join("index.md")).contains("second"));
}

#[tokio::test]
async fn test_title_collision_can_fail() {
    let server = MockServer::start().await;
    mount_html(&server, "/list", listing_page(&["/node/1", "/node/2"], None), 0).await;
    mount_html(&server, "/node/1", node_page("Same", "<p>first</p>"), 0).await;
    mount_html(&server, "/node/2", node_page("Same", "<p>second</p>"), 0).await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.output.on_collision = CollisionPolicy::Fail;

    let report = Coordinator::new(config)
        .unwrap()
        .run(&format!("{}/list", server.uri()), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.saved.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(read(dir.path().join("same/index.md")).contains("first"));
}

#[tokio::test]
async fn test_listing_failure_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let result = harvest(
        test_config(dir.path()),
        &format!("{}/list", server.uri()),
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(HarvestError::HttpStatus { status: 503, .. })
    ));
    assert!(!dir.path().join("summary.md").exists());
}

#[tokio::test]
async fn test_empty_listing_writes_empty_summary() {
    let server = MockServer::start().await;
    mount_html(&server, "/list", listing_page(&[], None), 0).await;

    let dir = TempDir::new().unwrap();
    let report = harvest(
        test_config(dir.path()),
        &format!("{}/list", server.uri()),
        &CancellationToken::new(),
    )
    .await
    .expect("an empty listing is not an error");

    assert_eq!(report.nodes_found, 0);
    assert_eq!(read(dir.path().join("summary.md")), "");
}

#[tokio::test]
async fn test_cancelled_run() {
    let server = MockServer::start().await;
    mount_html(&server, "/list", listing_page(&["/node/1"], None), 0).await;

    let dir = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = harvest(
        test_config(dir.path()),
        &format!("{}/list", server.uri()),
        &cancel,
    )
    .await;
    assert!(matches!(result, Err(HarvestError::Cancelled)));
}
