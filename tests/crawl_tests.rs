//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up a mock archive and run the full
//! traversal end-to-end against it.

use gleaner::config::{ArchiveConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use gleaner::crawler::run_crawl;
use gleaner::GleanError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a test configuration pointed at the mock server
///
/// Cooldown base is zero so retry sequences complete instantly.
fn test_config(base_url: &str, caps: Vec<u32>, corpus_path: &str) -> Config {
    Config {
        archive: ArchiveConfig {
            base_url: base_url.to_string(),
            root_path: "/year/stat/19".to_string(),
            year_prefix: "19".to_string(),
            subjects: ["AP", "CO", "ME", "ML", "OT", "ST"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        crawler: CrawlerConfig {
            monthly_caps: caps,
            cooldown_base_secs: 0,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            corpus_path: corpus_path.to_string(),
        },
    }
}

fn corpus_path(dir: &TempDir) -> String {
    dir.path().join("corpus.txt").display().to_string()
}

fn root_page(months: &[&str]) -> String {
    let anchors: String = months
        .iter()
        .map(|m| format!(r#"<a href="/list/stat/{m}">{m}</a>"#))
        .collect();
    format!("<html><body>{anchors}</body></html>")
}

fn month_page(month: &str) -> String {
    format!(
        r#"<html><body>
        <a href="/list/stat/{month}">new</a>
        <a href="/list/stat/{month}/all">all</a>
        </body></html>"#
    )
}

fn listing_page(ids: &[&str]) -> String {
    let entries: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<dt><a href="/ps/{id}">other</a><a href="/abs/{id}">arXiv:{id}</a></dt>"#
            )
        })
        .collect();
    format!("<html><body><dl>{entries}</dl></body></html>")
}

fn document_page(id: &str, category: &str, abstract_text: &str) -> String {
    format!(
        r#"<html><body>
        <table><tr><td>arXiv:{id} [stat.{category}]</td></tr></table>
        <blockquote>{abstract_text}</blockquote>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, p: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_happy_path_with_cap_and_invalid_category() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let corpus = corpus_path(&dir);

    mount_page(&server, "/year/stat/19", root_page(&["1910", "1911"])).await;

    // Month 1910: three documents under a cap of 3 (admits two)
    mount_page(&server, "/list/stat/1910", month_page("1910")).await;
    mount_page(
        &server,
        "/list/stat/1910/all",
        listing_page(&["1910.00001", "1910.00002", "1910.00003"]),
    )
    .await;
    mount_page(
        &server,
        "/abs/1910.00001",
        document_page("1910.00001", "ML", "Abstract: We propose a deep model."),
    )
    .await;
    mount_page(
        &server,
        "/abs/1910.00002",
        document_page("1910.00002", "XX", "Abstract: Not a valid subject."),
    )
    .await;
    // The cap stops iteration before the third document is ever fetched
    Mock::given(method("GET"))
        .and(path("/abs/1910.00003"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // Month 1911: one document under a cap of 2 (admits one)
    mount_page(&server, "/list/stat/1911", month_page("1911")).await;
    mount_page(&server, "/list/stat/1911/all", listing_page(&["1911.00011"])).await;
    mount_page(
        &server,
        "/abs/1911.00011",
        document_page(
            "1911.00011",
            "CO",
            "Abstract: Sparse estimators converge quickly.",
        ),
    )
    .await;

    let stats = run_crawl(test_config(&server.uri(), vec![3, 2], &corpus))
        .await
        .unwrap();

    assert_eq!(stats.months_visited, 2);
    assert_eq!(stats.documents_written, 2);
    assert_eq!(stats.documents_discarded, 1);
    assert_eq!(stats.fetch_failures, 0);

    let content = std::fs::read_to_string(&corpus).unwrap();
    let rows: Vec<&str> = content.lines().collect();
    assert_eq!(
        rows,
        vec![
            "ML,propose,deep,model",
            "CO,sparse,estimators,converge,quickly",
        ]
    );
}

#[tokio::test]
async fn test_root_failure_aborts_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let corpus = corpus_path(&dir);

    // Root attempt and its single retry both fail
    Mock::given(method("GET"))
        .and(path("/year/stat/19"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let result = run_crawl(test_config(&server.uri(), vec![3], &corpus)).await;

    assert!(matches!(result, Err(GleanError::RootUnreachable { .. })));
    assert!(!std::path::Path::new(&corpus).exists());
}

#[tokio::test]
async fn test_root_structural_failure_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let corpus = corpus_path(&dir);

    Mock::given(method("GET"))
        .and(path("/year/stat/19"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_crawl(test_config(&server.uri(), vec![3], &corpus)).await;

    assert!(matches!(result, Err(GleanError::RootMalformed { .. })));
}

#[tokio::test]
async fn test_month_retry_exhaustion_terminates_traversal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let corpus = corpus_path(&dir);

    mount_page(&server, "/year/stat/19", root_page(&["1910", "1911"])).await;

    // First month never comes up
    Mock::given(method("GET"))
        .and(path("/list/stat/1910"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    // Fail-fast: the second month must never be attempted
    Mock::given(method("GET"))
        .and(path("/list/stat/1911"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let stats = run_crawl(test_config(&server.uri(), vec![3, 3], &corpus))
        .await
        .unwrap();

    assert_eq!(stats.months_visited, 0);
    assert_eq!(stats.documents_written, 0);
    assert_eq!(stats.fetch_failures, 1);
    assert!(!std::path::Path::new(&corpus).exists());
}

#[tokio::test]
async fn test_structural_month_failure_skips_to_next_month() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let corpus = corpus_path(&dir);

    mount_page(&server, "/year/stat/19", root_page(&["1910", "1911"])).await;

    // First month page is gone; traversal continues with its sibling
    Mock::given(method("GET"))
        .and(path("/list/stat/1910"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    mount_page(&server, "/list/stat/1911", month_page("1911")).await;
    mount_page(&server, "/list/stat/1911/all", listing_page(&["1911.00011"])).await;
    mount_page(
        &server,
        "/abs/1911.00011",
        document_page("1911.00011", "ST", "Abstract: A consistent estimator."),
    )
    .await;

    let stats = run_crawl(test_config(&server.uri(), vec![3, 3], &corpus))
        .await
        .unwrap();

    assert_eq!(stats.months_visited, 1);
    assert_eq!(stats.documents_written, 1);
    assert_eq!(stats.fetch_failures, 0);

    let content = std::fs::read_to_string(&corpus).unwrap();
    assert_eq!(content, "ST,consistent,estimator\n");
}

#[tokio::test]
async fn test_missing_all_link_skips_month() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let corpus = corpus_path(&dir);

    mount_page(&server, "/year/stat/19", root_page(&["1910"])).await;
    mount_page(
        &server,
        "/list/stat/1910",
        r#"<html><body><a href="/elsewhere">recent</a></body></html>"#.to_string(),
    )
    .await;

    let stats = run_crawl(test_config(&server.uri(), vec![3], &corpus))
        .await
        .unwrap();

    assert_eq!(stats.months_visited, 0);
    assert_eq!(stats.documents_written, 0);
}

#[tokio::test]
async fn test_document_retry_exhaustion_abandons_month_only() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let corpus = corpus_path(&dir);

    mount_page(&server, "/year/stat/19", root_page(&["1910", "1911"])).await;

    mount_page(&server, "/list/stat/1910", month_page("1910")).await;
    mount_page(
        &server,
        "/list/stat/1910/all",
        listing_page(&["1910.00001", "1910.00002"]),
    )
    .await;
    // First document stays down; the rest of this month is abandoned
    Mock::given(method("GET"))
        .and(path("/abs/1910.00001"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/abs/1910.00002"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // But the next month is still traversed
    mount_page(&server, "/list/stat/1911", month_page("1911")).await;
    mount_page(&server, "/list/stat/1911/all", listing_page(&["1911.00011"])).await;
    mount_page(
        &server,
        "/abs/1911.00011",
        document_page("1911.00011", "AP", "Abstract: Signal processing results."),
    )
    .await;

    let stats = run_crawl(test_config(&server.uri(), vec![5, 5], &corpus))
        .await
        .unwrap();

    assert_eq!(stats.months_visited, 2);
    assert_eq!(stats.documents_written, 1);
    assert_eq!(stats.fetch_failures, 1);

    let content = std::fs::read_to_string(&corpus).unwrap();
    assert_eq!(content, "AP,signal,processing,results\n");
}

#[tokio::test]
async fn test_transient_document_failure_recovers_on_retry() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let corpus = corpus_path(&dir);

    mount_page(&server, "/year/stat/19", root_page(&["1910"])).await;
    mount_page(&server, "/list/stat/1910", month_page("1910")).await;
    mount_page(&server, "/list/stat/1910/all", listing_page(&["1910.00001"])).await;

    Mock::given(method("GET"))
        .and(path("/abs/1910.00001"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/abs/1910.00001",
        document_page("1910.00001", "ME", "Abstract: Robust methodology applied."),
    )
    .await;

    let stats = run_crawl(test_config(&server.uri(), vec![5], &corpus))
        .await
        .unwrap();

    assert_eq!(stats.documents_written, 1);
    assert_eq!(stats.fetch_failures, 1);

    let content = std::fs::read_to_string(&corpus).unwrap();
    assert_eq!(content, "ME,robust,methodology,applied\n");
}

#[tokio::test]
async fn test_cap_list_shorter_than_months_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let corpus = corpus_path(&dir);

    mount_page(&server, "/year/stat/19", root_page(&["1910", "1911"])).await;

    let result = run_crawl(test_config(&server.uri(), vec![5], &corpus)).await;

    assert!(matches!(
        result,
        Err(GleanError::CapListTooShort { caps: 1, months: 2 })
    ));
    assert!(!std::path::Path::new(&corpus).exists());
}
