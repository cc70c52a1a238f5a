//! Integration tests for the crawler
//!
//! These tests use wiremock to create a mock Reddit API and run the full
//! thread crawl end-to-end: authenticate, discover commenters, crawl their
//! histories, and export the graph.

use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use threadweb::config::{
    Config, CrawlerConfig, FilterConfig, OutputConfig, RedditConfig, TextConfig, UserAgentConfig,
};
use threadweb::crawler::crawl_thread;
use threadweb::output::write_outputs;
use threadweb::{ThreadwebError, UnitState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, output_dir: &TempDir) -> Config {
    Config {
        crawler: CrawlerConfig {
            concurrency: 4,
            window_size: 3,
            max_rate_limit_retries: 2,
            rate_limit_backoff_ms: 10, // Very short for testing
            crawl_timeout_secs: 10,
            max_tokens_per_identity: None,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        reddit: RedditConfig {
            api_base_url: server.uri(),
            token_url: format!("{}/api/v1/access_token", server.uri()),
            listing_limit: 25,
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            username: "bot".to_string(),
            password: "pw".to_string(),
        },
        text: TextConfig::default(),
        filter: FilterConfig::default(),
        output: OutputConfig {
            graph_path: output_dir
                .path()
                .join("graph.json")
                .to_string_lossy()
                .to_string(),
            report_path: Some(
                output_dir
                    .path()
                    .join("report.json")
                    .to_string_lossy()
                    .to_string(),
            ),
            min_weight: 2,
            pretty: false,
        },
    }
}

fn thread_url() -> &'static str {
    "https://www.reddit.com/r/pets/comments/abc123/cats_or_dogs/"
}

fn listing(field: &str, texts: &[&str]) -> Value {
    let children: Vec<Value> = texts
        .iter()
        .map(|text| {
            let mut data = serde_json::Map::new();
            data.insert(field.to_string(), json!(text));
            json!({"kind": "t1", "data": data})
        })
        .collect();
    json!({"kind": "Listing", "data": {"children": children}})
}

fn thread(authors: &[&str]) -> Value {
    let children: Vec<Value> = authors
        .iter()
        .map(|author| json!({"kind": "t1", "data": {"author": author, "replies": ""}}))
        .collect();
    json!([
        {"kind": "Listing", "data": {"children": []}},
        {"kind": "Listing", "data": {"children": children}}
    ])
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .mount(server)
        .await;
}

async fn mount_thread(server: &MockServer, authors: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/comments/abc123.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thread(authors)))
        .mount(server)
        .await;
}

async fn mount_history(server: &MockServer, user: &str, comments: &[&str], titles: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/user/{}/comments", user)))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing("body", comments)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/user/{}/submitted", user)))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing("title", titles)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_two_commenters() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    mount_token(&mock_server).await;
    mount_thread(&mock_server, &["U1", "u2", "[deleted]"]).await;
    mount_history(&mock_server, "u1", &["cat dog"], &["cat"]).await;
    mount_history(&mock_server, "u2", &["dog fish"], &[]).await;

    let config = create_test_config(&mock_server, &output_dir);
    let crawl = crawl_thread(&config, thread_url())
        .await
        .expect("Crawl should succeed");

    assert_eq!(crawl.post_id, "abc123");
    assert!(!crawl.report.timed_out);
    assert_eq!(crawl.report.total(), 2);
    assert_eq!(crawl.report.recorded(), 2);
    assert_eq!(crawl.report.outcome("u1").map(|u| u.tokens), Some(3));
    assert_eq!(crawl.report.outcome("u2").map(|u| u.tokens), Some(2));

    // dog-fish has weight 1 and falls under min weight 2
    assert_eq!(crawl.graph.edges.len(), 1);
    assert_eq!(crawl.graph.edges[0].source, "cat");
    assert_eq!(crawl.graph.edges[0].target, "dog");
    assert_eq!(crawl.graph.edges[0].weight, 2);

    write_outputs(&crawl, &config.output).expect("Failed to write output");

    let graph = std::fs::read_to_string(&config.output.graph_path).expect("graph file");
    assert_eq!(
        graph,
        r#"{"nodes":[{"id":"cat"},{"id":"dog"}],"edges":[{"source":"cat","target":"dog","weight":2}]}"#
    );

    let report_path = config.output.report_path.as_ref().expect("report path");
    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(report_path).expect("report file"))
            .expect("report JSON");
    assert_eq!(report["units"]["u1"]["state"], "recorded");
    assert_eq!(report["units"]["u2"]["state"], "recorded");
}

#[tokio::test]
async fn test_rate_limited_commenter_is_skipped() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    mount_token(&mock_server).await;
    mount_thread(&mock_server, &["steady", "throttled"]).await;
    mount_history(&mock_server, "steady", &["hello world"], &[]).await;

    // First attempt plus two retries, then the unit is skipped
    Mock::given(method("GET"))
        .and(path("/user/throttled/comments"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/throttled/submitted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing("title", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server, &output_dir);
    config.output.min_weight = 1;

    let crawl = crawl_thread(&config, thread_url())
        .await
        .expect("Crawl should succeed");

    let throttled = crawl.report.outcome("throttled").expect("throttled outcome");
    assert_eq!(throttled.state, UnitState::Skipped);
    assert_eq!(throttled.rate_limit_retries, 2);
    assert_eq!(
        crawl.report.outcome("steady").map(|u| u.state),
        Some(UnitState::Recorded)
    );
    assert_eq!(crawl.graph.edges.len(), 1);
    assert_eq!(crawl.graph.edges[0].source, "hello");
}

#[tokio::test]
async fn test_server_error_fails_only_that_commenter() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    mount_token(&mock_server).await;
    mount_thread(&mock_server, &["good", "bad"]).await;
    mount_history(&mock_server, "good", &["green tea"], &[]).await;

    Mock::given(method("GET"))
        .and(path("/user/bad/comments"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server, &output_dir);
    config.output.min_weight = 1;

    let crawl = crawl_thread(&config, thread_url())
        .await
        .expect("Crawl should succeed");

    assert_eq!(crawl.report.failed(), 1);
    assert_eq!(crawl.report.recorded(), 1);
    assert_eq!(crawl.graph.edges.len(), 1);
}

#[tokio::test]
async fn test_deadline_cancels_slow_commenters() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    mount_token(&mock_server).await;
    mount_thread(&mock_server, &["fast", "slow"]).await;
    mount_history(&mock_server, "fast", &["quick brown fox"], &[]).await;

    Mock::given(method("GET"))
        .and(path("/user/slow/comments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing("body", &["never arrives"]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server, &output_dir);
    config.crawler.crawl_timeout_secs = 1;
    config.output.min_weight = 1;

    let crawl = crawl_thread(&config, thread_url())
        .await
        .expect("Crawl should return a partial result");

    assert!(crawl.report.timed_out);
    assert_eq!(
        crawl.report.outcome("slow").map(|u| u.state),
        Some(UnitState::Cancelled)
    );
    assert_eq!(
        crawl.report.outcome("fast").map(|u| u.state),
        Some(UnitState::Recorded)
    );
    assert!(crawl.graph.nodes.iter().all(|n| n.id != "arrives"));
    assert_eq!(crawl.graph.edges.len(), 3);
}

#[tokio::test]
async fn test_invalid_thread_url_makes_no_requests() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &output_dir);
    let result = crawl_thread(&config, "https://www.reddit.com/r/pets/").await;

    assert!(matches!(result, Err(ThreadwebError::InvalidInput(_))));
}

#[tokio::test]
async fn test_thread_without_commenters_is_rejected() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    mount_token(&mock_server).await;
    mount_thread(&mock_server, &["[deleted]"]).await;

    let config = create_test_config(&mock_server, &output_dir);
    let result = crawl_thread(&config, thread_url()).await;

    assert!(matches!(result, Err(ThreadwebError::InvalidInput(_))));
}
