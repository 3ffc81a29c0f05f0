//! Gather phase tests against mock store pages

use check_ratings::config::Config;
use check_ratings::gather::run_gather;
use check_ratings::storage::{fingerprint, read_snapshot};
use check_ratings::{build_report, collect_gathered, read_sources, AppRecord, Gatherer};
use futures::StreamExt;
use std::collections::HashSet;
use std::io::Cursor;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_page(title: &str, rating: &str) -> String {
    format!(
        r#"<html><body>
        <h1 itemprop="name"><span>{}</span></h1>
        <div itemprop="contentRating"><span>{}</span></div>
        <meta itemprop="description" content="A game about {}">
        </body></html>"#,
        title, rating, title
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_single_app() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/app",
        r#"<html><body><div itemprop="contentRating"><span>Mature</span></div></body></html>"#
            .to_string(),
    )
    .await;

    let input = format!("* [MyApp]({}/app)\n", server.uri());
    let records: Vec<AppRecord> = read_sources(Cursor::new(input), None)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "MyApp");
    assert_eq!(records[0].url, format!("{}/app", server.uri()));

    let gatherer = Gatherer::from_config(&Config::default()).unwrap();
    let gathered = collect_gathered(gatherer.gather(records)).await;

    assert!(gathered.failures.is_empty());
    assert_eq!(gathered.records.len(), 1);
    let app = &gathered.records[0];
    assert_eq!(app.content_rating.as_deref(), Some("Mature"));
    assert_eq!(app.developer, None);

    let mut general = AppRecord::new("Calm", "http://example.test/calm").unwrap();
    general.content_rating = Some("General".to_string());

    let sorted = build_report(vec![general, app.clone()], &HashSet::new());
    assert_eq!(sorted[0].name, "MyApp");
    assert_eq!(sorted[1].name, "Calm");
}

#[tokio::test]
async fn test_failed_item_does_not_stop_siblings() {
    let server = MockServer::start().await;
    for i in 0..4 {
        mount_page(
            &server,
            &format!("/app{}", i),
            store_page(&format!("Game {}", i), "Rated for 7+"),
        )
        .await;
    }

    let mut records: Vec<AppRecord> = (0..4)
        .map(|i| AppRecord::new(&format!("Game {}", i), &format!("{}/app{}", server.uri(), i)).unwrap())
        .collect();
    records.insert(2, AppRecord::new("Closed", "http://127.0.0.1:1/closed").unwrap());

    let gatherer = Gatherer::from_config(&Config::default()).unwrap();
    let gathered = collect_gathered(gatherer.gather(records)).await;

    assert_eq!(gathered.records.len(), 4);
    assert_eq!(gathered.failures.len(), 1);
    assert_eq!(gathered.failures[0].name, "Closed");

    // Completion order is arbitrary, so compare as sets
    let mut names: Vec<_> = gathered.records.iter().map(|r| r.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["Game 0", "Game 1", "Game 2", "Game 3"]);
    for record in &gathered.records {
        assert_eq!(record.content_rating.as_deref(), Some("Rated for 7+"));
        assert_eq!(record.original_name.as_deref(), Some(record.name.as_str()));
    }
}

#[tokio::test]
async fn test_error_status_leaves_record_unenriched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let record = AppRecord::new("Gone", &format!("{}/gone", server.uri())).unwrap();
    let gatherer = Gatherer::from_config(&Config::default()).unwrap();
    let gathered = collect_gathered(gatherer.gather(vec![record.clone()])).await;

    assert!(gathered.failures.is_empty());
    assert_eq!(gathered.records, vec![record]);
}

#[tokio::test]
async fn test_single_worker_still_completes_everything() {
    let server = MockServer::start().await;
    for i in 0..5 {
        mount_page(&server, &format!("/app{}", i), store_page("Slow", "General")).await;
    }

    let mut config = Config::default();
    config.gather.max_workers = 1;
    let records: Vec<AppRecord> = (0..5)
        .map(|i| AppRecord::new(&format!("App {}", i), &format!("{}/app{}", server.uri(), i)).unwrap())
        .collect();

    let gatherer = Gatherer::from_config(&config).unwrap();
    let gathered = collect_gathered(gatherer.gather(records)).await;

    assert_eq!(gathered.records.len(), 5);
    assert!(gathered.failures.is_empty());
}

#[tokio::test]
async fn test_pool_caps_concurrent_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(store_page("Paced", "General"))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(6)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.gather.max_workers = 2;
    let records: Vec<AppRecord> = (0..6)
        .map(|i| AppRecord::new(&format!("App {}", i), &format!("{}/app{}", server.uri(), i)).unwrap())
        .collect();

    let gatherer = Gatherer::from_config(&config).unwrap();
    let start = Instant::now();
    let gathered = collect_gathered(gatherer.gather(records)).await;
    let elapsed = start.elapsed();

    assert_eq!(gathered.records.len(), 6);
    // Six delayed pages through two workers take at least three rounds
    assert!(
        elapsed >= Duration::from_millis(900),
        "finished in {:?}, more than two fetches overlapped",
        elapsed
    );
}

#[tokio::test]
async fn test_outcomes_arrive_in_completion_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(store_page("Slow", "General"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fast", store_page("Fast", "General")).await;

    let records = vec![
        AppRecord::new("slow", &format!("{}/slow", server.uri())).unwrap(),
        AppRecord::new("fast", &format!("{}/fast", server.uri())).unwrap(),
    ];

    let gatherer = Gatherer::from_config(&Config::default()).unwrap();
    let order: Vec<String> = gatherer
        .gather(records)
        .map(|outcome| outcome.unwrap().name)
        .collect()
        .await;

    assert_eq!(order, vec!["fast", "slow"]);
}

#[tokio::test]
async fn test_requests_send_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(store_page("Agent", "Mature")))
        .expect(1)
        .mount(&server)
        .await;

    let record = AppRecord::new("Agent", &format!("{}/app", server.uri())).unwrap();
    let gatherer = Gatherer::from_config(&Config::default()).unwrap();
    let gathered = collect_gathered(gatherer.gather(vec![record])).await;

    // Without the header no mock matches and the page comes back as a 404
    assert_eq!(gathered.records.len(), 1);
    assert_eq!(gathered.records[0].content_rating.as_deref(), Some("Mature"));
}

#[tokio::test]
async fn test_run_gather_writes_snapshot() {
    let server = MockServer::start().await;
    mount_page(&server, "/one", store_page("One", "Rated for 12+")).await;
    mount_page(&server, "/two", store_page("Two", "General")).await;
    mount_page(&server, "/three", store_page("Three", "Mature")).await;

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("apps.md");
    let snapshot = dir.path().join("apps.snapshot");
    let content = format!(
        "# My apps\n\n* [One]({uri}/one)\nnot a link\n* [Two]({uri}/two)\n* [Three]({uri}/three)\n",
        uri = server.uri()
    );
    std::fs::write(&input, &content).unwrap();

    let gathered = run_gather(&Config::default(), &input, &snapshot, Some(2))
        .await
        .unwrap();
    assert_eq!(gathered.records.len(), 2);

    let loaded = read_snapshot(&snapshot).unwrap();
    assert_eq!(loaded.meta.record_count, 2);
    assert_eq!(loaded.meta.source_hash, fingerprint(content.as_bytes()));

    let mut names: Vec<_> = loaded.records.iter().map(|r| r.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_run_gather_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let result = run_gather(
        &Config::default(),
        &dir.path().join("missing.md"),
        &dir.path().join("apps.snapshot"),
        None,
    )
    .await;

    assert!(result.is_err());
    assert!(!dir.path().join("apps.snapshot").exists());
}
