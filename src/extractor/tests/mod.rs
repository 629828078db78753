use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::extractor::{
    ContentExtractor, ExtractionError, ExtractionStrategy, MIN_CONTENT_CHARS, RawPage,
    TierOutput, get_summary, model::PageMetadata,
};

const PARAGRAPH: &str = "Building better software starts with understanding the problem you are solving. \
Teams that write small, well-tested modules ship faster and break less. ";

fn article_page() -> String {
    format!(
        r#"<!DOCTYPE html><html><head>
        <title>How to Build Better Software | Tech Blog</title>
        <meta property="og:title" content="How to Build Better Software">
        <meta name="description" content="  Practical advice for software teams.  ">
        <meta name="author" content="Jane Doe">
        <meta property="article:published_time" content="2024-03-01">
        </head><body>
        <nav><a href="/">Home</a><a href="/about">About</a></nav>
        <article><h1>How to Build Better Software</h1>
        <p>{p}</p><p>{p}</p><p>{p}</p>
        <table><tr><td>SECRET TABLE CELL</td></tr></table>
        </article>
        <footer>Copyright</footer>
        </body></html>"#,
        p = PARAGRAPH
    )
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

/// Test tier that records that it ran and returns a canned result.
struct Scripted {
    name: &'static str,
    output: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl ExtractionStrategy for Scripted {
    fn name(&self) -> &'static str {
        self.name
    }

    fn attempt(&self, _page: &RawPage<'_>) -> Option<TierOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.output.map(|text| TierOutput {
            text: text.to_string(),
            metadata: Some(PageMetadata {
                title: format!("  {}  ", self.name),
                ..PageMetadata::default()
            }),
        })
    }
}

fn scripted(
    name: &'static str,
    output: Option<&'static str>,
) -> (Box<dyn ExtractionStrategy>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let strategy = Scripted {
        name,
        output,
        calls: calls.clone(),
    };
    (Box::new(strategy), calls)
}

const LONG_TEXT: &str = "This tier produced a long enough body of text to pass the minimum length check that the extractor applies to every result.";

#[test]
fn test_extract_article_with_metadata() {
    let html = article_page();
    let content = ContentExtractor::default()
        .extract_html(&html, &url("https://example.com/post"), "https://example.com/post")
        .unwrap();

    assert_eq!(content.title, "How to Build Better Software");
    assert_eq!(content.description, "Practical advice for software teams.");
    assert_eq!(content.author, "Jane Doe");
    assert_eq!(content.date, "2024-03-01");
    assert_eq!(content.url, "https://example.com/post");
    assert!(content.text.contains("Building better software"));
    assert!(!content.text.contains("SECRET TABLE CELL"));
    assert!(content.text.chars().count() >= MIN_CONTENT_CHARS);
    assert_eq!(content.language.as_deref(), Some("eng"));
}

#[test]
fn test_tiers_run_in_order_until_one_succeeds() {
    let (first, first_calls) = scripted("first", None);
    let (second, second_calls) = scripted("second", Some("   "));
    let (third, third_calls) = scripted("third", Some(LONG_TEXT));
    let (fourth, fourth_calls) = scripted("fourth", Some(LONG_TEXT));
    let extractor = ContentExtractor::new(vec![first, second, third, fourth]);

    let content = extractor
        .extract_html("<html></html>", &url("https://example.com"), "https://example.com")
        .unwrap();

    assert_eq!(content.text, LONG_TEXT);
    assert_eq!(content.title, "third");
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    assert_eq!(third_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fourth_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_text_only_tier_defaults_metadata_to_empty() {
    let extractor = ContentExtractor::new(vec![Box::new(
        crate::extractor::strategies::RawMarkupStrategy,
    )]);
    let html = format!("<html><head><title>Ignored</title></head><body><div>{LONG_TEXT}</div></body></html>");

    let content = extractor
        .extract_html(&html, &url("https://example.com"), "https://example.com")
        .unwrap();
    assert_eq!(content.title, "");
    assert_eq!(content.description, "");
    assert_eq!(content.author, "");
    assert_eq!(content.date, "");
}

#[test]
fn test_reject_short_content() {
    let html = "<html><head><title>Tiny</title></head><body><p>Too short.</p></body></html>";
    let result = ContentExtractor::default().extract_html(
        html,
        &url("https://example.com/tiny"),
        "https://example.com/tiny",
    );

    match result {
        Err(ExtractionError::TooShort(len)) => assert!(len < MIN_CONTENT_CHARS),
        other => panic!("expected TooShort, got {:?}", other),
    }
}

#[test]
fn test_reject_when_no_tier_yields_text() {
    let (only, _) = scripted("only", None);
    let result = ContentExtractor::new(vec![only]).extract_html(
        "<html></html>",
        &url("https://example.com"),
        "https://example.com",
    );
    assert!(matches!(result, Err(ExtractionError::TooShort(0))));
}

#[test]
fn test_summary_cuts_at_late_sentence_end() {
    let text = format!("{}. And then more words follow here", "a".repeat(80));
    // the full stop sits at position 80 of a 100-char window
    assert_eq!(get_summary(&text, 100), format!("{}.", "a".repeat(80)));
}

#[test]
fn test_summary_keeps_raw_prefix_when_period_is_early() {
    let text = format!("Short. {}", "b".repeat(200));
    let summary = get_summary(&text, 100);
    assert_eq!(summary.chars().count(), 100);
    assert!(summary.starts_with("Short. "));
}

#[test]
fn test_summary_of_empty_text() {
    assert_eq!(get_summary("", 300), "");
    assert_eq!(get_summary("Only a sentence.", 300), "Only a sentence.");
}

#[tokio::test]
async fn test_extract_content_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(article_page(), "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let target = format!("{}/post", mock_server.uri());
    let content = ContentExtractor::default()
        .extract_content(&target, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(content.url, target);
    assert_eq!(content.author, "Jane Doe");
}

#[tokio::test]
async fn test_extract_content_fails_on_http_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let target = format!("{}/gone", mock_server.uri());
    let result = ContentExtractor::default()
        .extract_content(&target, Duration::from_secs(5))
        .await;

    assert!(matches!(result, Err(ExtractionError::Fetch(_))));
}
