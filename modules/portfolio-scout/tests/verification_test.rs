use portfolio_common::parse_config;
use portfolio_scout::testing::{candidate, MockFetcher};
use portfolio_scout::verification::{verified_only, AttributionVerifier};

const CONFIG: &str = r#"
    [target]
    names = ["Jane Doe", "J. Doe"]
    profile_url = "https://www.linkedin.com/in/janedoe"
    portfolio_domains = ["janedoe.com"]

    [associations]
    agencies = ["Droga5", "Mother"]
    brands = ["Levi's"]
"#;

fn verifier() -> AttributionVerifier {
    AttributionVerifier::new(&parse_config(CONFIG, None).unwrap()).unwrap()
}

#[tokio::test]
async fn fetched_page_content_drives_the_score() {
    let fetcher = MockFetcher::new().on_page(
        "https://adweek.com/levis",
        "Jane Doe (J. Doe) ran strategy at Mother for Levi's. Profile: https://www.linkedin.com/in/janedoe",
    );
    let record = candidate("Levi's spring", "https://adweek.com/levis");

    let result = verifier().verify_fetched(&record, &fetcher).await;

    // 2 mentions + Mother + Levi's + profile link
    assert_eq!(result.score, 6);
    assert!(result.is_verified);
    assert_eq!(
        result.evidence,
        vec![
            "Name mentioned 2 time(s) on page".to_string(),
            "Associated with agencies: Mother".to_string(),
            "Associated with known brand: Levi's".to_string(),
            "Mentioned on professional profile".to_string(),
        ]
    );
}

#[tokio::test]
async fn fetch_failure_scores_on_url_signals_only() {
    let fetcher = MockFetcher::new();
    let on_network = candidate("Post", "https://www.linkedin.com/posts/janedoe-1");
    let elsewhere = candidate("Post", "https://blog.example.com/post");

    let v = verifier();
    let network = v.verify_fetched(&on_network, &fetcher).await;
    let other = v.verify_fetched(&elsewhere, &fetcher).await;

    assert_eq!(network.score, 2);
    assert!(!network.is_verified);
    assert_eq!(other.score, 0);
    assert!(other.evidence.is_empty());
}

#[tokio::test]
async fn records_without_urls_are_not_fetched() {
    let fetcher = MockFetcher::new();
    let record = candidate("Untitled mention", "");

    let result = verifier().verify_fetched(&record, &fetcher).await;

    assert_eq!(result.score, 0);
    assert!(fetcher.fetched().is_empty());
}

#[tokio::test]
async fn verify_all_keeps_order_and_annotations() {
    let fetcher = MockFetcher::new()
        .on_page("https://a.com/1", "Jane Doe at Droga5 with J. Doe")
        .on_page("https://a.com/2", "Nothing relevant");
    let records = vec![
        candidate("First", "https://a.com/1"),
        candidate("Second", "https://a.com/2"),
        candidate("Third", "https://janedoe.com/work"),
    ];

    let attributed = verifier().verify_all(records, &fetcher).await;

    let scores: Vec<u32> = attributed.iter().map(|r| r.verification_score).collect();
    assert_eq!(scores, vec![3, 0, 1]);
    let verified = verified_only(attributed);
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].record.title, "First");
}
