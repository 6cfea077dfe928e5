use super::fake_site::{EchoFetcher, FakeBrowser, START_URL, section, title};
use super::{files_under, test_config};
use crate::error::MirrorError;
use crate::run_session;
use crate::session::{CookieLoad, CookieRecord, apply_cookies};

fn jar() -> Vec<CookieRecord> {
    vec![
        CookieRecord::new("sessionid", "s3cr3t", ".learn.example.com"),
        CookieRecord::new("_ga", "GA1.2.3", ".tracker.other.net"),
        CookieRecord::new("csrftoken", "t0k3n", "learn.example.com"),
    ]
}

fn small_course() -> FakeBrowser {
    FakeBrowser::new(vec![title(
        "Lesson 1: Basics",
        vec![section("Start", "<p>hello</p>", &[])],
    )])
}

#[tokio::test]
async fn test_mismatched_cookie_is_skipped() {
    let browser = small_course();
    let state = browser.state();

    let load = apply_cookies(&browser, START_URL, &jar()).await.unwrap();

    assert_eq!(
        load,
        CookieLoad {
            loaded: 2,
            skipped: 1
        }
    );
    assert_eq!(state.borrow().cookies, vec!["sessionid", "csrftoken"]);
}

#[tokio::test]
async fn test_run_session_loads_cookies_and_crawls() {
    let out = tempfile::tempdir().unwrap();
    let config = test_config(out.path());
    let browser = small_course();
    let state = browser.state();
    let fetcher = EchoFetcher::default();

    let stats = run_session(browser, &fetcher, &config, &jar(), std::future::pending())
        .await
        .unwrap();

    assert_eq!(stats.pages, 1);
    assert_eq!(files_under(out.path()), vec!["lesson_basics/Start/page_0.html"]);
    assert_eq!(state.borrow().cookies.len(), 2);
    assert!(state.borrow().closed);
}

#[tokio::test]
async fn test_run_session_closes_browser_on_fault() {
    let out = tempfile::tempdir().unwrap();
    let config = test_config(out.path());
    let browser = FakeBrowser::new(vec![title("Basics", vec![section("Start", "<p>x</p>", &[])])]);
    let state = browser.state();
    let fetcher = EchoFetcher::default();

    let err = run_session(browser, &fetcher, &config, &jar(), std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, MirrorError::MalformedLabel { .. }));
    assert!(state.borrow().closed);
}

#[tokio::test]
async fn test_interrupt_stops_crawl_and_closes_browser() {
    let out = tempfile::tempdir().unwrap();
    let config = test_config(out.path());
    let browser = small_course();
    // Keeps the crawl waiting on its first poll
    browser.state().borrow_mut().lag = 1_000;
    let state = browser.state();
    let fetcher = EchoFetcher::default();

    let err = run_session(browser, &fetcher, &config, &jar(), async {})
        .await
        .unwrap_err();

    assert!(matches!(err, MirrorError::Interrupted));
    assert!(state.borrow().closed);
    assert!(files_under(out.path()).is_empty());
}
