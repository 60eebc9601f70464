use std::sync::{Arc, Once};

use jobboard_engine::{
    resolve_api_base, AdvertisementSource, ApiClient, ApiError, ApplicationForm, FetchSettings,
    HeadlessPage, JobsPage, PageHost, PageInitializer, StaticJob, JOB_LIST_SELECTOR,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobboard_logging::initialize_for_tests);
}

fn client(server: &MockServer) -> ApiClient {
    let base = resolve_api_base(Some(&server.uri()), &Url::parse("http://localhost:5500/").unwrap())
        .expect("valid base");
    ApiClient::new(base, &FetchSettings::default()).expect("client")
}

fn jobs_page_host() -> HeadlessPage {
    HeadlessPage::new(
        Url::parse("http://localhost:5500/jobs.html").unwrap(),
        "#page-content",
    )
    .with_content(r#"<h1>Jobs</h1><div id="job-list"><p>Loading</p></div>"#)
}

fn fallback_jobs() -> Vec<StaticJob> {
    vec![StaticJob {
        title: "Frontend developer".to_string(),
        description: "React and TypeScript.".to_string(),
        location: "Remote".to_string(),
        salary: "40k - 50k €".to_string(),
    }]
}

#[tokio::test]
async fn advertisements_are_listed_from_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/advertisements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "ad_id": 1,
                "title": "Rust developer",
                "description": "Systems work",
                "location": "Lyon",
                "salary_min": 45000,
                "salary_max": 60000,
                "contract_type": "CDI",
                "company_id": 3
            }
        ])))
        .mount(&server)
        .await;

    let ads = client(&server).advertisements().await.expect("ads");
    assert_eq!(ads.len(), 1);
    assert_eq!(ads[0].title, "Rust developer");
    assert_eq!(ads[0].salary_range().as_deref(), Some("45000 - 60000 €"));
}

#[tokio::test]
async fn jobs_page_renders_backend_cards() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/advertisements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ad_id": 7, "title": "Data engineer", "description": "Pipelines"}
        ])))
        .mount(&server)
        .await;
    let host = jobs_page_host();
    let page = JobsPage::new(Arc::new(client(&server))).with_static_jobs(fallback_jobs());

    page.init(&host).await.expect("init ok");

    let cards = host.region(JOB_LIST_SELECTOR).expect("rendered");
    assert!(cards.contains("Data engineer"));
    assert!(cards.contains(r#"data-ad-id="7""#));
    assert!(cards.contains("Location not specified"));
    assert!(cards.contains("Salary not specified"));
    assert!(!cards.contains("Frontend developer"));
}

#[tokio::test]
async fn jobs_page_falls_back_to_static_jobs_on_error() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/advertisements"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "db down"})))
        .mount(&server)
        .await;
    let host = jobs_page_host();
    let page = JobsPage::new(Arc::new(client(&server))).with_static_jobs(fallback_jobs());

    page.init(&host).await.expect("init ok");

    let cards = host.region(JOB_LIST_SELECTOR).expect("rendered");
    assert!(cards.contains("Frontend developer"));
    assert!(cards.contains("40k - 50k €"));
}

#[tokio::test]
async fn jobs_page_falls_back_to_static_jobs_when_empty() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/advertisements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let host = jobs_page_host();
    let page = JobsPage::new(Arc::new(client(&server))).with_static_jobs(fallback_jobs());

    page.init(&host).await.expect("init ok");

    assert!(host
        .region(JOB_LIST_SELECTOR)
        .expect("rendered")
        .contains("Frontend developer"));
}

#[tokio::test]
async fn jobs_page_without_list_is_a_no_op() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/advertisements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let host = HeadlessPage::new(
        Url::parse("http://localhost:5500/jobs.html").unwrap(),
        "#page-content",
    )
    .with_content("<h1>Nothing here</h1>");
    let page = JobsPage::new(Arc::new(client(&server)));

    page.init(&host).await.expect("init ok");
    assert!(!host.has_element(JOB_LIST_SELECTOR));
}

#[tokio::test]
async fn single_advertisement_is_fetched_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/advertisements/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ad_id": 12, "title": "QA engineer", "salary_min": "30000", "salary_max": "38000"
        })))
        .mount(&server)
        .await;

    let ad = client(&server).advertisement(12).await.expect("ad");
    assert_eq!(ad.ad_id, 12);
    assert_eq!(ad.salary_range().as_deref(), Some("30000 - 38000 €"));
}

#[tokio::test]
async fn application_is_posted_as_json() {
    let server = MockServer::start().await;
    let form = ApplicationForm {
        ad_id: 12,
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        phone: "0600000000".to_string(),
        message: "Hello".to_string(),
        person_id: None,
    };
    Mock::given(method("POST"))
        .and(path("/applications"))
        .and(body_json(serde_json::to_value(&form).unwrap()))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"message": "Application received"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(&server).submit_application(&form).await.expect("accepted");
    assert_eq!(reply.message.as_deref(), Some("Application received"));
}

#[tokio::test]
async fn rejected_application_carries_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/applications"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "You already applied to this advertisement"
        })))
        .mount(&server)
        .await;
    let form = ApplicationForm {
        ad_id: 12,
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        phone: String::new(),
        message: String::new(),
        person_id: None,
    };

    let err = client(&server).submit_application(&form).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 400,
            detail: "You already applied to this advertisement".to_string(),
        }
    );
    assert_eq!(err.to_string(), "You already applied to this advertisement");
}

#[tokio::test]
async fn rejection_without_detail_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/advertisements/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).advertisement(99).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 404,
            detail: "Request failed.".to_string(),
        }
    );
}
