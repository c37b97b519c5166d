//! End-to-end behaviour of `ApiClient` against a mock HTTP backend.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use jobboard_core::api::{ApiClient, ClientConfig, ErrorKind, Payload, RequestDescriptor, RetryPolicy};
use jobboard_core::auth::{MemoryBackend, TokenStore};
use jobboard_core::models::{ChallengeTopic, GenerateChallenges, JobFilter, NewApplication, Registration};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(base_url: String) -> ClientConfig {
    ClientConfig {
        base_url,
        request_timeout: Some(Duration::from_secs(5)),
        retry: RetryPolicy::default().with_base_delay(Duration::from_millis(10)),
    }
}

fn client_for(server: &MockServer, tokens: Arc<TokenStore>) -> ApiClient {
    ApiClient::new(config_for(format!("{}/api", server.uri())), tokens).expect("api client")
}

async fn tokens_with(token: &str) -> Arc<TokenStore> {
    let tokens = Arc::new(TokenStore::in_memory());
    tokens.set(Some(token.to_string())).await;
    tokens
}

#[tokio::test]
async fn login_stores_token_and_authenticates_next_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "kim@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t1",
            "user": {"id": "u1", "email": "kim@example.com", "role": "JOBSEEKER"},
            "message": "Login successful"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1", "email": "kim@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = Arc::new(MemoryBackend::new());
    let tokens = Arc::new(TokenStore::new(backend.clone()));
    let client = client_for(&server, tokens.clone());

    let resp = client.login("kim@example.com", "pw").await.expect("login");
    assert_eq!(resp.user.id, "u1");
    assert_eq!(tokens.get().await.as_deref(), Some("t1"));
    assert_eq!(backend.peek().as_deref(), Some("t1"));

    let me = client.current_user().await.expect("current user");
    assert_eq!(me.email, "kim@example.com");
}

#[tokio::test]
async fn register_stores_returned_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "fresh",
            "user": {"id": "c1", "email": "hr@ledger.example", "role": "COMPANY"},
            "message": "User created successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(TokenStore::in_memory());
    let client = client_for(&server, tokens.clone());

    let resp = client
        .register(&Registration::company("hr@ledger.example", "pw", "Ledger & Co"))
        .await
        .expect("register");
    assert!(resp.user.is_company());
    assert_eq!(tokens.get().await.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn auth_failure_clears_token_and_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/company/my-jobs"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = tokens_with("expired").await;
    let client = client_for(&server, tokens.clone());

    let err = client.my_jobs().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.to_string(), "Invalid token");
    assert!(!tokens.is_authenticated().await);
}

#[tokio::test]
async fn not_found_is_single_attempt_with_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Job not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory()));
    let err = client.job("missing").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Client);
    assert_eq!(err.to_string(), "Job not found");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn path_ids_are_percent_encoded_as_segments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a b", "title": "Examiner"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory()));
    let job = client.job("a b").await.expect("job");
    assert_eq!(job.id, "a b");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.path(), "/api/jobs/a%20b");
}

#[tokio::test]
async fn server_errors_make_exactly_three_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/stats"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Failed to get admin stats"})))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory()));
    let err = client.admin_stats().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.to_string(), "Failed to get admin stats");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn server_error_then_success_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/subscription-status"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/payments/subscription-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "active", "tier": "premium"})))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory()));
    let status = client.subscription_status().await.expect("status");

    assert!(status.is_active());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn connection_refused_is_retried_then_surfaced() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener); // release the port so that requests fail with ECONNREFUSED

    let client = ApiClient::new(
        config_for(format!("http://{}/api", addr)),
        Arc::new(TokenStore::in_memory()),
    )
    .expect("api client");

    let err = client.request(RequestDescriptor::get("/jobs")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn logout_clears_token_even_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = tokens_with("t1").await;
    let client = client_for(&server, tokens.clone());

    let err = client.logout().await.unwrap_err();
    assert_eq!(err.to_string(), "Network error");
    assert_eq!(tokens.get().await, None);
}

#[tokio::test]
async fn logout_success_clears_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Logged out successfully"})))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = tokens_with("t1").await;
    let client = client_for(&server, tokens.clone());

    client.logout().await.expect("logout");
    assert!(!tokens.is_authenticated().await);
}

#[tokio::test]
async fn missing_user_clears_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})))
        .mount(&server)
        .await;

    let tokens = tokens_with("orphaned").await;
    let client = client_for(&server, tokens.clone());

    let err = client.current_user().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Client);
    assert_eq!(tokens.get().await, None);
}

#[tokio::test]
async fn job_filter_is_sent_as_encoded_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .and(query_param("search", "fraud & audit"))
        .and(query_param("location", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [{"id": "j1", "title": "Forensic Accountant"}],
            "pagination": {"page": 1, "total": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory()));
    let filter = JobFilter {
        location: Some("New York".into()),
        ..JobFilter::search("fraud & audit")
    };
    let jobs = client.jobs(&filter).await.expect("jobs");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "Forensic Accountant");
}

#[tokio::test]
async fn apply_to_job_adds_job_post_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/applications"))
        .and(body_json(json!({"job_post_id": "j1", "cover_letter": "CFE, 8 years"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "a1", "job_post_id": "j1", "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, tokens_with("t1").await);
    let app = client
        .apply_to_job("j1", &NewApplication::with_cover_letter("CFE, 8 years"))
        .await
        .expect("apply");
    assert!(app.is_pending());
}

#[tokio::test]
async fn generate_ai_challenges_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/challenges/generate-ai"))
        .and(body_json(json!({
            "job_id": "j1", "topic": "fraud_detection", "difficulty": "advanced", "count": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "challenges": [{
                "job_id": "j1", "type": "AI", "difficulty": "advanced",
                "topic": "fraud_detection", "prompt": "You are investigating a potential fraud case."
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, tokens_with("t1").await);
    let params = GenerateChallenges::new("j1", ChallengeTopic::FraudDetection, "advanced");
    let challenges = client.generate_ai_challenges(&params).await.expect("challenges");

    assert_eq!(challenges.len(), 1);
    assert_eq!(challenges[0].topic.as_deref(), Some("fraud_detection"));
}

#[tokio::test]
async fn bodies_are_serialized_or_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory()));
    let structured = RequestDescriptor::post("/echo").json(&json!({"a": 1})).unwrap();
    let payload = client.request(structured).await.expect("json body");
    assert_eq!(payload, Payload::Text("ok".to_string()));

    client
        .request(RequestDescriptor::post("/echo").text("raw text"))
        .await
        .expect("text body");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, br#"{"a":1}"#.to_vec());
    assert_eq!(requests[1].body, b"raw text".to_vec());
    assert_eq!(
        requests[1].headers.get("content-type").unwrap().to_str().unwrap(),
        "application/json"
    );
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn authorization_override_is_respected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/subscription-status"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "active"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, tokens_with("user-token").await);
    let descriptor = RequestDescriptor::get("/payments/subscription-status")
        .header("Authorization", "Bearer service-key");
    client.request(descriptor).await.expect("request");
}

#[tokio::test]
async fn parallel_auth_failure_only_affects_later_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Token expired"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/j1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "j1", "title": "Examiner"}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let tokens = tokens_with("t1").await;
    let client = client_for(&server, tokens.clone());

    let (me, job) = futures::join!(client.current_user(), client.job("j1"));
    assert!(me.unwrap_err().is_authentication());
    assert_eq!(job.expect("job").id, "j1");

    let requests = server.received_requests().await.unwrap();
    let job_request = requests.iter().find(|r| r.url.path() == "/api/jobs/j1").unwrap();
    assert_eq!(
        job_request.headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer t1"
    );
    assert!(!tokens.is_authenticated().await);
}
