//! End-to-end tests against the live mock server.
//!
//! # Design
//! The mock server echoes what it received, so these tests check the wire
//! form of built requests after a real HTTP round-trip. `execute_with_ureq`
//! drives built requests with a blocking client, independent of the session;
//! the async tests go through `ApiSession` and its reqwest transport.

use std::time::Duration;

use bytes::Bytes;
use mock_server::EchoedRequest;
use twapi_core::{
    endpoints::lists, ApiSession, Credential, Endpoint, Environment, Error, HttpMethod,
    HttpRequest, HttpResponse, RequestBuilder, SessionConfig,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data.
fn execute_with_ureq(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => {
            let mut builder = agent.get(&req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        (HttpMethod::Delete, _) => {
            let mut builder = agent.delete(&req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        (method, body) => {
            let mut builder = match method {
                HttpMethod::Put => agent.put(&req.url),
                _ => agent.post(&req.url),
            };
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body: Bytes::from(body),
    }
}

fn start_server_on_thread() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

async fn start_server() -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    addr
}

fn environment(addr: std::net::SocketAddr) -> Environment {
    Environment::new(format!("http://{addr}/echo"), format!("http://{addr}/echo/upload"))
}

#[test]
fn built_requests_over_the_wire() {
    let addr = start_server_on_thread();
    let builder = RequestBuilder::new(environment(addr), Credential::bearer("token"));

    // GET: query only.
    let req = builder.build(&Endpoint::get("/get.json").param("hoge", "😀")).unwrap();
    let echoed: EchoedRequest = execute_with_ureq(req).decode().unwrap();
    assert_eq!(echoed.method, "GET");
    assert_eq!(echoed.path, "/echo/get.json");
    assert_eq!(echoed.query.as_deref(), Some("hoge=%F0%9F%98%80"));
    assert!(echoed.body.is_empty());
    assert_eq!(echoed.authorization.as_deref(), Some("Bearer token"));

    // POST: form body only.
    let req = builder.build(&Endpoint::post("/post.json").param("hoge", "😀")).unwrap();
    let echoed: EchoedRequest = execute_with_ureq(req).decode().unwrap();
    assert_eq!(echoed.method, "POST");
    assert!(echoed.query.is_none());
    assert_eq!(echoed.body, "hoge=%F0%9F%98%80");
    assert_eq!(
        echoed.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );

    // POST: query and body kept apart.
    let endpoint = Endpoint::post("/query_and_body.json")
        .query("query", "value")
        .body("body", "value");
    let echoed: EchoedRequest = execute_with_ureq(builder.build(&endpoint).unwrap())
        .decode()
        .unwrap();
    assert_eq!(echoed.query.as_deref(), Some("query=value"));
    assert_eq!(echoed.body, "body=value");

    // DELETE from a named constructor.
    let req = builder.build(&lists::unfollow_list("1", "2")).unwrap();
    let echoed: EchoedRequest = execute_with_ureq(req).decode().unwrap();
    assert_eq!(echoed.method, "DELETE");
    assert_eq!(echoed.path, "/echo/2/users/1/followed_lists/2");
}

#[tokio::test(flavor = "multi_thread")]
async fn session_round_trip_with_oauth1() {
    let addr = start_server().await;
    let credential = Credential::oauth1("ck", "cs", "tk", "ts");
    let session = ApiSession::new(credential, environment(addr)).unwrap();

    let task = session.send(&lists::follow_list("2244994945", "84839422")).unwrap();
    let echoed: EchoedRequest = task.decode().await.unwrap();
    assert_eq!(echoed.method, "POST");
    assert_eq!(echoed.path, "/echo/2/users/2244994945/followed_lists");
    assert_eq!(echoed.content_type.as_deref(), Some("application/json"));
    assert_eq!(echoed.body, r#"{"list_id":"84839422"}"#);

    let authorization = echoed.authorization.unwrap();
    assert!(authorization.starts_with("OAuth oauth_consumer_key=\"ck\", oauth_nonce=\""));
    assert!(authorization.contains("oauth_token=\"tk\""));
    assert!(authorization.contains("oauth_signature=\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn session_reports_api_errors_and_rate_limits() {
    let addr = start_server().await;
    let env = Environment::new(format!("http://{addr}"), format!("http://{addr}"));
    let session = ApiSession::new(Credential::None, env).unwrap();

    let task = session.send(&Endpoint::get("/errors/status")).unwrap();
    let err = task.json().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    let response = task.response().await.unwrap();
    let rate_limit = response.rate_limit().unwrap();
    assert_eq!(rate_limit.limit, 900);
    assert_eq!(rate_limit.remaining, 0);

    let task = session.send(&Endpoint::get("/errors/envelope")).unwrap();
    assert!(matches!(task.json().await.unwrap_err(), Error::Api { status: 200, .. }));

    let task = session.send(&Endpoint::get("/text")).unwrap();
    assert!(matches!(task.json().await.unwrap_err(), Error::Decoding(_)));
    assert_eq!(
        task.response_data().await.unwrap(),
        Bytes::from("plain text, not json")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn session_cancels_slow_request() {
    let addr = start_server().await;
    let env = Environment::new(format!("http://{addr}"), format!("http://{addr}"));
    let session = ApiSession::new(Credential::None, env).unwrap();

    let task = session.send(&Endpoint::get("/slow")).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    task.cancel();
    assert!(matches!(task.response_data().await.unwrap_err(), Error::Cancelled));
}

#[tokio::test(flavor = "multi_thread")]
async fn session_times_out_as_transport_error() {
    let addr = start_server().await;
    let env = Environment::new(format!("http://{addr}"), format!("http://{addr}"));
    let config = SessionConfig::default().with_timeout(Duration::from_millis(100));
    let session = ApiSession::with_config(Credential::None, env, &config).unwrap();

    let task = session.send(&Endpoint::get("/slow")).unwrap();
    assert!(matches!(task.response_data().await.unwrap_err(), Error::Transport(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = ApiSession::new(Credential::None, environment(addr)).unwrap();
    let task = session.send(&Endpoint::get("/a.json")).unwrap();
    assert!(matches!(task.json().await.unwrap_err(), Error::Transport(_)));
}
