//! Integration tests for context delivery through `RequestBuilder::execute`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use places_client::{delivery_context, ErrorPolicy, PlacesClient, RequestError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str, policy: ErrorPolicy) -> PlacesClient {
    PlacesClient::builder("test-key")
        .base_url(base_url)
        .timeout_secs(5)
        .error_policy(policy)
        .build()
        .expect("client construction should not fail")
}

async fn mount_status(server: &MockServer, endpoint: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": status,
            "results": [{ "name": "Blue Bottle" }, { "name": "Verve" }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn success_is_delivered_on_the_context_thread() {
    let server = MockServer::start().await;
    mount_status(&server, "/textsearch/json", "OK").await;

    let client = test_client(&server.uri(), ErrorPolicy::default());
    let (handle, mut ctx) = delivery_context();
    let delivered = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&delivered);

    client
        .text_search("coffee", false)
        .on_error(|err| panic!("unexpected error: {err}"))
        .execute(&handle, move |result| {
            let names: Vec<String> = result.iter().map(|p| p.name.clone()).collect();
            *slot.lock().unwrap() = Some((names, std::thread::current().id()));
        });

    assert!(ctx.run_next().await);
    let (names, thread) = delivered.lock().unwrap().take().expect("completion ran");
    assert_eq!(names, vec!["Blue Bottle".to_owned(), "Verve".to_owned()]);
    assert_eq!(thread, std::thread::current().id());
    assert_eq!(ctx.run_pending(), 0, "exactly one delivery");
}

#[tokio::test]
async fn failure_goes_to_the_request_listener_only() {
    let server = MockServer::start().await;
    mount_status(&server, "/nearbysearch/json", "REQUEST_DENIED").await;

    let client_wide = Arc::new(Mutex::new(Vec::<RequestError>::new()));
    let sink = Arc::clone(&client_wide);
    let client = test_client(
        &server.uri(),
        ErrorPolicy::handler(move |err| sink.lock().unwrap().push(err)),
    );

    let (handle, mut ctx) = delivery_context();
    let errors = Arc::new(Mutex::new(Vec::<RequestError>::new()));
    let sink = Arc::clone(&errors);

    client
        .nearby_search(1.0, 2.0, 50.0, false)
        .on_error(move |err| sink.lock().unwrap().push(err))
        .execute(&handle, |_| panic!("completion must not run on failure"));

    assert!(ctx.run_next().await);
    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].reason(), "REQUEST_DENIED");
    assert!(client_wide.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failure_without_listener_uses_client_handler() {
    let server = MockServer::start().await;
    mount_status(&server, "/radarsearch/json", "INVALID_REQUEST").await;

    let errors = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&errors);
    let client = test_client(
        &server.uri(),
        ErrorPolicy::handler(move |err| sink.lock().unwrap().push(err.reason().to_owned())),
    );

    let (handle, mut ctx) = delivery_context();
    client
        .radar_search(0.0, 0.0, 10.0, false)
        .execute(&handle, |_| panic!("completion must not run on failure"));

    assert!(ctx.run_next().await);
    assert_eq!(*errors.lock().unwrap(), vec!["INVALID_REQUEST".to_owned()]);
}

#[tokio::test]
#[should_panic(expected = "uncaught request error")]
async fn failure_without_any_listener_panics_on_the_context() {
    let server = MockServer::start().await;
    mount_status(&server, "/textsearch/json", "OVER_QUERY_LIMIT").await;

    let client = test_client(&server.uri(), ErrorPolicy::Panic);
    let (handle, mut ctx) = delivery_context();
    client
        .text_search("anything", false)
        .execute(&handle, |_| {});

    ctx.run_next().await;
}

#[tokio::test]
async fn nothing_runs_until_the_context_is_pumped() {
    let server = MockServer::start().await;
    mount_status(&server, "/details/json", "OK").await;

    let client = test_client(&server.uri(), ErrorPolicy::default());
    let (handle, mut ctx) = delivery_context();
    let ran = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&ran);

    client.details("ref", false).execute(&handle, move |_| {
        *flag.lock().unwrap() = true;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!*ran.lock().unwrap(), "completion ran before the context pumped");

    assert!(ctx.run_next().await);
    assert!(*ran.lock().unwrap());
}

#[test]
fn context_thread_outside_the_runtime_receives_outcomes() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        mount_status(&server, "/textsearch/json", "OK").await;
        server
    });

    let client = PlacesClient::builder("test-key")
        .base_url(&server.uri())
        .runtime(runtime.handle().clone())
        .build()
        .expect("client construction should not fail");

    let (handle, mut ctx) = delivery_context();
    let count = Arc::new(Mutex::new(0usize));
    let slot = Arc::clone(&count);
    client
        .text_search("coffee", false)
        .execute(&handle, move |result| *slot.lock().unwrap() = result.len());

    assert!(ctx.blocking_run_next());
    assert_eq!(*count.lock().unwrap(), 2);
    runtime.block_on(async move { drop(server) });
}
