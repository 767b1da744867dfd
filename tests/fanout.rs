//! End-to-end tests against a live service recursing through loopback HTTP.

use std::collections::HashSet;

use opentelemetry::trace::SpanKind;

mod common;

async fn get(url: &str) -> (u16, String) {
    let res = common::client().get(url).send().await.expect("service unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sequence_matches_recurrence() {
    let service = common::start_service().await;

    let expected = [1, 1, 2, 3, 5, 8, 13];
    for (i, want) in expected.iter().enumerate() {
        let (status, body) = get(&service.url(&format!("/fib?i={i}"))).await;
        assert_eq!(status, 200, "index {i}");
        assert_eq!(body, want.to_string(), "index {i}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repeated_calls_agree() {
    let service = common::start_service().await;

    let (_, first) = get(&service.url("/fib?i=5")).await;
    for _ in 0..3 {
        let (status, again) = get(&service.url("/fib?i=5")).await;
        assert_eq!(status, 200);
        assert_eq!(again, first);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_parameters_are_503() {
    let service = common::start_service().await;

    for query in ["/fib", "/fib?i=1&i=2", "/fib?i=abc", "/fib?i="] {
        let (status, body) = get(&service.url(query)).await;
        assert_eq!(status, 503, "{query}");
        assert!(!body.is_empty(), "{query}");
        assert!(body.contains("Couldn't parse index"), "{query}: {body}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_negative_index_is_a_base_case() {
    let service = common::start_service().await;

    let (status, body) = get(&service.url("/fib?i=-3")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_requests_are_isolated() {
    let service = common::start_service().await;
    let expected = [2, 3, 5, 8, 13, 21];

    let tasks: Vec<_> = (2..=7)
        .map(|i| {
            let url = service.url(&format!("/fib?i={i}"));
            tokio::spawn(async move { (i, get(&url).await) })
        })
        .collect();

    for task in tasks {
        let (i, (status, body)) = task.await.unwrap();
        assert_eq!(status, 200, "index {i}");
        assert_eq!(body, expected[i - 2].to_string(), "index {i}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_root_and_favicon() {
    let service = common::start_service().await;

    let (status, body) = get(&service.url("/")).await;
    assert_eq!(status, 200);
    assert!(!body.is_empty());

    let (status, other) = get(&service.url("/some/unknown/path")).await;
    assert_eq!(status, 200);
    assert_eq!(other, body);

    let (status, _) = get(&service.url("/favicon.ico")).await;
    assert_eq!(status, 404);

    let spans = service.exporter.get_finished_spans().unwrap();
    let roots: Vec<_> = spans.iter().filter(|s| s.name == "root").collect();
    assert_eq!(roots.len(), 2);
    assert!(roots[0].events.events.iter().any(|e| e.name == "annotation within span"));
    let db = spans.iter().find(|s| s.name == "database").unwrap();
    assert!(roots
        .iter()
        .any(|r| r.span_context.span_id() == db.parent_span_id));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_request_id_is_echoed() {
    let service = common::start_service().await;

    let res = common::client().get(service.url("/fib?i=1")).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_one_trace_spans_every_hop() {
    let service = common::start_service().await;

    let (status, body) = get(&service.url("/fib?i=3")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "3");

    let spans = service.exporter.get_finished_spans().unwrap();
    let trace_ids: HashSet<_> = spans.iter().map(|s| s.span_context.trace_id()).collect();
    assert_eq!(trace_ids.len(), 1, "every hop continues the caller's trace");

    // fib(3) → fib(2), fib(1); fib(2) → fib(1), fib(0): five server hops, four client calls.
    let servers: Vec<_> = spans.iter().filter(|s| s.name == "fibonacci").collect();
    let clients: Vec<_> = spans.iter().filter(|s| s.name == "fibClient").collect();
    assert_eq!(servers.len(), 5);
    assert_eq!(clients.len(), 4);
    assert!(clients.iter().all(|c| c.span_kind == SpanKind::Client));

    // Every non-root server span is parented by a client span from another hop.
    let client_ids: HashSet<_> = clients.iter().map(|c| c.span_context.span_id()).collect();
    let children_of_clients = servers
        .iter()
        .filter(|s| client_ids.contains(&s.parent_span_id))
        .count();
    assert_eq!(children_of_clients, 4);

    for client in &clients {
        assert!(client.attributes.iter().any(|kv| kv.key.as_str() == "url"));
        assert!(client.attributes.iter().any(|kv| kv.key.as_str() == "result"));
    }
    for server in &servers {
        assert!(server.attributes.iter().any(|kv| kv.key.as_str() == "parameter"));
        assert!(server.attributes.iter().any(|kv| kv.key.as_str() == "result"));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_inbound_trace_and_baggage_are_continued() {
    let service = common::start_service().await;

    let res = common::client()
        .get(service.url("/fib?i=2"))
        .header("traceparent", "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01")
        .header("baggage", "user=alice")
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "2");

    let spans = service.exporter.get_finished_spans().unwrap();
    assert!(!spans.is_empty());
    for span in &spans {
        assert_eq!(
            span.span_context.trace_id().to_string(),
            "4bf92f3577b34da6a3ce929d0e0e4736"
        );
        assert!(
            span.attributes
                .iter()
                .any(|kv| kv.key.as_str() == "user" && kv.value.as_str() == "alice"),
            "baggage missing on {}",
            span.name
        );
    }
}
