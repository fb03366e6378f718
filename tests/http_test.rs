use comfy_sweep::actions::http::HttpSubmitter;
use comfy_sweep::actions::builtin::DryRunSubmitter;
use comfy_sweep::actions::{build_payload, Submitter};
use comfy_sweep::dsl::builder::GraphBuilder;
use comfy_sweep::dsl::WorkflowGraph;
use comfy_sweep::SweepError;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn graph() -> WorkflowGraph {
    GraphBuilder::new()
        .node("3", "KSampler", "KSampler")
            .input("steps", 30)
            .build()
        .node("9", "SaveImage", "Save")
            .input("filename_prefix", "steps-30")
            .build()
        .build()
}

/// Serves exactly one request with the given status and body; resolves to
/// the request body it received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let url = format!("http://{}/prompt", listener.local_addr().expect("addr"));

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        // headers
        let header_end = loop {
            let n = socket.read(&mut chunk).await.expect("read");
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        // body
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&buf[header_end..]).to_string()
    });

    (url, handle)
}

#[tokio::test]
async fn test_http_submit_sends_prompt_and_workflow() {
    let (url, server) = serve_once("200 OK", r#"{"prompt_id":"abc-123","number":1,"node_errors":{}}"#).await;
    let submitter = HttpSubmitter::new(url);

    let response = submitter.submit(&graph()).await.expect("Submission failed");
    assert_eq!(response["prompt_id"], "abc-123");

    let body: Value = serde_json::from_str(&server.await.expect("server task")).expect("JSON body");
    assert_eq!(body["prompt"]["3"]["inputs"]["steps"], 30);
    assert_eq!(body["prompt"]["9"]["_meta"]["title"], "Save");

    let embedded = body["extra_pnginfo"]["workflow"].as_str().expect("workflow string");
    let embedded: WorkflowGraph = serde_json::from_str(embedded).expect("embedded graph");
    assert_eq!(embedded, graph());
}

#[tokio::test]
async fn test_http_error_status() {
    let (url, _server) = serve_once("500 Internal Server Error", r#"{"error":"out of memory"}"#).await;
    let submitter = HttpSubmitter::new(url);

    match submitter.submit(&graph()).await {
        Err(SweepError::Http { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("out of memory"));
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_node_errors() {
    let (url, _server) = serve_once(
        "200 OK",
        r#"{"prompt_id":"x","node_errors":{"3":{"errors":["bad steps"]}}}"#,
    )
    .await;
    let submitter = HttpSubmitter::new(url);

    let err = submitter.submit(&graph()).await.unwrap_err();
    assert!(matches!(err, SweepError::NodeErrors(ref s) if s.contains("bad steps")));
}

#[tokio::test]
async fn test_http_unreachable_service() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let submitter = HttpSubmitter::new(format!("http://{}/prompt", addr));
    let err = submitter.submit(&graph()).await.unwrap_err();
    assert!(matches!(err, SweepError::Network { .. }));
}

#[tokio::test]
async fn test_dry_run_submitter() {
    let response = DryRunSubmitter.submit(&graph()).await.expect("dry run");
    assert_eq!(response, json!({ "dry_run": true }));
}

#[test]
fn test_payload_shape() {
    let payload = build_payload(&graph()).expect("payload");
    assert_eq!(payload["prompt"], serde_json::to_value(graph()).expect("graph"));
    assert_eq!(
        payload["extra_pnginfo"]["workflow"],
        json!(graph().to_compact_json().expect("compact"))
    );
}
