use segpatch_client::{HttpPatchSender, PatchClientConfig, PatchError, PatchSender};
use segpatch_core::{Identifier, Instruction, InstructionBatch};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One-shot HTTP server: answers the first request and returns it raw
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
        request
    });

    (format!("http://{addr}"), handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn sender_for(base_url: &str) -> HttpPatchSender {
    let config = PatchClientConfig::new()
        .with_base_url(base_url)
        .with_scope("acc", "org", "proj", "prod")
        .with_api_key("secret");
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpPatchSender::with_client(config, client).unwrap()
}

fn payload() -> segpatch_core::PatchPayload {
    InstructionBatch::from(vec![Instruction::remove_clause(Identifier::new("c1"))]).into_payload()
}

#[tokio::test]
async fn sends_patch_with_scope_and_key() {
    let (base_url, server) = serve_once("200 OK", r#"{"status":"SUCCESS"}"#).await;
    let sender = sender_for(&base_url);

    let response = sender
        .send_patch(&Identifier::new("beta_users"), &payload())
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, Some(json!({ "status": "SUCCESS" })));

    let request = server.await.unwrap();
    let first_line = request.lines().next().unwrap();
    assert_eq!(
        first_line,
        "PATCH /cf/admin/segments/beta_users?accountIdentifier=acc&orgIdentifier=org&projectIdentifier=proj&environmentIdentifier=prod HTTP/1.1"
    );
    assert!(request.to_ascii_lowercase().contains("x-api-key: secret"));

    let body = request.split("\r\n\r\n").nth(1).unwrap();
    let body: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        body,
        json!({
            "instructions": [
                { "kind": "removeClause", "parameters": { "clauseID": "c1" } }
            ]
        })
    );
}

#[tokio::test]
async fn rejection_carries_server_message() {
    let (base_url, server) = serve_once(
        "400 Bad Request",
        r#"{"code":"INVALID","message":"clause c1 not found"}"#,
    )
    .await;
    let sender = sender_for(&base_url);

    let err = sender
        .send_patch(&Identifier::new("beta_users"), &payload())
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        PatchError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "clause c1 not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_success_body() {
    let (base_url, server) = serve_once("200 OK", "").await;
    let sender = sender_for(&base_url);

    let response = sender
        .send_patch(&Identifier::new("beta_users"), &payload())
        .await
        .unwrap();
    server.await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, None);
}

#[tokio::test]
async fn non_json_success_body_is_kept() {
    let (base_url, server) = serve_once("200 OK", "accepted").await;
    let sender = sender_for(&base_url);

    let response = sender
        .send_patch(&Identifier::new("beta_users"), &payload())
        .await
        .unwrap();
    server.await.unwrap();

    assert_eq!(response.body, Some(json!("accepted")));
}

#[tokio::test]
async fn segment_id_is_path_encoded() {
    let (base_url, server) = serve_once("200 OK", "").await;
    let sender = sender_for(&base_url);

    sender
        .send_patch(&Identifier::new("x?y=1"), &payload())
        .await
        .unwrap();

    let request = server.await.unwrap();
    let first_line = request.lines().next().unwrap();
    assert!(first_line.starts_with("PATCH /cf/admin/segments/x%3Fy=1?accountIdentifier=acc&"));
}

#[tokio::test]
async fn dot_segment_id_is_rejected_before_sending() {
    let sender = sender_for("http://127.0.0.1:9");

    let err = sender
        .send_patch(&Identifier::new(".."), &payload())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PatchError::Config(segpatch_client::ConfigError::InvalidSegment(_))
    ));
}
