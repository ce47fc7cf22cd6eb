use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

use resource_server::interaction::clinic_routes;
use resource_server::wire;

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(wire::serve(listener, Arc::new(clinic_routes(Duration::ZERO))));
    addr
}

async fn connect(addr: SocketAddr) -> (Lines<BufReader<OwnedReadHalf>>, OwnedWriteHalf) {
    let socket = TcpStream::connect(addr).await.unwrap();
    let (read_half, write_half) = socket.into_split();
    (BufReader::new(read_half).lines(), write_half)
}

async fn send(writer: &mut OwnedWriteHalf, frame: Value) {
    let mut line = frame.to_string();
    line.push('\n');
    writer.write_all(line.as_bytes()).await.unwrap();
}

async fn read_frame(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> Option<Value> {
    lines
        .next_line()
        .await
        .unwrap()
        .map(|line| serde_json::from_str(&line).unwrap())
}

#[tokio::test]
async fn request_response_over_the_wire() {
    let addr = start_server().await;
    let (mut lines, mut writer) = connect(addr).await;

    send(
        &mut writer,
        json!({
            "route": "get-patient-data",
            "kind": "request",
            "payload": {"name": "Doge"}
        }),
    )
    .await;

    let frame = read_frame(&mut lines).await.expect("one reply frame");
    assert_eq!(frame["item"]["heart_rate"], json!(90));
    assert_eq!(frame["item"]["blood_pressure"], json!("80/120"));

    // Exactly one outbound message, then the interaction is over.
    assert_eq!(read_frame(&mut lines).await, None);
}

#[tokio::test]
async fn claim_stream_respects_credit_and_completes() {
    let addr = start_server().await;
    let (mut lines, mut writer) = connect(addr).await;

    send(
        &mut writer,
        json!({"route": "claim-stream", "kind": "stream"}),
    )
    .await;
    send(&mut writer, json!({"request": 2})).await;

    let first = read_frame(&mut lines).await.expect("first claim");
    assert_eq!(first["item"]["name"], json!("MRI"));
    assert_eq!(first["item"]["amount"].as_f64(), Some(1000.0));

    let second = read_frame(&mut lines).await.expect("second claim");
    assert_eq!(second["item"]["name"], json!("Surgery"));

    // Grant the rest of the credit; the stream finishes in order.
    send(&mut writer, json!({"request": 5})).await;
    let third = read_frame(&mut lines).await.expect("third claim");
    assert_eq!(third["item"]["name"], json!("XRay"));
    assert_eq!(third["item"]["amount"].as_f64(), Some(500.0));

    let done = read_frame(&mut lines).await.expect("terminal frame");
    assert_eq!(done, json!({"done": true}));
    assert_eq!(read_frame(&mut lines).await, None);
}

#[tokio::test]
async fn cancelling_a_stream_stops_further_claims() {
    let addr = start_server().await;
    let (mut lines, mut writer) = connect(addr).await;

    send(
        &mut writer,
        json!({"route": "claim-stream", "kind": "stream"}),
    )
    .await;
    send(&mut writer, json!({"request": 1})).await;

    let first = read_frame(&mut lines).await.expect("first claim");
    assert_eq!(first["item"]["name"], json!("MRI"));

    send(&mut writer, json!({"cancel": true})).await;

    // The only thing left is the single terminal frame.
    let done = read_frame(&mut lines).await.expect("terminal frame");
    assert_eq!(done, json!({"done": true}));
    assert_eq!(read_frame(&mut lines).await, None);
}

#[tokio::test]
async fn fire_and_forget_produces_no_outbound_frames() {
    let addr = start_server().await;
    let (mut lines, mut writer) = connect(addr).await;

    send(
        &mut writer,
        json!({
            "route": "patient-checkout",
            "kind": "fire",
            "payload": {"name": "Doge"}
        }),
    )
    .await;

    // The server dispatches the effect and closes without replying.
    assert_eq!(read_frame(&mut lines).await, None);
}

#[tokio::test]
async fn unrecognized_routes_are_reported_not_dropped() {
    let addr = start_server().await;
    let (mut lines, mut writer) = connect(addr).await;

    send(&mut writer, json!({"route": "bogus", "kind": "request"})).await;

    let frame = read_frame(&mut lines).await.expect("error frame");
    let message = frame["error"].as_str().unwrap();
    assert!(message.contains("unrecognized route"));
}

#[tokio::test]
async fn vaccine_stream_delivers_all_three() {
    let addr = start_server().await;
    let (mut lines, mut writer) = connect(addr).await;

    send(&mut writer, json!({"route": "vaccines", "kind": "stream"})).await;
    send(&mut writer, json!({"request": 10})).await;

    let mut names = Vec::new();
    loop {
        let frame = read_frame(&mut lines).await.expect("frame");
        if frame == json!({"done": true}) {
            break;
        }
        assert_eq!(frame["item"]["delivered"], json!(true));
        names.push(frame["item"]["name"].as_str().unwrap().to_string());
    }
    assert_eq!(names, ["Pfizer", "J&J", "Moderna"]);
}
