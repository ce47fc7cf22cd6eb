use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::timeout;

use resource_core::{InteractionRouter, ItemSource, ServiceError, StreamEvent};

#[derive(Debug, Serialize, Deserialize)]
struct Reading {
    device: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Report {
    device: String,
    level: u32,
}

fn numbers_router() -> InteractionRouter {
    InteractionRouter::new(Duration::ZERO).request_stream("numbers", |_: ()| {
        Ok(vec![json!(10), json!(20), json!(30)])
    })
}

async fn collect(sub: &mut resource_core::Subscription) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    while let Some(event) = sub.next().await {
        let terminal = !matches!(event, StreamEvent::Item(_));
        events.push(event);
        if terminal {
            break;
        }
    }
    events
}

#[tokio::test]
async fn request_response_produces_exactly_one_reply() {
    let router = InteractionRouter::new(Duration::ZERO).request_response(
        "read-device",
        |reading: Reading| async move {
            Ok(Report {
                device: reading.device,
                level: 42,
            })
        },
    );

    let reply = router
        .request("read-device", json!({"device": "thermometer"}))
        .await
        .unwrap();
    let report: Report = serde_json::from_value(reply).unwrap();
    assert_eq!(
        report,
        Report {
            device: "thermometer".to_string(),
            level: 42
        }
    );
}

#[tokio::test]
async fn unrecognized_routes_are_client_visible_errors() {
    let router = InteractionRouter::new(Duration::ZERO);

    assert!(matches!(
        router.request("nope", Value::Null).await,
        Err(ServiceError::Transport(_))
    ));
    assert!(matches!(
        router.fire("nope", Value::Null),
        Err(ServiceError::Transport(_))
    ));
    assert!(matches!(
        router.stream("nope", Value::Null),
        Err(ServiceError::Transport(_))
    ));
}

#[tokio::test]
async fn calling_a_route_with_the_wrong_shape_is_rejected() {
    let router = numbers_router();
    assert!(matches!(
        router.request("numbers", Value::Null).await,
        Err(ServiceError::Transport(_))
    ));
}

#[tokio::test]
async fn malformed_payloads_are_validation_errors() {
    let router = InteractionRouter::new(Duration::ZERO)
        .request_response("read-device", |_: Reading| async move { Ok(json!(null)) });

    let err = router
        .request("read-device", json!({"device": 7}))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn stream_emits_in_handler_order_then_completes() {
    let router = numbers_router();

    let mut sub = router.stream("numbers", Value::Null).unwrap();
    sub.request(10).await;
    let events = collect(&mut sub).await;
    assert_eq!(
        events,
        vec![
            StreamEvent::Item(json!(10)),
            StreamEvent::Item(json!(20)),
            StreamEvent::Item(json!(30)),
            StreamEvent::Complete,
        ]
    );
}

#[tokio::test]
async fn stream_output_is_deterministic_across_calls() {
    let router = numbers_router();

    let mut first = Vec::new();
    let mut second = Vec::new();
    for run in [&mut first, &mut second] {
        let mut sub = router.stream("numbers", Value::Null).unwrap();
        sub.request(10).await;
        *run = collect(&mut sub).await;
    }
    assert_eq!(first, second);
}

#[tokio::test]
async fn emission_never_exceeds_granted_credit() {
    let router = numbers_router();

    let mut sub = router.stream("numbers", Value::Null).unwrap();
    sub.request(2).await;
    assert_eq!(sub.next().await, Some(StreamEvent::Item(json!(10))));
    assert_eq!(sub.next().await, Some(StreamEvent::Item(json!(20))));

    // Credit is spent; the third item must not arrive until more is granted.
    assert!(timeout(Duration::from_millis(50), sub.next()).await.is_err());

    sub.request(1).await;
    assert_eq!(sub.next().await, Some(StreamEvent::Item(json!(30))));
    assert_eq!(sub.next().await, Some(StreamEvent::Complete));
}

#[tokio::test]
async fn cancel_after_k_items_never_delivers_item_k_plus_one() {
    let router = numbers_router();

    let mut sub = router.stream("numbers", Value::Null).unwrap();
    sub.request(1).await;
    assert_eq!(sub.next().await, Some(StreamEvent::Item(json!(10))));

    sub.cancel().await;
    assert_eq!(sub.next().await, Some(StreamEvent::Complete));
    assert_eq!(sub.next().await, None);
}

#[tokio::test]
async fn handler_failure_mid_stream_terminates_with_an_error_signal() {
    let router = InteractionRouter::new(Duration::ZERO).stream_source("flaky", |_| {
        let items: ItemSource = Box::new(
            vec![Ok(json!(1)), Err(ServiceError::internal("boom"))].into_iter(),
        );
        Ok(items)
    });

    let mut sub = router.stream("flaky", Value::Null).unwrap();
    sub.request(10).await;
    assert_eq!(sub.next().await, Some(StreamEvent::Item(json!(1))));
    assert!(matches!(sub.next().await, Some(StreamEvent::Error(_))));
    assert_eq!(sub.next().await, None);
}

#[tokio::test]
async fn handler_failure_at_subscribe_is_an_error_event_not_a_hang() {
    let router = InteractionRouter::new(Duration::ZERO)
        .stream_source("broken", |_| Err(ServiceError::internal("no source")));

    let mut sub = router.stream("broken", Value::Null).unwrap();
    assert!(matches!(sub.next().await, Some(StreamEvent::Error(_))));
}

#[tokio::test]
async fn fire_and_forget_returns_before_the_side_effect_finishes() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let router =
        InteractionRouter::new(Duration::ZERO).fire_and_forget("notify", move |_: Value| {
            let tx = tx.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let _ = tx.send("done");
            }
        });

    router.fire("notify", Value::Null).unwrap();

    // Control is back before the handler has run its course.
    assert!(rx.try_recv().is_err());

    // The side effect still happens, on its own time.
    assert_eq!(rx.recv().await, Some("done"));
}
