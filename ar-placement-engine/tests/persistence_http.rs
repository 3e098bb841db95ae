use std::time::Duration;

use ar_placement_engine::persistence::{
    HttpPlacementSink, PlacementRecord, PlacementSink, Vector3Payload,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

type Captured = mpsc::UnboundedSender<Value>;

async fn capture(State(tx): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    let _ = tx.send(body);
    Json(json!({ "status": "success", "message": "Placement received" }))
}

async fn reject(State(tx): State<Captured>, Json(body): Json<Value>) -> StatusCode {
    let _ = tx.send(body);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn record() -> PlacementRecord {
    PlacementRecord {
        position: Vector3Payload::new(0.5, -1.25, -2.0),
        rotation: Vector3Payload::new(0.0, 0.75, 0.0),
    }
}

#[tokio::test]
async fn submit_posts_record_to_save_route() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let base = serve(Router::new().route("/api/save", post(capture)).with_state(tx)).await;

    let sink = HttpPlacementSink::new(&base);
    sink.submit(record()).unwrap();

    let body = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        body,
        json!({
            "position": { "x": 0.5, "y": -1.25, "z": -2.0 },
            "rotation": { "x": 0.0, "y": 0.75, "z": 0.0 }
        })
    );
}

#[tokio::test]
async fn server_error_is_not_reported_to_caller() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let base = serve(Router::new().route("/api/save", post(reject)).with_state(tx)).await;

    let sink = HttpPlacementSink::new(&base);
    assert!(sink.submit(record()).is_ok());

    let received = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
    assert!(matches!(received, Ok(Some(_))));
}

#[tokio::test]
async fn unreachable_api_is_not_reported_to_caller() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sink = HttpPlacementSink::new(&format!("http://{}", addr));
    assert!(sink.submit(record()).is_ok());
    tokio::time::sleep(Duration::from_millis(50)).await;
}
