use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use hotel_checklist::persistence::RemoteSheet;
use hotel_checklist::{router, AppState};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Clone, Default)]
struct Sheet {
    rows: Arc<Vec<Value>>,
    posted: Arc<Mutex<Vec<Value>>>,
    broken: bool,
}

async fn sheet_rows(State(sheet): State<Sheet>) -> Result<Json<Value>, StatusCode> {
    if sheet.broken {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(Value::Array(sheet.rows.as_ref().clone())))
}

async fn sheet_update(State(sheet): State<Sheet>, Json(body): Json<Value>) -> StatusCode {
    sheet.posted.lock().await.push(body);
    StatusCode::OK
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Starts a fake sheet and a checklist service backed by it.
async fn start(sheet: Sheet) -> String {
    let sheet_url = serve(
        Router::new()
            .route("/exec", get(sheet_rows).post(sheet_update))
            .with_state(sheet),
    )
    .await;

    let backend = RemoteSheet::new(format!("{sheet_url}/exec"), Duration::from_secs(2)).unwrap();
    let (state, _worker) = AppState::initialize(Arc::new(backend)).await;
    serve(router(state)).await
}

async fn snapshot(client: &Client, base_url: &str) -> Value {
    client
        .get(format!("{base_url}/api/checklist"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn wait_for_posts(sheet: &Sheet, count: usize) -> Vec<Value> {
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        let posted = sheet.posted.lock().await.clone();
        if posted.len() >= count {
            return posted;
        }
        if Instant::now() > deadline {
            panic!("sheet received {} of {count} updates", posted.len());
        }
        sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn fetched_rows_overwrite_defaults() {
    let sheet = Sheet {
        rows: Arc::new(vec![
            json!({ "category": "Duschlippen", "room": 101, "checked": "TRUE", "note": "leak" }),
            json!({ "category": "filter gereinigt", "room": "203", "checked": true, "note": "" }),
            json!({ "category": "Pool", "room": 101, "checked": true, "note": "" }),
        ]),
        ..Sheet::default()
    };
    let base_url = start(sheet).await;
    let client = Client::new();

    let snapshot = snapshot(&client, &base_url).await;
    assert_eq!(snapshot["backend"], "remote");
    assert_eq!(snapshot["entries"]["duschlippen"]["101"], json!({ "checked": true, "note": "leak" }));
    assert_eq!(snapshot["entries"]["filter"]["203"]["checked"], true);
    assert_eq!(snapshot["entries"]["filter"]["204"]["checked"], false);
    assert!(snapshot["startup_alert"].is_null());
    assert!(snapshot["last_reset_date"].is_null());
}

#[tokio::test]
async fn toggles_are_posted_in_the_background() {
    let sheet = Sheet::default();
    let base_url = start(sheet.clone()).await;
    let client = Client::new();

    let response = client
        .put(format!("{base_url}/api/entries/silikon/305/checked"))
        .json(&json!({ "checked": true }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let posted = wait_for_posts(&sheet, 1).await;
    assert_eq!(
        posted[0],
        json!({ "category": "silikon erneuert", "room": 305, "checked": true, "note": "" })
    );
}

#[tokio::test]
async fn note_save_waits_for_the_sheet() {
    let sheet = Sheet::default();
    let base_url = start(sheet.clone()).await;
    let client = Client::new();

    let snapshot: Value = client
        .put(format!("{base_url}/api/entries/sonstige/140/note"))
        .json(&json!({ "note": "Tür quietscht" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["entries"]["sonstige"]["140"]["note"], "Tür quietscht");

    let posted = sheet.posted.lock().await.clone();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0]["category"], "sonstige mangel");
    assert_eq!(posted[0]["note"], "Tür quietscht");
}

#[tokio::test]
async fn fetch_failure_surfaces_alert_and_disables_reset() {
    let sheet = Sheet {
        broken: true,
        ..Sheet::default()
    };
    let base_url = start(sheet).await;
    let client = Client::new();

    let snapshot = snapshot(&client, &base_url).await;
    assert!(snapshot["startup_alert"].as_str().unwrap().contains("500"));
    assert_eq!(snapshot["entries"]["duschlippen"]["101"]["checked"], false);
    assert_eq!(snapshot["reset_due"], false);

    let status: Value = client
        .get(format!("{base_url}/api/reset/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["supported"], false);

    let response = client
        .post(format!("{base_url}/api/reset"))
        .json(&json!({ "reason": "manual" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}
