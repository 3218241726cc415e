use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DashboardView {
    panels: Vec<PanelView>,
}

#[derive(Debug, Deserialize)]
struct PanelView {
    vaccine: String,
    staff: TileView,
    resident: TileView,
    log: Vec<LogRowView>,
}

#[derive(Debug, Deserialize)]
struct TileView {
    label: String,
    counter: u32,
}

#[derive(Debug, Deserialize)]
struct LogRowView {
    id: String,
    staff_count: u32,
    resident_count: u32,
    note: Option<String>,
    origin: String,
}

#[derive(Debug, Deserialize)]
struct SubmissionRecord {
    id: String,
    staff_count: u32,
    resident_count: u32,
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    outcome: String,
}

impl DashboardView {
    fn panel(&self, vaccine: &str) -> &PanelView {
        self.panels
            .iter()
            .find(|panel| panel.vaccine == vaccine)
            .expect("missing panel")
    }
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("vax_dashboard_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/dashboard")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_vax_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env_remove("VAX_STORE_URL")
        .env_remove("VAX_STAFF_TOTAL")
        .env_remove("VAX_RESIDENT_TOTAL")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn dashboard(client: &Client, server: &TestServer) -> DashboardView {
    client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn set_counter(client: &Client, server: &TestServer, vaccine: &str, population: &str, value: u32) {
    let response = client
        .post(format!("{}/api/counter", server.base_url))
        .json(&serde_json::json!({
            "vaccine": vaccine,
            "population": population,
            "action": "set",
            "value": value,
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn http_submit_updates_log_and_tiles() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    set_counter(&client, &server, "covid", "staff", 10).await;
    set_counter(&client, &server, "covid", "resident", 5).await;

    let record: SubmissionRecord = client
        .post(format!("{}/api/submit/covid", server.base_url))
        .json(&serde_json::json!({ "note": "  clinic day " }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record.staff_count, 10);
    assert_eq!(record.resident_count, 5);
    assert_eq!(record.note.as_deref(), Some("clinic day"));

    let view = dashboard(&client, &server).await;
    let covid = view.panel("covid");
    assert_eq!(covid.log[0].id, record.id);
    assert_eq!(covid.log[0].origin, "persisted");
    assert_eq!(covid.staff.label, "3.4%");
    assert_eq!(covid.staff.counter, 10);
    assert_eq!(covid.resident.counter, 5);
}

#[tokio::test]
async fn http_counter_steps_floor_at_zero() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    set_counter(&client, &server, "influenza", "resident", 1).await;
    for action in ["dec", "dec", "dec", "inc"] {
        let response = client
            .post(format!("{}/api/counter", server.base_url))
            .json(&serde_json::json!({
                "vaccine": "flu",
                "population": "resident",
                "action": action,
            }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let view = dashboard(&client, &server).await;
    assert_eq!(view.panel("influenza").resident.counter, 1);

    let response = client
        .post(format!("{}/api/counter", server.base_url))
        .json(&serde_json::json!({
            "vaccine": "influenza",
            "population": "staff",
            "action": "set",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_delete_removes_persisted_and_local_rows() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    set_counter(&client, &server, "influenza", "staff", 7).await;
    let record: SubmissionRecord = client
        .post(format!("{}/api/submit/influenza", server.base_url))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let staged: DashboardView = client
        .post(format!("{}/api/stage/influenza", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let local = &staged.panel("influenza").log[0];
    assert_eq!(local.origin, "local");
    assert_eq!(local.staff_count, 7);
    let local_id = local.id.clone();

    let removed: DeleteResponse = client
        .delete(format!("{}/api/submissions/influenza/{local_id}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed.outcome, "removed_local");

    let removed: DeleteResponse = client
        .delete(format!("{}/api/submissions/influenza/{}", server.base_url, record.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed.outcome, "removed");

    let view = dashboard(&client, &server).await;
    assert!(view.panel("influenza").log.iter().all(|row| row.id != record.id));

    let again = client
        .delete(format!("{}/api/submissions/influenza/{}", server.base_url, record.id))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_form_submit_shows_notice_once() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let page = client
        .post(format!("{}/submit/covid", server.base_url))
        .form(&[("staff", "12"), ("resident", "x"), ("note", "<script>")])
        .send()
        .await
        .unwrap();
    assert!(page.status().is_success());
    let html = page.text().await.unwrap();
    assert!(html.contains("Vaccination Dashboard"));
    assert!(html.contains(r#"data-type="ok""#));
    assert!(html.contains("&lt;script&gt;"));

    let view = dashboard(&client, &server).await;
    let head = &view.panel("covid").log[0];
    assert_eq!(head.staff_count, 12);
    assert_eq!(head.resident_count, 0);
    assert_eq!(head.note.as_deref(), Some("<script>"));

    let html = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!html.contains(r#"data-type="ok""#));
}
