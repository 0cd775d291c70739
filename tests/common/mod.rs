use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built server binary; cargo exports its path
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_nite-cms"));
        cmd.env("PORT", port.to_string())
            .env("ADMIN_TOKEN", admin_token())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // DATABASE_URL is inherited from the test environment
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

/// The suite needs a live Postgres; without DATABASE_URL each test skips.
pub fn db_configured() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

pub fn admin_token() -> String {
    std::env::var("ADMIN_TOKEN").unwrap_or_else(|_| TEST_ADMIN_TOKEN.to_string())
}

/// Spawn (or reuse) the shared test server. `None` means no database is
/// configured and the caller should skip.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    if !db_configured() {
        return Ok(None);
    }
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

/// Titles must be unique per run so derived slugs never collide with
/// leftovers from earlier runs.
pub fn unique_title(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{} {}", prefix, nanos)
}
