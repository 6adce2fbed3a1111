use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Admin email the spawned server is configured with; tests register a
/// customer under this address to obtain an admin token
#[allow(dead_code)]
pub const ADMIN_EMAIL: &str = "admin@example.com";
#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "longenough";

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

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/storefront-api");
        cmd.env("PORT", port.to_string())
            .env("JWT_SECRET", "integration-test-secret")
            .env("ADMIN_EMAIL", ADMIN_EMAIL)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env
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
                // Ready on either status; degraded just means no database
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
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

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when the spawned server has a working database behind it. Tests that
/// need persistence skip themselves when this is false.
#[allow(dead_code)]
pub async fn db_available(server: &TestServer) -> Result<bool> {
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    Ok(res.status() == StatusCode::OK)
}

/// Register a customer and return its id; email must be unused
#[allow(dead_code)]
pub async fn register_customer(
    server: &TestServer,
    name: &str,
    email: &str,
    password: &str,
) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/customers", server.base_url))
        .json(&serde_json::json!({
            "customer_name": name,
            "email": email,
            "password": password,
        }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "register failed with {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    body["id"]
        .as_str()
        .map(str::to_string)
        .context("missing id in register response")
}

/// Obtain an admin token, registering the admin account on first use. On a
/// rerun against a persistent database the account already exists, which the
/// API reports as a 400 with a fixed detail; any other failure is an error.
#[allow(dead_code)]
pub async fn admin_token(server: &TestServer) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/customers", server.base_url))
        .json(&serde_json::json!({
            "customer_name": "Admin",
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD,
        }))
        .send()
        .await?;

    match res.status() {
        StatusCode::CREATED => {}
        StatusCode::BAD_REQUEST => {
            let body = res.json::<serde_json::Value>().await?;
            anyhow::ensure!(
                body["detail"] == "Customer already exists",
                "admin registration rejected: {}",
                body
            );
        }
        status => anyhow::bail!("admin registration failed with {}", status),
    }

    login(server, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Login and return the bearer token
#[allow(dead_code)]
pub async fn login(server: &TestServer, email: &str, password: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "login failed with {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    body["access_token"]
        .as_str()
        .map(str::to_string)
        .context("missing access_token in login response")
}

/// Email unique across one test run
#[allow(dead_code)]
pub fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}@example.com", prefix, nanos)
}
