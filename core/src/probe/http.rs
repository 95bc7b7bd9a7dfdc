use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::SERVER;
use tokio::sync::OnceCell;
use tracing::trace;

use super::{BannerProbe, SessionMode};

const HTTP_PORT: u16 = 80;

/// Creates the HTTP clients the banner probe sends requests with.
pub trait HttpClientFactory: Send + Sync {
    fn create_client(&self, timeout: Duration) -> reqwest::Result<Client>;
}

impl<F> HttpClientFactory for F
where
    F: Fn(Duration) -> reqwest::Result<Client> + Send + Sync,
{
    fn create_client(&self, timeout: Duration) -> reqwest::Result<Client> {
        self(timeout)
    }
}

/// Plain client with the probe timeout. Redirects and proxies are disabled
/// so the banner always belongs to the probed host.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHttpClientFactory;

impl HttpClientFactory for DefaultHttpClientFactory {
    fn create_client(&self, timeout: Duration) -> reqwest::Result<Client> {
        Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
    }
}

/// Reads the `Server` header of `http://<address>/`.
pub struct HttpBanner {
    factory: Arc<dyn HttpClientFactory>,
    timeout: Duration,
    mode: SessionMode,
    port: u16,
    session: OnceCell<Client>,
}

impl HttpBanner {
    pub fn new(factory: Arc<dyn HttpClientFactory>, timeout: Duration, mode: SessionMode) -> Self {
        Self {
            factory,
            timeout,
            mode,
            port: HTTP_PORT,
            session: OnceCell::new(),
        }
    }

    pub fn on_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    async fn request(&self, client: &Client, address: Ipv4Addr) -> anyhow::Result<Option<String>> {
        let url = format!("http://{address}:{}/", self.port);
        let response = client.get(&url).send().await?;
        trace!(%address, status = %response.status(), "HTTP response");

        let server = response
            .headers()
            .get(SERVER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(server)
    }
}

#[async_trait]
impl BannerProbe for HttpBanner {
    async fn banner(&self, address: Ipv4Addr) -> anyhow::Result<Option<String>> {
        match self.mode {
            SessionMode::Shared => {
                let client = self
                    .session
                    .get_or_try_init(|| async { self.factory.create_client(self.timeout) })
                    .await?;
                self.request(client, address).await
            }
            SessionMode::PerProbe => {
                let client = self.factory.create_client(self.timeout)?;
                self.request(&client, address).await
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
