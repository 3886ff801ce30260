// Liveness probes for portfolio links.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::fetcher::{build_client, http_url};

#[async_trait]
pub trait LinkProbe: Send + Sync {
    /// HEAD request, redirects followed. Returns the final status code.
    async fn head(&self, url: &str) -> Result<u16>;

    /// GET request. Returns the status code; the body is not read.
    async fn get(&self, url: &str) -> Result<u16>;
}

pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout, user_agent)?,
        })
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn head(&self, url: &str) -> Result<u16> {
        let target = http_url(url)?;
        let status = self.client.head(target).send().await?.status().as_u16();
        debug!(url, status, method = "HEAD", "Probed link");
        Ok(status)
    }

    async fn get(&self, url: &str) -> Result<u16> {
        let target = http_url(url)?;
        let status = self.client.get(target).send().await?.status().as_u16();
        debug!(url, status, method = "GET", "Probed link");
        Ok(status)
    }
}
