use std::time::Duration;

use derive_builder::Builder;
use log::debug;
use reqwest::{header, Client, Response};

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://cses.fi";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct SessionConfig {
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    #[builder(default = "DEFAULT_USER_AGENT.to_string()")]
    user_agent: String,
    #[builder(default = "DEFAULT_TIMEOUT")]
    timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SessionConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Cookie jar and client for one run; dropping it forgets the login.
#[derive(Debug)]
pub struct Session {
    client: Client,
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::transport(&config.base_url, e))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    pub(crate) async fn get_page(&self, url: &str) -> Result<String> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(url, e))?;
        debug!("GET {} -> {}", url, res.status());

        res.text().await.map_err(|e| Error::transport(url, e))
    }

    /// POSTs a url-encoded form back to the page it came from.
    ///
    /// The `Referer` always names `url` itself, as the site's forms post to
    /// the page that rendered them.
    pub(crate) async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Response> {
        let res = self
            .client
            .post(url)
            .header(header::REFERER, url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::transport(url, e))?;
        debug!("POST {} -> {}", url, res.status());

        Ok(res)
    }
}
