use reqwest::header::USER_AGENT;
use reqwest::{StatusCode, Url};
use select::document::Document;

use crate::config::FetchConfig;
use crate::error::ScrapeError;

/// Extra request settings passed along with a GET.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub auth: Option<BasicAuth>,
}

#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> reqwest::Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .gzip(true)
            .deflate(true)
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// GETs `url` and parses the body as an HTML document.
    pub async fn fetch(&self, url: &Url, request: &Request) -> Result<Document, ScrapeError> {
        let page = self.fetch_text(url, request).await?;
        Ok(Document::from(page.as_str()))
    }

    /// GETs `url` and returns the body of a 200 response.
    ///
    /// Timeouts are retried with exponential backoff up to
    /// `max_attempts`, any other transport error fails right away.
    pub async fn fetch_text(&self, url: &Url, request: &Request) -> Result<String, ScrapeError> {
        let mut attempt = 0;
        let (status, body) = loop {
            attempt += 1;
            match self.get(url, request).await {
                Ok(res) => break res,
                Err(e) if e.is_timeout() => {
                    if attempt >= self.config.max_attempts {
                        log::error!("Timed out on {url}, no attempts left");
                        return Err(ScrapeError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: attempt,
                        });
                    }
                    let delay = self.config.backoff(attempt);
                    log::warn!(
                        "Timed out on {url} (attempt {attempt}/{}), retrying in {delay:?}",
                        self.config.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(source) => {
                    return Err(ScrapeError::Http {
                        url: url.to_string(),
                        source,
                    })
                }
            }
        };

        if status != StatusCode::OK {
            log::error!("Got status {status} for {url}: {body}");
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        Ok(body)
    }

    async fn get(&self, url: &Url, request: &Request) -> reqwest::Result<(StatusCode, String)> {
        let mut builder = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.config.user_agent);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(auth) = &request.auth {
            builder = builder.basic_auth(&auth.username, auth.password.as_ref());
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok((status, body))
    }
}
