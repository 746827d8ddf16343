//! Candidate-page content fetching.
//!
//! Downloads a candidate source page and reduces it to comparison text:
//! the text of its paragraph elements joined with single spaces. Fetching
//! is best-effort with a small fixed number of attempts; a page that cannot
//! be fetched contributes empty comparison text rather than an error.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use copyscan_shared::{CopyscanError, FetchConfig, Result};

/// Browser User-Agent, matching what the lookup stage sends.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Maximum number of redirects to follow when fetching a page.
const MAX_REDIRECTS: usize = 5;

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Client for downloading candidate pages and extracting comparison text.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    attempts: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Create a new fetcher from runtime configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CopyscanError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            attempts: config.attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Fetch `url` and return its paragraph text.
    ///
    /// Each attempt has its own timeout; attempts are separated by a fixed
    /// delay. When every attempt fails the result is an empty string, which
    /// scores zero against any sentence.
    pub async fn fetch_content(&self, url: &str) -> String {
        for attempt in 1..=self.attempts {
            match self.try_fetch(url).await {
                Ok(html) => return extract_paragraph_text(&html),
                Err(e) => {
                    warn!(%url, attempt, error = %e, "fetch attempt failed");
                    if attempt < self.attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        debug!(%url, "all fetch attempts failed, treating content as empty");
        String::new()
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CopyscanError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CopyscanError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| CopyscanError::Network(format!("{url}: failed to read body: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Content extraction
// ---------------------------------------------------------------------------

/// Join the text of every `<p>` element with single spaces.
///
/// Nested inline markup contributes its text in document order. Blank
/// paragraphs are dropped. A page without paragraphs yields an empty string.
pub fn extract_paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(p_sel) = Selector::parse("p") else {
        return String::new();
    };

    document
        .select(&p_sel)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
