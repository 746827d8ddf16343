//! Web-search source lookup.
//!
//! For each sentence the pipeline asks a search results page for the
//! top-ranked candidate source. Lookup is best-effort: any network, HTTP,
//! or parse failure means "no source found" rather than a pipeline error,
//! so one flaky lookup never sinks a whole check.

mod parser;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use copyscan_shared::{CopyscanError, Result, SearchConfig};

/// Maximum number of redirects to follow on a lookup request.
const MAX_REDIRECTS: usize = 5;

/// Browser User-Agent. The results page serves the full result markup only
/// to browser-identified clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// ---------------------------------------------------------------------------
// SearchClient
// ---------------------------------------------------------------------------

/// Client for looking up the likeliest web source of a sentence.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: String,
    denied_domains: Vec<String>,
}

impl SearchClient {
    /// Create a new lookup client from runtime configuration.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CopyscanError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            denied_domains: config.denied_domains.clone(),
        })
    }

    /// Look up the top-ranked source URL for `sentence`.
    ///
    /// Returns `None` when the search fails, yields no results, or its top
    /// result sits on a denied domain. Lower-ranked results are never
    /// substituted for a denied top result.
    pub async fn find_source(&self, sentence: &str) -> Option<String> {
        let query = build_query(sentence);
        let target = format!("{}/search?q={query}", self.endpoint);
        debug!(url = %target, "searching for source");

        let response = match self.client.get(&target).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "search request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "search returned non-success status");
            return None;
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "failed to read search response body");
                return None;
            }
        };

        let candidates = match parser::parse_search_html(&html) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "failed to parse search results");
                return None;
            }
        };

        let first = candidates.into_iter().next()?;
        if host_is_denied(&first, &self.denied_domains) {
            debug!(url = %first, "top result is on a denied domain");
            return None;
        }

        debug!(source = %first, "source found");
        Some(first)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Join whitespace-separated sentence tokens with `+` for the query string.
fn build_query(sentence: &str) -> String {
    sentence.split_whitespace().collect::<Vec<_>>().join("+")
}

/// True if the URL's host is a denied domain or one of its subdomains.
/// URLs without a parseable host are never denied.
fn host_is_denied(url: &str, denied_domains: &[String]) -> bool {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
    else {
        return false;
    };

    denied_domains.iter().any(|domain| {
        let domain = domain.to_lowercase();
        host == domain || host.ends_with(&format!(".{domain}"))
    })
}
