//! Search results page parsing.

use scraper::{Html, Selector};

use copyscan_shared::{CopyscanError, Result};

/// Extract candidate source URLs from a search results page, in rank order.
///
/// Each organic result is a `div.yuRUbf` container whose first `a[href]`
/// links to the source page. Containers without a link are skipped.
pub(crate) fn parse_search_html(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse("div.yuRUbf")
        .map_err(|e| CopyscanError::internal(format!("invalid result selector: {e:?}")))?;
    let link_sel = Selector::parse("a[href]")
        .map_err(|e| CopyscanError::internal(format!("invalid link selector: {e:?}")))?;

    let mut candidates = Vec::new();
    for container in document.select(&result_sel) {
        let Some(anchor) = container.select(&link_sel).next() else {
            continue;
        };
        if let Some(href) = anchor.value().attr("href") {
            candidates.push(href.to_string());
        }
    }

    tracing::debug!(count = candidates.len(), "search results parsed");
    Ok(candidates)
}
