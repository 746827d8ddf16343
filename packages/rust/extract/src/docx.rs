//! DOCX body text extraction.
//!
//! A `.docx` file is a zip archive whose body lives in `word/document.xml`.
//! We pull the text runs (`<w:t>`) out of each paragraph (`<w:p>`) and join
//! paragraphs with newlines, mirroring how the body text reads.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;

use copyscan_shared::{CopyscanError, Result};

/// A paragraph element, either self-closing (empty) or with a body.
static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>(.*?)</w:p>").expect("valid regex")
});

/// A text run inside a paragraph. Runs never contain markup.
static RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").expect("valid regex"));

pub(crate) fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| CopyscanError::extraction(format!("not a valid docx archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| CopyscanError::extraction(format!("docx has no document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| CopyscanError::extraction(format!("failed to read document body: {e}")))?;

    Ok(paragraph_text(&xml))
}

/// Concatenate each paragraph's run text; paragraphs join with newlines and
/// empty paragraphs are kept as blank lines.
fn paragraph_text(xml: &str) -> String {
    let mut paragraphs = Vec::new();
    for paragraph in PARAGRAPH_RE.captures_iter(xml) {
        let text = match paragraph.get(1) {
            Some(body) => RUN_RE
                .captures_iter(body.as_str())
                .map(|run| unescape_xml(&run[1]))
                .collect::<String>(),
            None => String::new(),
        };
        paragraphs.push(text);
    }
    paragraphs.join("\n")
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
