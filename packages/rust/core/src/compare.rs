//! Whole-document comparison.

use tracing::debug;

use copyscan_shared::FileComparison;
use copyscan_text::ratio;

/// Compare two extracted documents as whole character sequences.
///
/// No segmentation and no network: a single sequence-alignment pass over the
/// raw texts. Callers are expected to hand in already-extracted text.
pub fn compare_documents(
    file1_name: &str,
    text1: &str,
    file2_name: &str,
    text2: &str,
) -> FileComparison {
    let similarity = ratio(text1, text2);
    debug!(
        file1 = %file1_name,
        file2 = %file2_name,
        similarity,
        "documents compared"
    );

    FileComparison {
        similarity,
        file1_name: file1_name.to_string(),
        file2_name: file2_name.to_string(),
    }
}
