//! Pure text operations for copyscan.
//!
//! Normalization, sentence segmentation, bag-of-words cosine similarity, and
//! the whole-document sequence-alignment ratio. Everything in this crate is
//! deterministic and does no I/O.

mod normalize;
mod ratio;
mod segment;
mod similarity;

pub use normalize::normalize;
pub use ratio::ratio;
pub use segment::SentenceSegmenter;
pub use similarity::similarity;
