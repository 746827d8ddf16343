//! Core orchestration for copyscan.
//!
//! Ties segmentation, source lookup, fetching, and scoring into the
//! end-to-end plagiarism check, plus the whole-document comparison op.

pub mod compare;
pub mod pipeline;
pub mod pool;
