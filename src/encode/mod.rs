//! Card encoding into distributable image bytes.

mod png;

pub use png::{ARTIFACT_EXTENSION, encode_png};
