//! Submission model: the wire payload and the validated render job built from it.

mod model;

pub use model::{RenderJob, Submission};
