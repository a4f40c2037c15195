//! Discovery and classification of per-sample result files.

pub mod classify;
pub mod discovery;
pub mod index;

pub use classify::SampleFile;
pub use index::SampleIndex;
pub use index::TypeGroups;
