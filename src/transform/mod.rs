//! Row transformation: grouping, timeline enrichment, and pipelines.

pub mod grouper;
pub mod pipeline;
pub mod timeline;

pub use grouper::{group_amendments, group_rows};
pub use timeline::{amendment_visible, build_records, enrich, summarize, QualityReport};
