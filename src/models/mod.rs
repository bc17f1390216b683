pub mod summary;
pub mod title;

pub use summary::{Histogram, PartitionSummary, Stats, SummaryReport};
pub use title::{ListParams, Projection, TitleFields, TitleInput, TitleQuery, TitleRecord};
