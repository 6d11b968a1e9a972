pub mod sparse;
pub mod stats;

pub use sparse::SparseVec;
pub use stats::SummaryStats;
