mod snapshot;
pub use snapshot::{ClusterSnapshot, Health, MemStats, NodeSnapshot};
