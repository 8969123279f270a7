//! Config - 설정 관리
//!
//! - `replica.rs` - ReplicaConfig (reload 필터, 번들 이벤트 적용 방식)

mod replica;

pub use replica::{BundleConsistency, ReplicaConfig, REPLICA_CONFIG_FILE};
