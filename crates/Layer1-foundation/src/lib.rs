//! # scope-foundation
//!
//! Foundation layer for BundleScope:
//! - Domain: 원격 프레임워크 레코드 (Framework, Bundle, Service, Configuration)
//! - Event: 원격 변경 알림 타입 + replica 리스너 레지스트리
//! - Config: ReplicaConfig (JSON 설정, 글로벌 + 프로젝트 병합)
//! - Storage: JsonStore (설정 파일)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Layer2-core                                            │
//! │  ├── RemoteClient trait (원격 서버 연동 경계)            │
//! │  └── ServerState (state replica)                        │
//! ├─────────────────────────────────────────────────────────┤
//! │  Layer1-foundation (이 레이어)                          │
//! │  ├── Domain records                                    │
//! │  ├── Remote events + ListenerRegistry                  │
//! │  └── Error / Config / JsonStore                        │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod event;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Domain (원격 상태 레코드)
// ============================================================================
pub use domain::{
    BundleRecord, BundleState, ConfigurationRecord, FrameworkDescriptor, ServiceClassRecord,
    ServiceRecord,
};

// ============================================================================
// Event (알림 + 리스너)
// ============================================================================
pub use event::{
    // Remote events
    BundleEvent,
    BundleEventKind,
    FrameworkEvent,
    ServerIdentity,
    ServiceEvent,
    ServiceEventKind,
    // Listener registry
    FnListener,
    ListenerId,
    ListenerRegistry,
    StateListener,
};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{BundleConsistency, ReplicaConfig, REPLICA_CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;
