//! Event Types - 원격 서버가 푸시하는 변경 알림
//!
//! 번들 / 서비스 / 프레임워크 세 종류의 알림을 정의합니다.

use crate::domain::{BundleRecord, FrameworkDescriptor, ServiceRecord};
use serde::{Deserialize, Serialize};

// ============================================================================
// Server Identity
// ============================================================================

/// 알림을 보낸 서버 식별자 (replica는 로깅에만 사용)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerIdentity {
    pub host: String,
    pub port: u16,
}

impl ServerIdentity {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl std::fmt::Display for ServerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Bundle Event
// ============================================================================

/// 번들 상태 변경 종류 (Uninstalled 제외)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BundleEventKind {
    Installed,
    Resolved,
    Unresolved,
    Started,
    Stopped,
    Updated,
}

/// 번들 변경 알림
///
/// 제거된 번들은 ID만, 그 외 전이는 새 상태의 레코드를 전달합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BundleEvent {
    Uninstalled { bundle_id: u64 },
    Changed {
        kind: BundleEventKind,
        bundle: BundleRecord,
    },
}

impl BundleEvent {
    pub fn uninstalled(bundle_id: u64) -> Self {
        Self::Uninstalled { bundle_id }
    }

    pub fn changed(kind: BundleEventKind, bundle: BundleRecord) -> Self {
        Self::Changed { kind, bundle }
    }

    /// 대상 번들 ID
    pub fn bundle_id(&self) -> u64 {
        match self {
            Self::Uninstalled { bundle_id } => *bundle_id,
            Self::Changed { bundle, .. } => bundle.id,
        }
    }
}

// ============================================================================
// Service Event
// ============================================================================

/// 서비스 변경 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceEventKind {
    Registered,
    Modified,
    Unregistering,
}

/// 서비스 변경 알림
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEvent {
    pub kind: ServiceEventKind,
    pub service: ServiceRecord,
}

impl ServiceEvent {
    pub fn new(kind: ServiceEventKind, service: ServiceRecord) -> Self {
        Self { kind, service }
    }

    pub fn registered(service: ServiceRecord) -> Self {
        Self::new(ServiceEventKind::Registered, service)
    }

    pub fn modified(service: ServiceRecord) -> Self {
        Self::new(ServiceEventKind::Modified, service)
    }

    pub fn unregistering(service: ServiceRecord) -> Self {
        Self::new(ServiceEventKind::Unregistering, service)
    }
}

// ============================================================================
// Framework Event
// ============================================================================

/// 프레임워크 상태 변경 알림
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkEvent {
    pub framework: FrameworkDescriptor,
}

impl FrameworkEvent {
    pub fn new(framework: FrameworkDescriptor) -> Self {
        Self { framework }
    }
}
