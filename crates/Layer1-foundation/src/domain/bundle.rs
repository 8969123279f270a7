//! Bundle Record

use super::ServiceRecord;
use serde::{Deserialize, Serialize};

/// 번들 lifecycle 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BundleState {
    Uninstalled,
    Installed,
    Resolved,
    Starting,
    Stopping,
    Active,
}

impl BundleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninstalled => "UNINSTALLED",
            Self::Installed => "INSTALLED",
            Self::Resolved => "RESOLVED",
            Self::Starting => "STARTING",
            Self::Stopping => "STOPPING",
            Self::Active => "ACTIVE",
        }
    }
}

impl std::fmt::Display for BundleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 번들 레코드
///
/// `id`는 고유, `symbolic_name`은 여러 번들이 공유할 수 있습니다.
/// 정렬 순서는 id 우선 (필드 선언 순서를 따르는 derive).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleRecord {
    /// 번들 ID (고유)
    pub id: u64,
    /// Symbolic name
    pub symbolic_name: String,
    /// 번들 버전
    #[serde(default)]
    pub version: String,
    /// Lifecycle 상태
    pub state: BundleState,
    /// 설치 위치
    #[serde(default)]
    pub location: String,
    /// 현재 등록한 서비스들
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
}

impl BundleRecord {
    pub fn new(id: u64, symbolic_name: impl Into<String>, state: BundleState) -> Self {
        Self {
            id,
            symbolic_name: symbolic_name.into(),
            version: String::new(),
            state,
            location: String::new(),
            services: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_service(mut self, service: ServiceRecord) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_services(mut self, services: Vec<ServiceRecord>) -> Self {
        self.services.extend(services);
        self
    }

    /// 활성 상태 여부
    pub fn is_active(&self) -> bool {
        self.state == BundleState::Active
    }
}
