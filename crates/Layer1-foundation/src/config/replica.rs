//! Replica Config - state replica 동작 설정
//!
//! 글로벌(`<config_dir>/bundlescope/replica.json`) + 프로젝트
//! (`.bundlescope/replica.json`) 병합, 프로젝트 설정이 우선

use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};

/// 설정 파일명
pub const REPLICA_CONFIG_FILE: &str = "replica.json";

// ============================================================================
// Bundle Consistency
// ============================================================================

/// 번들 변경 이벤트 적용 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleConsistency {
    /// 변경마다 번들 목록 재정렬, 이름은 다른 번들이 더 이상 갖지 않을 때만 제거
    #[default]
    Strict,
    /// 재정렬 없이 뒤에 추가, uninstall 시 이름을 무조건 제거
    Legacy,
}

impl BundleConsistency {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

// ============================================================================
// Replica Config
// ============================================================================

/// State replica 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaConfig {
    /// reload 시 설정 엔트리 조회 필터 (None이면 전체)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_filter: Option<String>,

    /// 번들 이벤트 적용 방식
    #[serde(default)]
    pub bundle_consistency: BundleConsistency,

    /// 적용된 이벤트마다 trace 로그
    #[serde(default)]
    pub log_events: bool,
}

impl ReplicaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let global = JsonStore::global().ok();
        let project = JsonStore::current_project().ok();
        Self::load_layered(global.as_ref(), project.as_ref())
    }

    /// 글로벌 → 프로젝트 순서로 병합 (없는 계층은 건너뜀)
    pub fn load_layered(global: Option<&JsonStore>, project: Option<&JsonStore>) -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Some(global) = global {
            config.merge(Self::load_from(global)?);
        }

        // 2. 프로젝트 설정
        if let Some(project) = project {
            config.merge(Self::load_from(project)?);
        }

        Ok(config)
    }

    /// 지정 저장소에서 로드 (파일이 없으면 기본값)
    pub fn load_from(store: &JsonStore) -> Result<Self> {
        Ok(store
            .load_optional::<ReplicaConfig>(REPLICA_CONFIG_FILE)?
            .unwrap_or_default())
    }

    /// 지정 저장소에 저장
    pub fn save_to(&self, store: &JsonStore) -> Result<()> {
        store.save(REPLICA_CONFIG_FILE, self)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 기본값이 아닌 항목만 덮어씀)
    pub fn merge(&mut self, other: ReplicaConfig) {
        if other.configuration_filter.is_some() {
            self.configuration_filter = other.configuration_filter;
        }
        if other.bundle_consistency != BundleConsistency::default() {
            self.bundle_consistency = other.bundle_consistency;
        }
        if other.log_events {
            self.log_events = true;
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn configuration_filter(mut self, filter: impl Into<String>) -> Self {
        self.configuration_filter = Some(filter.into());
        self
    }

    pub fn bundle_consistency(mut self, consistency: BundleConsistency) -> Self {
        self.bundle_consistency = consistency;
        self
    }

    pub fn log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }
}
