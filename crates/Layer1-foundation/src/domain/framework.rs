//! Framework Descriptor

use serde::{Deserialize, Serialize};

/// 원격 프레임워크 전체 상태
///
/// reload 또는 framework 변경 이벤트 시 통째로 교체됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkDescriptor {
    /// 프레임워크 버전
    pub version: String,
    /// 벤더
    #[serde(default)]
    pub vendor: String,
    /// 현재 start level
    pub start_level: u32,
    /// 새로 설치된 번들의 기본 start level
    #[serde(default = "default_bundle_start_level")]
    pub initial_bundle_start_level: u32,
}

fn default_bundle_start_level() -> u32 {
    1
}

impl FrameworkDescriptor {
    pub fn new(version: impl Into<String>, start_level: u32) -> Self {
        Self {
            version: version.into(),
            vendor: String::new(),
            start_level,
            initial_bundle_start_level: default_bundle_start_level(),
        }
    }

    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn initial_bundle_start_level(mut self, level: u32) -> Self {
        self.initial_bundle_start_level = level;
        self
    }
}
