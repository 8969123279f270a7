//! Configuration Record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 설정 엔트리 (원격 서버가 반환한 그대로 보관, pid 기준 정렬)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRecord {
    pub pid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_location: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ConfigurationRecord {
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            factory_pid: None,
            bundle_location: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn factory_pid(mut self, factory_pid: impl Into<String>) -> Self {
        self.factory_pid = Some(factory_pid.into());
        self
    }

    pub fn bundle_location(mut self, location: impl Into<String>) -> Self {
        self.bundle_location = Some(location.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
