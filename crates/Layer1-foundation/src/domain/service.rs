//! Service / Service Class Records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 서비스 클래스 레코드 - (클래스 이름, 서비스) 쌍
///
/// 정렬 순서: 클래스 이름, 그 다음 서비스 ID
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceClassRecord {
    /// 등록된 클래스(인터페이스) 이름
    pub class_name: String,
    /// 이 클래스로 등록한 서비스 ID
    pub service_id: u64,
}

impl ServiceClassRecord {
    pub fn new(class_name: impl Into<String>, service_id: u64) -> Self {
        Self {
            class_name: class_name.into(),
            service_id,
        }
    }
}

/// 서비스 레코드
///
/// 정확히 하나의 번들(`bundle_id`)이 등록합니다. 정렬 순서는 id 우선.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// 서비스 ID (고유)
    pub id: u64,
    /// 등록한 번들 ID
    pub bundle_id: u64,
    /// 이 서비스가 노출하는 클래스들
    #[serde(default)]
    pub registered_classes: Vec<ServiceClassRecord>,
    /// 서비스 속성
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ServiceRecord {
    pub fn new(id: u64, bundle_id: u64) -> Self {
        Self {
            id,
            bundle_id,
            registered_classes: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// 클래스 이름 추가 (service_id는 자동으로 이 서비스 ID)
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.registered_classes
            .push(ServiceClassRecord::new(class_name, self.id));
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// 클래스 이름으로 등록되어 있는지 확인
    pub fn provides(&self, class_name: &str) -> bool {
        self.registered_classes
            .iter()
            .any(|c| c.class_name == class_name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.registered_classes.iter().map(|c| c.class_name.as_str())
    }
}
