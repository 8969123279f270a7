//! Replica State - 원격 상태의 한 세대(generation)
//!
//! 기본 컬렉션(번들, 서비스, 설정)과 파생 컬렉션(번들 맵, 이름 집합,
//! 서비스 클래스 목록/이름 집합)을 함께 보관하고, 변경 시 불변식을 유지합니다.
//!
//! - 번들 맵과 번들 목록은 같은 id 집합
//! - 이름 집합의 이름은 해당 이름을 가진 현재 레코드가 있을 때만 존재
//! - 목록은 레코드의 `Ord` 순서 (Legacy 모드의 번들 목록 제외)
//!
//! 잠금은 상위 `ServerState`가 담당합니다. 이 모듈은 순수 데이터 연산만 합니다.

use scope_foundation::{
    BundleConsistency, BundleEvent, BundleRecord, BundleState, ConfigurationRecord,
    FrameworkDescriptor, ServiceClassRecord, ServiceEvent, ServiceEventKind, ServiceRecord,
};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

// ============================================================================
// ReplicaSnapshot - 외부 공개용 복사본
// ============================================================================

/// 한 번의 잠금으로 복사한 전체 상태
///
/// 여러 컬렉션을 서로 일관된 시점으로 읽어야 할 때 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaSnapshot {
    pub framework: FrameworkDescriptor,
    pub bundles: Vec<BundleRecord>,
    pub bundle_map: HashMap<u64, BundleRecord>,
    pub bundle_names: Vec<String>,
    pub services: Vec<ServiceRecord>,
    pub service_classes: Vec<ServiceClassRecord>,
    pub service_class_names: Vec<String>,
    pub configurations: Vec<ConfigurationRecord>,
}

// ============================================================================
// ReplicaState
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct ReplicaState {
    framework: FrameworkDescriptor,
    bundles: Vec<BundleRecord>,
    bundle_map: HashMap<u64, BundleRecord>,
    bundle_names: BTreeSet<String>,
    services: Vec<ServiceRecord>,
    service_classes: Vec<ServiceClassRecord>,
    service_class_names: BTreeSet<String>,
    configurations: Vec<ConfigurationRecord>,
}

impl ReplicaState {
    /// 조회 결과로 새 세대 구성
    ///
    /// 서비스는 번들 순서대로, 번들 안에서는 등록 순서대로 펼친 뒤 정렬합니다.
    /// 같은 id의 번들이 여러 번 오면 마지막 레코드를 사용합니다.
    pub(crate) fn build(
        framework: FrameworkDescriptor,
        fetched_bundles: Vec<BundleRecord>,
        mut configurations: Vec<ConfigurationRecord>,
    ) -> Self {
        let mut bundle_map: HashMap<u64, BundleRecord> = HashMap::with_capacity(fetched_bundles.len());
        let mut order: Vec<u64> = Vec::with_capacity(fetched_bundles.len());

        for bundle in fetched_bundles {
            let id = bundle.id;
            if bundle_map.insert(id, bundle).is_some() {
                warn!(bundle_id = id, "Duplicate bundle id in reload, keeping the last record");
            } else {
                order.push(id);
            }
        }

        let mut bundles: Vec<BundleRecord> = order
            .iter()
            .filter_map(|id| bundle_map.get(id).cloned())
            .collect();

        let mut bundle_names = BTreeSet::new();
        let mut services = Vec::new();
        let mut service_classes = Vec::new();
        let mut service_class_names = BTreeSet::new();

        for bundle in &bundles {
            bundle_names.insert(bundle.symbolic_name.clone());

            for service in &bundle.services {
                services.push(service.clone());
                for class in &service.registered_classes {
                    service_classes.push(class.clone());
                    service_class_names.insert(class.class_name.clone());
                }
            }
        }

        bundles.sort();
        services.sort();
        service_classes.sort();
        configurations.sort();

        Self {
            framework,
            bundles,
            bundle_map,
            bundle_names,
            services,
            service_classes,
            service_class_names,
            configurations,
        }
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub(crate) fn framework(&self) -> &FrameworkDescriptor {
        &self.framework
    }

    pub(crate) fn bundle(&self, id: u64) -> Option<&BundleRecord> {
        self.bundle_map.get(&id)
    }

    pub(crate) fn bundles(&self) -> &[BundleRecord] {
        &self.bundles
    }

    pub(crate) fn bundle_map(&self) -> &HashMap<u64, BundleRecord> {
        &self.bundle_map
    }

    pub(crate) fn bundle_names(&self) -> Vec<String> {
        self.bundle_names.iter().cloned().collect()
    }

    /// 지정 상태 중 하나에 있는 번들의 이름 (정렬, 중복 없음)
    ///
    /// 빈 필터는 전체 번들과 같습니다.
    pub(crate) fn bundle_names_in_states(&self, states: &[BundleState]) -> Vec<String> {
        if states.is_empty() {
            return self.bundle_names();
        }

        self.bundles
            .iter()
            .filter(|b| states.contains(&b.state))
            .map(|b| b.symbolic_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub(crate) fn bundles_named(&self, name: &str) -> Vec<BundleRecord> {
        let mut bundles: Vec<BundleRecord> = self
            .bundles
            .iter()
            .filter(|b| b.symbolic_name == name)
            .cloned()
            .collect();
        bundles.sort();
        bundles
    }

    pub(crate) fn services(&self) -> &[ServiceRecord] {
        &self.services
    }

    pub(crate) fn services_by_class(&self, class_name: &str) -> Vec<ServiceRecord> {
        self.services
            .iter()
            .filter(|s| s.provides(class_name))
            .cloned()
            .collect()
    }

    pub(crate) fn services_of_bundle(&self, bundle_id: u64) -> Vec<ServiceRecord> {
        self.services
            .iter()
            .filter(|s| s.bundle_id == bundle_id)
            .cloned()
            .collect()
    }

    pub(crate) fn service_classes(&self) -> &[ServiceClassRecord] {
        &self.service_classes
    }

    pub(crate) fn service_class_names(&self) -> Vec<String> {
        self.service_class_names.iter().cloned().collect()
    }

    pub(crate) fn configurations(&self) -> &[ConfigurationRecord] {
        &self.configurations
    }

    pub(crate) fn counts(&self) -> (usize, usize, usize) {
        (
            self.bundles.len(),
            self.services.len(),
            self.configurations.len(),
        )
    }

    pub(crate) fn snapshot(&self) -> ReplicaSnapshot {
        ReplicaSnapshot {
            framework: self.framework.clone(),
            bundles: self.bundles.clone(),
            bundle_map: self.bundle_map.clone(),
            bundle_names: self.bundle_names(),
            services: self.services.clone(),
            service_classes: self.service_classes.clone(),
            service_class_names: self.service_class_names(),
            configurations: self.configurations.clone(),
        }
    }

    // ========================================================================
    // 번들 변경
    // ========================================================================

    pub(crate) fn apply_bundle_event(&mut self, event: &BundleEvent, consistency: BundleConsistency) {
        match event {
            BundleEvent::Uninstalled { bundle_id } => {
                if let Some(removed) = self.bundle_map.remove(bundle_id) {
                    self.bundles.retain(|b| b.id != removed.id);

                    match consistency {
                        BundleConsistency::Strict => self.release_bundle_name(&removed.symbolic_name),
                        BundleConsistency::Legacy => {
                            self.bundle_names.remove(&removed.symbolic_name);
                        }
                    }
                }
            }
            BundleEvent::Changed { bundle, .. } => {
                let previous = self.bundle_map.remove(&bundle.id);
                if previous.is_some() {
                    self.bundles.retain(|b| b.id != bundle.id);
                }

                self.bundle_map.insert(bundle.id, bundle.clone());
                match consistency {
                    BundleConsistency::Strict => {
                        let index = self
                            .bundles
                            .binary_search(bundle)
                            .unwrap_or_else(|index| index);
                        self.bundles.insert(index, bundle.clone());
                    }
                    BundleConsistency::Legacy => self.bundles.push(bundle.clone()),
                }
                self.bundle_names.insert(bundle.symbolic_name.clone());

                // 이름이 바뀐 경우 이전 이름 정리 (Legacy는 유지)
                if let (BundleConsistency::Strict, Some(previous)) = (consistency, previous) {
                    if previous.symbolic_name != bundle.symbolic_name {
                        self.release_bundle_name(&previous.symbolic_name);
                    }
                }
            }
        }
    }

    /// 남은 번들 중 같은 이름이 없을 때만 이름 제거
    fn release_bundle_name(&mut self, name: &str) {
        if !self.bundles.iter().any(|b| b.symbolic_name == name) {
            self.bundle_names.remove(name);
        }
    }

    // ========================================================================
    // 서비스 변경
    // ========================================================================

    pub(crate) fn apply_service_event(&mut self, event: &ServiceEvent) {
        let service = &event.service;

        match event.kind {
            ServiceEventKind::Registered => {
                // 같은 id가 이미 있으면 교체로 처리
                if let Some(stale) = self.services.iter().find(|s| s.id == service.id).cloned() {
                    self.unregister(&stale);
                }
                self.register(service);
            }
            ServiceEventKind::Modified => {
                // 클래스 목록은 등록 시점에 고정, 속성 등 payload만 교체
                if let Some(stored) = self.services.iter_mut().find(|s| s.id == service.id) {
                    stored.properties = service.properties.clone();
                }
                return;
            }
            ServiceEventKind::Unregistering => {
                // 클래스 목록은 저장된 레코드 기준 (모르는 id면 payload 사용)
                let stored = self.services.iter().find(|s| s.id == service.id).cloned();
                self.unregister(stored.as_ref().unwrap_or(service));
            }
        }

        self.services.sort();
        self.service_classes.sort();
    }

    fn register(&mut self, service: &ServiceRecord) {
        self.services.push(service.clone());
        for class in &service.registered_classes {
            self.service_classes.push(class.clone());
            self.service_class_names.insert(class.class_name.clone());
        }
    }

    fn unregister(&mut self, service: &ServiceRecord) {
        self.services.retain(|s| s.id != service.id);

        let mut released: BTreeSet<String> = service.class_names().map(String::from).collect();
        self.service_classes.retain(|c| {
            if c.service_id == service.id {
                released.insert(c.class_name.clone());
                false
            } else {
                true
            }
        });

        for name in released {
            if !self.service_classes.iter().any(|c| c.class_name == name) {
                self.service_class_names.remove(&name);
            }
        }
    }

    // ========================================================================
    // 프레임워크 변경
    // ========================================================================

    pub(crate) fn set_framework(&mut self, framework: FrameworkDescriptor) {
        self.framework = framework;
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scope_foundation::BundleEventKind;

    fn bundle(id: u64, name: &str) -> BundleRecord {
        BundleRecord::new(id, name, BundleState::Active)
    }

    fn state_with(bundles: Vec<BundleRecord>) -> ReplicaState {
        ReplicaState::build(FrameworkDescriptor::new("1.0", 1), bundles, Vec::new())
    }

    fn changed(record: BundleRecord) -> BundleEvent {
        BundleEvent::changed(BundleEventKind::Updated, record)
    }

    fn assert_map_matches_list(state: &ReplicaState) {
        let mut list_ids: Vec<u64> = state.bundles().iter().map(|b| b.id).collect();
        let mut map_ids: Vec<u64> = state.bundle_map().keys().copied().collect();
        list_ids.sort();
        map_ids.sort();
        assert_eq!(list_ids, map_ids);
    }

    #[test]
    fn test_build_flattens_and_sorts() {
        let state = ReplicaState::build(
            FrameworkDescriptor::new("1.0", 3),
            vec![
                bundle(5, "zeta").with_service(ServiceRecord::new(20, 5).with_class("b.Api")),
                bundle(2, "alpha")
                    .with_service(ServiceRecord::new(11, 2).with_class("a.Api").with_class("b.Api")),
            ],
            vec![ConfigurationRecord::new("z.pid"), ConfigurationRecord::new("a.pid")],
        );

        let ids: Vec<u64> = state.bundles().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(state.bundle_names(), vec!["alpha", "zeta"]);

        let service_ids: Vec<u64> = state.services().iter().map(|s| s.id).collect();
        assert_eq!(service_ids, vec![11, 20]);
        assert_eq!(state.service_classes().len(), 3);
        assert_eq!(state.service_class_names(), vec!["a.Api", "b.Api"]);
        assert_eq!(state.configurations()[0].pid, "a.pid");
        assert_map_matches_list(&state);
    }

    #[test]
    fn test_build_collapses_duplicate_ids() {
        let state = state_with(vec![bundle(1, "old"), bundle(1, "new")]);

        assert_eq!(state.bundles().len(), 1);
        assert_eq!(state.bundle(1).unwrap().symbolic_name, "new");
        assert_eq!(state.bundle_names(), vec!["new"]);
    }

    #[test]
    fn test_strict_uninstall_keeps_shared_name() {
        let mut state = state_with(vec![bundle(1, "shared"), bundle(2, "shared")]);

        state.apply_bundle_event(&BundleEvent::uninstalled(1), BundleConsistency::Strict);
        assert_eq!(state.bundle_names(), vec!["shared"]);

        state.apply_bundle_event(&BundleEvent::uninstalled(2), BundleConsistency::Strict);
        assert!(state.bundle_names().is_empty());
        assert_map_matches_list(&state);
    }

    #[test]
    fn test_legacy_uninstall_drops_shared_name() {
        let mut state = state_with(vec![bundle(1, "shared"), bundle(2, "shared")]);

        state.apply_bundle_event(&BundleEvent::uninstalled(1), BundleConsistency::Legacy);

        assert!(state.bundle_names().is_empty());
        assert_eq!(state.bundles().len(), 1);
    }

    #[test]
    fn test_strict_change_keeps_bundles_sorted() {
        let mut state = state_with(vec![bundle(1, "a"), bundle(5, "e")]);

        state.apply_bundle_event(&changed(bundle(3, "c")), BundleConsistency::Strict);

        let ids: Vec<u64> = state.bundles().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_legacy_change_appends() {
        let mut state = state_with(vec![bundle(1, "a"), bundle(5, "e")]);

        state.apply_bundle_event(&changed(bundle(3, "c")), BundleConsistency::Legacy);

        let ids: Vec<u64> = state.bundles().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 5, 3]);
        assert_eq!(state.bundle_names(), vec!["a", "c", "e"]);
    }

    #[test]
    fn test_rename_releases_old_name_only_in_strict() {
        let mut strict = state_with(vec![bundle(1, "before")]);
        strict.apply_bundle_event(&changed(bundle(1, "after")), BundleConsistency::Strict);
        assert_eq!(strict.bundle_names(), vec!["after"]);

        let mut legacy = state_with(vec![bundle(1, "before")]);
        legacy.apply_bundle_event(&changed(bundle(1, "after")), BundleConsistency::Legacy);
        assert_eq!(legacy.bundle_names(), vec!["after", "before"]);
    }

    #[test]
    fn test_duplicate_register_replaces_service() {
        let mut state = state_with(vec![bundle(1, "a")]);
        let first = ServiceRecord::new(7, 1).with_class("x.Old");
        let second = ServiceRecord::new(7, 1).with_class("x.New");

        state.apply_service_event(&ServiceEvent::registered(first));
        state.apply_service_event(&ServiceEvent::registered(second));

        assert_eq!(state.services().len(), 1);
        assert_eq!(state.service_classes(), &[ServiceClassRecord::new("x.New", 7)]);
        assert_eq!(state.service_class_names(), vec!["x.New"]);
    }

    #[test]
    fn test_modified_updates_properties_only() {
        let mut state = state_with(vec![bundle(1, "a")]);
        state.apply_service_event(&ServiceEvent::registered(
            ServiceRecord::new(7, 1).with_class("x.Api"),
        ));

        let modified = ServiceRecord::new(7, 1)
            .with_class("x.Ignored")
            .with_property("ranking", "10");
        state.apply_service_event(&ServiceEvent::modified(modified));

        let stored = &state.services()[0];
        assert_eq!(stored.properties.get("ranking").map(String::as_str), Some("10"));
        assert_eq!(state.service_class_names(), vec!["x.Api"]);
    }

    #[test]
    fn test_unregister_uses_stored_class_list() {
        let mut state = state_with(vec![
            bundle(1, "a").with_service(ServiceRecord::new(3, 1).with_class("A")),
        ]);
        state.apply_service_event(&ServiceEvent::registered(
            ServiceRecord::new(7, 1).with_class("A").with_class("B"),
        ));

        // 해제 알림의 클래스 목록이 비어 있어도 등록된 클래스가 모두 정리됨
        state.apply_service_event(&ServiceEvent::unregistering(ServiceRecord::new(7, 1)));

        let ids: Vec<u64> = state.services().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(state.service_classes(), &[ServiceClassRecord::new("A", 3)]);
        assert_eq!(state.service_class_names(), vec!["A"]);
    }

    #[test]
    fn test_unregister_with_partial_payload_releases_all_names() {
        let mut state = state_with(vec![bundle(1, "a")]);
        state.apply_service_event(&ServiceEvent::registered(
            ServiceRecord::new(7, 1).with_class("A").with_class("B"),
        ));

        state.apply_service_event(&ServiceEvent::unregistering(
            ServiceRecord::new(7, 1).with_class("A"),
        ));

        assert!(state.services().is_empty());
        assert!(state.service_classes().is_empty());
        assert!(state.service_class_names().is_empty());
    }

    #[test]
    fn test_unregister_unknown_service_is_noop() {
        let mut state = state_with(vec![
            bundle(1, "a").with_service(ServiceRecord::new(3, 1).with_class("x.Api")),
        ]);

        state.apply_service_event(&ServiceEvent::unregistering(
            ServiceRecord::new(99, 1).with_class("y.Api"),
        ));

        assert_eq!(state.services().len(), 1);
        assert_eq!(state.service_class_names(), vec!["x.Api"]);
    }

    #[test]
    fn test_bundle_names_in_states() {
        let state = state_with(vec![
            BundleRecord::new(1, "core", BundleState::Active),
            BundleRecord::new(2, "core", BundleState::Active),
            BundleRecord::new(3, "api", BundleState::Resolved),
            BundleRecord::new(4, "tools", BundleState::Installed),
        ]);

        assert_eq!(
            state.bundle_names_in_states(&[BundleState::Active]),
            vec!["core"]
        );
        assert_eq!(
            state.bundle_names_in_states(&[BundleState::Installed, BundleState::Resolved]),
            vec!["api", "tools"]
        );
        assert_eq!(
            state.bundle_names_in_states(&[]),
            vec!["api", "core", "tools"]
        );
        assert!(state
            .bundle_names_in_states(&[BundleState::Stopping])
            .is_empty());
    }

    #[test]
    fn test_query_helpers() {
        let state = state_with(vec![
            bundle(1, "a")
                .with_service(ServiceRecord::new(10, 1).with_class("x.Api"))
                .with_service(ServiceRecord::new(11, 1).with_class("y.Api")),
            bundle(2, "a").with_service(ServiceRecord::new(20, 2).with_class("x.Api")),
        ]);

        assert_eq!(state.bundles_named("a").len(), 2);
        assert!(state.bundles_named("missing").is_empty());

        let providers: Vec<u64> = state.services_by_class("x.Api").iter().map(|s| s.id).collect();
        assert_eq!(providers, vec![10, 20]);

        let owned: Vec<u64> = state.services_of_bundle(1).iter().map(|s| s.id).collect();
        assert_eq!(owned, vec![10, 11]);
    }
}
