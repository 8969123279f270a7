//! Server State - 원격 서버 상태 replica
//!
//! ## 잠금 구조
//!
//! ```text
//! reload / apply_*  ──▶ writer (Mutex)      쓰기 작업을 한 번에 하나씩 직렬화
//!                        │
//!                        ▼
//!                       state (RwLock)      교체/변경 순간에만 write
//!                        ▲
//! 조회 accessor ─────────┘ read             복사하는 동안만 read
//!
//! listeners (자체 Mutex)                     상태 잠금 해제 후 알림
//! ```
//!
//! reload의 원격 조회는 writer만 잡은 상태에서 수행하므로, 조회 중에도
//! reader는 이전 세대를 계속 읽습니다. reload 중 도착한 이벤트는 writer를
//! 기다렸다가 새 세대 위에 적용됩니다.

use super::replica::{ReplicaSnapshot, ReplicaState};
use crate::remote::{RemoteClient, RemoteEventListener};
use parking_lot::{Mutex, RwLock};
use scope_foundation::{
    BundleEvent, BundleRecord, BundleState, ConfigurationRecord, Error, FrameworkDescriptor,
    FrameworkEvent, ListenerId, ListenerRegistry, ReplicaConfig, Result, ServerIdentity,
    ServiceClassRecord, ServiceEvent, ServiceRecord, StateListener,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace, warn};

/// 원격 서버 상태 replica
///
/// 생성 시 `RemoteClient`에 한 번 구독하고, 첫 `reload()` 이후부터 조회와
/// 이벤트 적용이 가능합니다. 모든 조회는 독립된 복사본을 반환합니다.
///
/// ```ignore
/// let state = ServerState::new(client);
/// state.reload()?;
///
/// state.add_listener(Arc::new(FnListener::new("ui", || Ok(()))));
/// let names = state.bundle_names()?;
/// ```
pub struct ServerState {
    /// 원격 서버 클라이언트
    client: Arc<dyn RemoteClient>,

    /// 동작 설정
    config: ReplicaConfig,

    /// reload / 이벤트 적용 직렬화
    writer: Mutex<()>,

    /// 현재 세대 (첫 reload 전에는 None)
    state: RwLock<Option<ReplicaState>>,

    /// 커밋된 변경 수 (reload + 적용된 이벤트)
    generation: AtomicU64,

    /// 상태 변경 리스너
    listeners: ListenerRegistry,
}

impl ServerState {
    /// 기본 설정으로 생성 후 클라이언트에 구독
    pub fn new(client: Arc<dyn RemoteClient>) -> Arc<Self> {
        Self::with_config(client, ReplicaConfig::default())
    }

    /// 사용자 설정으로 생성 후 클라이언트에 구독
    pub fn with_config(client: Arc<dyn RemoteClient>, config: ReplicaConfig) -> Arc<Self> {
        let state = Arc::new(Self {
            client,
            config,
            writer: Mutex::new(()),
            state: RwLock::new(None),
            generation: AtomicU64::new(0),
            listeners: ListenerRegistry::new(),
        });

        let weak: Weak<ServerState> = Arc::downgrade(&state);
        let listener: Weak<dyn RemoteEventListener> = weak;
        state.client.subscribe(listener);

        debug!(
            bundle_consistency = ?state.config.bundle_consistency,
            "Server state created"
        );

        state
    }

    pub fn config(&self) -> &ReplicaConfig {
        &self.config
    }

    // ========================================================================
    // Reload
    // ========================================================================

    /// 원격 서버에서 전체 상태를 동기적으로 다시 로드
    ///
    /// 실패 시 클라이언트 에러(`Connect`, `NotConnected`, `Remote`)를 그대로
    /// 반환하며, 이전에 로드된 상태는 그대로 유지됩니다.
    pub fn reload(&self) -> Result<()> {
        let counts = {
            let _writer = self.writer.lock();

            let fresh = match self.fetch() {
                Ok(fresh) => fresh,
                Err(e) => {
                    warn!(error = %e, "Server state reload failed");
                    return Err(e);
                }
            };

            let counts = fresh.counts();
            *self.state.write() = Some(fresh);
            self.generation.fetch_add(1, Ordering::SeqCst);
            counts
        };

        let (bundles, services, configurations) = counts;
        info!(
            bundles,
            services,
            configurations,
            generation = self.generation(),
            "Server state reloaded"
        );

        self.listeners.notify();
        Ok(())
    }

    fn fetch(&self) -> Result<ReplicaState> {
        let framework = self.client.framework()?;
        let bundles = self.client.all_bundles()?;
        let configurations = self
            .client
            .configurations(self.config.configuration_filter.as_deref())?;

        Ok(ReplicaState::build(framework, bundles, configurations))
    }

    // ========================================================================
    // 이벤트 적용
    // ========================================================================

    /// 번들 변경 적용 (첫 reload 전이면 무시하고 false)
    pub fn apply_bundle_event(&self, event: &BundleEvent) -> bool {
        let consistency = self.config.bundle_consistency;
        self.commit("bundle", |state| {
            state.apply_bundle_event(event, consistency);
        })
    }

    /// 서비스 변경 적용 (첫 reload 전이면 무시하고 false)
    pub fn apply_service_event(&self, event: &ServiceEvent) -> bool {
        self.commit("service", |state| state.apply_service_event(event))
    }

    /// 프레임워크 변경 적용 (첫 reload 전이면 무시하고 false)
    ///
    /// 번들/서비스 이벤트와 같은 규칙으로 첫 reload 전에는 적용하지 않고
    /// 리스너에도 알리지 않습니다. 이 시점의 프레임워크 상태는 첫 reload가
    /// 통째로 다시 가져옵니다.
    pub fn apply_framework_event(&self, event: &FrameworkEvent) -> bool {
        self.commit("framework", |state| {
            state.set_framework(event.framework.clone());
        })
    }

    /// writer 잠금 아래에서 변경을 적용하고, 잠금 해제 후 리스너 알림
    fn commit<F>(&self, kind: &'static str, apply: F) -> bool
    where
        F: FnOnce(&mut ReplicaState),
    {
        {
            let _writer = self.writer.lock();
            let mut guard = self.state.write();

            let Some(state) = guard.as_mut() else {
                debug!(event = kind, "Ignoring event before first reload");
                return false;
            };

            apply(state);
            self.generation.fetch_add(1, Ordering::SeqCst);
        }

        self.listeners.notify();
        true
    }

    // ========================================================================
    // 리스너
    // ========================================================================

    /// 리스너 등록
    pub fn add_listener(&self, listener: Arc<dyn StateListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    /// 리스너 해제
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// 등록된 리스너 수
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 첫 reload 성공 여부
    pub fn is_loaded(&self) -> bool {
        self.state.read().is_some()
    }

    /// 커밋된 변경 수 (첫 reload 전 0)
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn read<T>(&self, f: impl FnOnce(&ReplicaState) -> T) -> Result<T> {
        let guard = self.state.read();
        guard.as_ref().map(f).ok_or(Error::NotLoaded)
    }

    /// 전체 상태 복사본 (한 번의 잠금)
    pub fn snapshot(&self) -> Result<ReplicaSnapshot> {
        self.read(ReplicaState::snapshot)
    }

    /// 현재 프레임워크 상태
    pub fn framework(&self) -> Result<FrameworkDescriptor> {
        self.read(|s| s.framework().clone())
    }

    /// id로 번들 조회 (없으면 None)
    pub fn bundle(&self, id: u64) -> Result<Option<BundleRecord>> {
        self.read(|s| s.bundle(id).cloned())
    }

    /// 전체 번들 (정렬)
    pub fn bundles(&self) -> Result<Vec<BundleRecord>> {
        self.read(|s| s.bundles().to_vec())
    }

    /// 같은 symbolic name의 번들들
    pub fn bundles_named(&self, name: &str) -> Result<Vec<BundleRecord>> {
        self.read(|s| s.bundles_named(name))
    }

    /// 중복 없는 번들 이름 (정렬)
    pub fn bundle_names(&self) -> Result<Vec<String>> {
        self.read(ReplicaState::bundle_names)
    }

    /// 지정 상태 중 하나에 있는 번들 이름 (빈 필터는 전체)
    pub fn bundle_names_in_states(&self, states: &[BundleState]) -> Result<Vec<String>> {
        self.read(|s| s.bundle_names_in_states(states))
    }

    /// id → 번들 맵
    pub fn bundle_map(&self) -> Result<HashMap<u64, BundleRecord>> {
        self.read(|s| s.bundle_map().clone())
    }

    /// 전체 서비스 (정렬)
    pub fn services(&self) -> Result<Vec<ServiceRecord>> {
        self.read(|s| s.services().to_vec())
    }

    /// 클래스 이름으로 등록된 서비스들
    pub fn services_by_class(&self, class_name: &str) -> Result<Vec<ServiceRecord>> {
        self.read(|s| s.services_by_class(class_name))
    }

    /// 번들이 등록한 서비스들
    pub fn services_of_bundle(&self, bundle_id: u64) -> Result<Vec<ServiceRecord>> {
        self.read(|s| s.services_of_bundle(bundle_id))
    }

    /// 전체 서비스 클래스 레코드 (정렬)
    pub fn service_classes(&self) -> Result<Vec<ServiceClassRecord>> {
        self.read(|s| s.service_classes().to_vec())
    }

    /// 중복 없는 서비스 클래스 이름 (정렬)
    pub fn service_class_names(&self) -> Result<Vec<String>> {
        self.read(ReplicaState::service_class_names)
    }

    /// 설정 엔트리 (정렬)
    pub fn configurations(&self) -> Result<Vec<ConfigurationRecord>> {
        self.read(|s| s.configurations().to_vec())
    }
}

// ============================================================================
// 원격 알림 수신
// ============================================================================

impl RemoteEventListener for ServerState {
    fn bundle_changed(&self, event: &BundleEvent, server: &ServerIdentity) {
        if self.config.log_events {
            trace!(server = %server, bundle_id = event.bundle_id(), "Bundle event received");
        }
        self.apply_bundle_event(event);
    }

    fn service_changed(&self, event: &ServiceEvent, server: &ServerIdentity) {
        if self.config.log_events {
            trace!(
                server = %server,
                service_id = event.service.id,
                kind = ?event.kind,
                "Service event received"
            );
        }
        self.apply_service_event(event);
    }

    fn framework_changed(&self, event: &FrameworkEvent, server: &ServerIdentity) {
        if self.config.log_events {
            trace!(
                server = %server,
                start_level = event.framework.start_level,
                "Framework event received"
            );
        }
        self.apply_framework_event(event);
    }
}
