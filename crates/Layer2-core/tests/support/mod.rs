//! 통합 테스트용 in-memory RemoteClient

#![allow(dead_code)]

use parking_lot::Mutex;
use scope_core::{RemoteClient, RemoteEventListener, SubscriberList};
use scope_foundation::{
    BundleEvent, BundleRecord, BundleState, ConfigurationRecord, Error, FrameworkDescriptor,
    FrameworkEvent, Result, ServerIdentity, ServiceEvent, ServiceRecord, StateListener,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Weak};

/// 테스트 로그 (RUST_LOG로 레벨 지정)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// FakeServer
// ============================================================================

/// 주입할 실패 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Connect,
    NotConnected,
    Remote,
}

impl Failure {
    fn to_error(self) -> Error {
        match self {
            Failure::Connect => Error::Connect("connection refused".into()),
            Failure::NotConnected => Error::NotConnected("client closed".into()),
            Failure::Remote => Error::remote("fake:9000", "framework query failed"),
        }
    }
}

/// reload 조회를 중간에 멈추는 장치
///
/// `entered`에서 조회 스레드와 만나고, `release`에서 다시 만날 때까지 대기.
pub struct FetchGate {
    pub entered: Barrier,
    pub release: Barrier,
}

struct ServerData {
    framework: FrameworkDescriptor,
    bundles: Vec<BundleRecord>,
    configurations: Vec<ConfigurationRecord>,
    failure: Option<Failure>,
    last_filter: Option<Option<String>>,
}

pub struct FakeServer {
    data: Mutex<ServerData>,
    gate: Mutex<Option<Arc<FetchGate>>>,
    subscribers: SubscriberList,
    identity: ServerIdentity,
    fetches: AtomicUsize,
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        Self::with_bundles(Vec::new())
    }

    pub fn with_bundles(bundles: Vec<BundleRecord>) -> Arc<Self> {
        Arc::new(Self {
            data: Mutex::new(ServerData {
                framework: FrameworkDescriptor::new("1.0.0", 1).vendor("fake"),
                bundles,
                configurations: Vec::new(),
                failure: None,
                last_filter: None,
            }),
            gate: Mutex::new(None),
            subscribers: SubscriberList::new(),
            identity: ServerIdentity::new("fake", 9000),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn set_bundles(&self, bundles: Vec<BundleRecord>) {
        self.data.lock().bundles = bundles;
    }

    pub fn set_framework(&self, framework: FrameworkDescriptor) {
        self.data.lock().framework = framework;
    }

    pub fn set_configurations(&self, configurations: Vec<ConfigurationRecord>) {
        self.data.lock().configurations = configurations;
    }

    pub fn fail_with(&self, failure: Option<Failure>) {
        self.data.lock().failure = failure;
    }

    /// 마지막 configurations() 호출의 필터
    pub fn last_filter(&self) -> Option<Option<String>> {
        self.data.lock().last_filter.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn install_gate(&self) -> Arc<FetchGate> {
        let gate = Arc::new(FetchGate {
            entered: Barrier::new(2),
            release: Barrier::new(2),
        });
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn emit_bundle(&self, event: BundleEvent) {
        self.subscribers.bundle_changed(&event, &self.identity);
    }

    pub fn emit_service(&self, event: ServiceEvent) {
        self.subscribers.service_changed(&event, &self.identity);
    }

    pub fn emit_framework(&self, framework: FrameworkDescriptor) {
        self.subscribers
            .framework_changed(&FrameworkEvent::new(framework), &self.identity);
    }

    fn check(&self) -> Result<()> {
        match self.data.lock().failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

impl RemoteClient for FakeServer {
    fn framework(&self) -> Result<FrameworkDescriptor> {
        self.check()?;
        Ok(self.data.lock().framework.clone())
    }

    fn all_bundles(&self) -> Result<Vec<BundleRecord>> {
        self.check()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            gate.entered.wait();
            gate.release.wait();
        }

        Ok(self.data.lock().bundles.clone())
    }

    fn configurations(&self, filter: Option<&str>) -> Result<Vec<ConfigurationRecord>> {
        self.check()?;
        let mut data = self.data.lock();
        data.last_filter = Some(filter.map(String::from));
        Ok(data.configurations.clone())
    }

    fn subscribe(&self, listener: Weak<dyn RemoteEventListener>) {
        self.subscribers.subscribe(listener);
    }
}

// ============================================================================
// Listener / 레코드 헬퍼
// ============================================================================

pub struct CountingListener {
    count: AtomicUsize,
}

impl CountingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            count: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl StateListener for CountingListener {
    fn name(&self) -> &str {
        "counting"
    }

    fn state_updated(&self) -> Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn bundle(id: u64, name: &str) -> BundleRecord {
    BundleRecord::new(id, name, BundleState::Active)
}

pub fn service(id: u64, bundle_id: u64, classes: &[&str]) -> ServiceRecord {
    classes
        .iter()
        .fold(ServiceRecord::new(id, bundle_id), |s, class| s.with_class(*class))
}

pub fn is_sorted<T: Ord>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0] <= pair[1])
}
