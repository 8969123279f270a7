//! Subscriber List - 약한 참조 기반 알림 fan-out

use super::RemoteEventListener;
use parking_lot::Mutex;
use scope_foundation::{BundleEvent, FrameworkEvent, ServerIdentity, ServiceEvent};
use std::sync::{Arc, Weak};
use tracing::trace;

/// RemoteClient 구현체가 구독자를 보관하고 알림을 전달할 때 사용
///
/// 전달 시점에 살아있는 구독자만 호출하고, drop된 구독자는 목록에서 정리합니다.
/// 구독자 호출은 잠금 밖에서 이루어집니다.
#[derive(Default)]
pub struct SubscriberList {
    subscribers: Mutex<Vec<Weak<dyn RemoteEventListener>>>,
}

impl SubscriberList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 구독자 추가
    pub fn subscribe(&self, listener: Weak<dyn RemoteEventListener>) {
        self.subscribers.lock().push(listener);
    }

    /// 살아있는 구독자 수
    pub fn len(&self) -> usize {
        self.live().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live(&self) -> Vec<Arc<dyn RemoteEventListener>> {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|weak| weak.strong_count() > 0);

        if subscribers.len() != before {
            trace!(dropped = before - subscribers.len(), "Pruned dropped subscribers");
        }

        subscribers.iter().filter_map(Weak::upgrade).collect()
    }
}

impl RemoteEventListener for SubscriberList {
    fn bundle_changed(&self, event: &BundleEvent, server: &ServerIdentity) {
        for subscriber in self.live() {
            subscriber.bundle_changed(event, server);
        }
    }

    fn service_changed(&self, event: &ServiceEvent, server: &ServerIdentity) {
        for subscriber in self.live() {
            subscriber.service_changed(event, server);
        }
    }

    fn framework_changed(&self, event: &FrameworkEvent, server: &ServerIdentity) {
        for subscriber in self.live() {
            subscriber.framework_changed(event, server);
        }
    }
}
