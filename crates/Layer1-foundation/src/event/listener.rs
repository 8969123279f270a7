//! Listener Registry - replica 변경 알림 구독
//!
//! 상태 잠금과 독립된 자체 잠금을 사용합니다. 알림은 리스너 목록을 복사한 뒤
//! 잠금 밖에서 호출하므로, 콜백 안에서 조회/등록/해제를 해도 교착되지 않습니다.

use crate::Result;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

// ============================================================================
// StateListener Trait
// ============================================================================

/// 리스너 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// 상태 변경 리스너 trait
///
/// reload 또는 이벤트 적용이 커밋될 때마다 인자 없이 호출됩니다.
/// 최신 상태가 필요하면 콜백 안에서 replica를 다시 조회합니다.
pub trait StateListener: Send + Sync {
    /// 리스너 이름 (디버깅용)
    fn name(&self) -> &str {
        "anonymous"
    }

    /// 상태 변경 처리
    fn state_updated(&self) -> Result<()>;
}

/// 클로저 기반 리스너
pub struct FnListener<F> {
    name: String,
    callback: F,
}

impl<F> FnListener<F>
where
    F: Fn() -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> StateListener for FnListener<F>
where
    F: Fn() -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn state_updated(&self) -> Result<()> {
        (self.callback)()
    }
}

// ============================================================================
// ListenerRegistry
// ============================================================================

/// 리스너 레지스트리
///
/// ```ignore
/// let registry = ListenerRegistry::new();
/// let id = registry.add(Arc::new(FnListener::new("ui", || Ok(()))));
/// registry.notify();
/// registry.remove(id);
/// ```
pub struct ListenerRegistry {
    /// 등록된 리스너 (등록 순서대로 호출)
    listeners: Mutex<BTreeMap<ListenerId, Arc<dyn StateListener>>>,

    /// 리스너 ID 카운터
    listener_counter: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(BTreeMap::new()),
            listener_counter: AtomicU64::new(0),
        }
    }

    /// 리스너 등록
    pub fn add(&self, listener: Arc<dyn StateListener>) -> ListenerId {
        let id = ListenerId::new(self.listener_counter.fetch_add(1, Ordering::SeqCst));

        debug!(
            listener_name = listener.name(),
            listener_id = %id,
            "Registering state listener"
        );

        self.listeners.lock().insert(id, listener);
        id
    }

    /// 리스너 해제 (이미 없으면 false)
    pub fn remove(&self, id: ListenerId) -> bool {
        let removed = self.listeners.lock().remove(&id).is_some();

        if removed {
            debug!(listener_id = %id, "Unregistered state listener");
        }

        removed
    }

    /// 등록된 리스너 수
    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    /// 모든 리스너 호출
    ///
    /// 실패(Err 또는 panic)한 리스너는 로그만 남기고 다음 리스너로 진행합니다.
    /// 반환값은 실패한 리스너 수.
    pub fn notify(&self) -> usize {
        let snapshot: Vec<(ListenerId, Arc<dyn StateListener>)> = self
            .listeners
            .lock()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        let mut failed = 0;
        for (id, listener) in snapshot {
            trace!(listener_id = %id, listener_name = listener.name(), "Notifying listener");

            match catch_unwind(AssertUnwindSafe(|| listener.state_updated())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failed += 1;
                    warn!(
                        listener_id = %id,
                        listener_name = listener.name(),
                        error = %e,
                        "State listener failed"
                    );
                }
                Err(_) => {
                    failed += 1;
                    warn!(
                        listener_id = %id,
                        listener_name = listener.name(),
                        "State listener panicked"
                    );
                }
            }
        }

        failed
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 테스트
// ============================================================================
