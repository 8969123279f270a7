//! Background Reload - async 호출자를 위한 reload 래퍼
//!
//! reload는 원격 조회를 포함한 blocking 호출이므로 tokio blocking pool에서 실행합니다.

use super::ServerState;
use scope_foundation::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// blocking pool에서 `reload()` 실행
///
/// tokio runtime 안에서 호출해야 합니다. 동시에 여러 번 호출하면 서로
/// 직렬화되어 순서대로 실행됩니다.
pub fn reload_in_background(state: Arc<ServerState>) -> JoinHandle<Result<()>> {
    debug!("Scheduling background reload");
    tokio::task::spawn_blocking(move || state.reload())
}
