//! scope-core: Core Runtime for BundleScope
//!
//! Layer2 - 원격 프레임워크 상태 replica
//!
//! # 주요 모듈
//!
//! - `remote`: 원격 서버 경계 (RemoteClient, RemoteEventListener)
//! - `state`: ServerState - reload + 증분 이벤트로 동기화되는 상태 복사본
//!
//! # 사용 예시
//!
//! ```ignore
//! use scope_core::{ServerState, reload_in_background};
//! use scope_foundation::{BundleState, FnListener};
//!
//! // 생성 시 클라이언트의 변경 알림에 구독
//! let state = ServerState::new(client);
//!
//! // 첫 reload 전 조회는 Error::NotLoaded
//! state.reload()?;
//!
//! // 변경 알림 구독
//! state.add_listener(Arc::new(FnListener::new("ui", || Ok(()))));
//!
//! // 조회 (항상 복사본)
//! let active = state.bundle_names_in_states(&[BundleState::Active])?;
//!
//! // async 환경
//! reload_in_background(state.clone()).await??;
//! ```

pub mod remote;
pub mod state;

// Re-exports: Remote
pub use remote::{RemoteClient, RemoteEventListener, SubscriberList};

// Re-exports: State
pub use state::{reload_in_background, ReplicaSnapshot, ServerState};
