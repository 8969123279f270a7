//! Event System - 원격 변경 알림과 replica 리스너
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────┐  BundleEvent / ServiceEvent / FrameworkEvent
//! │ RemoteClient │ ─────────────────────────────────┐
//! └──────────────┘                                   ▼
//!                                         ┌─────────────────────┐
//!                                         │  ServerState        │
//!                                         │  (state replica)    │
//!                                         └──────────┬──────────┘
//!                                                    │ notify()
//!                                                    ▼
//!                       ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//!                       │  Listener 1  │  │  Listener 2  │  │  Listener N  │
//!                       └──────────────┘  └──────────────┘  └──────────────┘
//! ```
//!
//! ## 사용법
//!
//! ```ignore
//! use scope_foundation::event::{FnListener, ListenerRegistry};
//!
//! let registry = ListenerRegistry::new();
//! let id = registry.add(Arc::new(FnListener::new("ui", || {
//!     println!("state changed");
//!     Ok(())
//! })));
//!
//! registry.notify();
//! registry.remove(id);
//! ```

pub mod listener;
pub mod types;

// Re-exports
pub use listener::{FnListener, ListenerId, ListenerRegistry, StateListener};

pub use types::{
    BundleEvent, BundleEventKind, FrameworkEvent, ServerIdentity, ServiceEvent, ServiceEventKind,
};
