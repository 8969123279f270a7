//! Domain - 원격 프레임워크 상태 레코드
//!
//! - `framework.rs` - 프레임워크 전체 상태 (버전, start level)
//! - `bundle.rs` - 번들 레코드와 lifecycle 상태
//! - `service.rs` - 서비스 / 서비스 클래스 레코드
//! - `configuration.rs` - 설정 엔트리
//!
//! 모든 레코드는 값 타입이며 선행 필드 기준의 전순서(`Ord`)를 가집니다.
//! Replica는 레코드를 복사해 보관하고, 레코드 자체의 필드는 수정하지 않습니다.

mod bundle;
mod configuration;
mod framework;
mod service;

pub use bundle::{BundleRecord, BundleState};
pub use configuration::ConfigurationRecord;
pub use framework::FrameworkDescriptor;
pub use service::{ServiceClassRecord, ServiceRecord};
