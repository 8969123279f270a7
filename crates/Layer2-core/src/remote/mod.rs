//! Remote - 원격 프레임워크 서버와의 경계
//!
//! 실제 전송 계층(RPC, 연결 관리)은 이 크레이트 밖에서 구현합니다.
//! 여기서는 replica가 소비하는 인터페이스만 정의합니다.
//!
//! - `RemoteClient` - 전체 상태 조회 + 변경 알림 구독
//! - `RemoteEventListener` - 변경 알림 수신자
//! - `SubscriberList` - 구현체용 구독자 목록 헬퍼

mod subscribers;

pub use subscribers::SubscriberList;

use scope_foundation::{
    BundleEvent, BundleRecord, ConfigurationRecord, FrameworkDescriptor, FrameworkEvent, Result,
    ServerIdentity, ServiceEvent,
};
use std::sync::Weak;

// ============================================================================
// RemoteClient Trait
// ============================================================================

/// 원격 서버 클라이언트
///
/// 모든 조회는 동기 호출이며 다음 에러를 반환할 수 있습니다:
/// - `Error::Connect` - 서버에 연결할 수 없음
/// - `Error::NotConnected` - 클라이언트가 연결 해제 상태
/// - `Error::Remote` - 서버 측에서 에러 보고
pub trait RemoteClient: Send + Sync {
    /// 현재 프레임워크 상태
    fn framework(&self) -> Result<FrameworkDescriptor>;

    /// 전체 번들 (각 번들은 등록한 서비스를 포함)
    fn all_bundles(&self) -> Result<Vec<BundleRecord>>;

    /// 설정 엔트리 (filter가 None이면 전체)
    fn configurations(&self, filter: Option<&str>) -> Result<Vec<ConfigurationRecord>>;

    /// 변경 알림 구독
    ///
    /// 약한 참조로 보관하며, 구독자가 drop되면 더 이상 전달하지 않습니다.
    fn subscribe(&self, listener: Weak<dyn RemoteEventListener>);
}

// ============================================================================
// RemoteEventListener Trait
// ============================================================================

/// 원격 변경 알림 수신자
///
/// 전송 계층의 스레드에서 서버가 보낸 순서대로 호출됩니다.
/// 구현체는 에러를 반환하지 않습니다.
pub trait RemoteEventListener: Send + Sync {
    fn bundle_changed(&self, event: &BundleEvent, server: &ServerIdentity);

    fn service_changed(&self, event: &ServiceEvent, server: &ServerIdentity);

    fn framework_changed(&self, event: &FrameworkEvent, server: &ServerIdentity);
}
