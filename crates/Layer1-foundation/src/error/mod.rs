//! Error types for BundleScope
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// BundleScope 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 원격 서버 관련 (RemoteClient가 발생, reload가 그대로 전달)
    // ========================================================================
    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Remote server error: {server} - {message}")]
    Remote { server: String, message: String },

    // ========================================================================
    // Replica 관련
    // ========================================================================
    #[error("The server state has not been loaded")]
    NotLoaded,

    #[error("Listener failed: {listener} - {message}")]
    Listener { listener: String, message: String },

    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 재시도 가능한 에러인지 확인
    ///
    /// Replica 자체는 재시도하지 않음 - 호출자 판단용
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Connect(_))
    }

    /// 원격 서버/전송 계층에서 발생한 에러인지 확인
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Connect(_) | Error::NotConnected(_) | Error::Remote { .. }
        )
    }

    /// 원격 서버 에러 생성 헬퍼
    pub fn remote(server: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Remote {
            server: server.into(),
            message: message.into(),
        }
    }

    /// Listener 에러 생성 헬퍼
    pub fn listener(listener: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Listener {
            listener: listener.into(),
            message: message.into(),
        }
    }
}
