//! Storage module for BundleScope
//!
//! - `json`: JSON - 설정 파일 저장/로드
//!
//! Replica 자체는 메모리에만 존재하며 저장하지 않습니다.

mod json;

pub use json::JsonStore;
