//! State - 원격 서버 상태 replica
//!
//! - `replica.rs` - 한 세대의 데이터와 불변식 유지 연산
//! - `server.rs` - ServerState (잠금, reload, 이벤트 적용, 조회, 리스너)
//! - `background.rs` - async 호출자용 reload 래퍼

mod background;
mod replica;
mod server;

pub use background::reload_in_background;
pub use replica::ReplicaSnapshot;
pub use server::ServerState;
