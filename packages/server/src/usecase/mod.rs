//! UseCase 層
//!
//! 名前空間ハンドラとセッションのライフサイクルを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod connect_namespace;
pub mod connection_gate;
pub mod disconnect_namespace;
pub mod dispatch_event;
pub mod error;
pub mod namespace;

pub use connect_namespace::{Admitted, ConnectNamespaceUseCase};
pub use disconnect_namespace::DisconnectNamespaceUseCase;
pub use dispatch_event::DispatchEventUseCase;
pub use error::{ConnectError, DispatchError};
pub use namespace::{AdminChannel, DefaultChannel, NamespaceRegistry};
