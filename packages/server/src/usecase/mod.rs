//! UseCase layer.
//!
//! 各ユースケースは Repository を介して状態を読み、ドメインのルールを適用して保存し、
//! 送信すべき結果を返します。送信そのものは UI 層の EventRouter が行います。
//!
//! ViewState の読み出し〜保存はそれ単体ではアトミックではありません。
//! 呼び出し側（EventRouter）が部屋への操作を直列化する前提です。

pub mod error;
pub mod get_room_detail;
pub mod join_room;
pub mod navigation;
pub mod pointer_relay;
pub mod presenter_lock;
pub mod timer;

pub use error::{JoinRoomError, TimerUseCaseError};
pub use get_room_detail::{GetRoomDetailUseCase, RoomDetail};
pub use join_room::JoinRoomUseCase;
pub use navigation::NavigationUseCase;
pub use pointer_relay::PointerRelayUseCase;
pub use presenter_lock::PresenterLockUseCase;
pub use timer::TimerUseCase;
