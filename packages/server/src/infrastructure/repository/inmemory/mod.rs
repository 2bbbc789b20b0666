//! インメモリ実装

pub mod room_directory;
pub mod timer;
pub mod view_state;

pub use room_directory::OpenRoomDirectory;
pub use timer::InMemoryTimerRepository;
pub use view_state::InMemoryViewStateRepository;
