pub mod entry;
pub mod network;
pub mod process;

pub use entry::SocketEntry;
pub use network::{Protocol, SocketRecord, SocketState, TcpState};
pub use process::ProcessIdentity;
