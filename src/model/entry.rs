use super::network::SocketRecord;
use super::process::ProcessIdentity;

/// A socket record joined with whatever could be resolved about its owner.
///
/// `owner` and `user` are `None` when resolution failed; both render as a
/// placeholder instead of aborting the run.
#[derive(Debug, Clone)]
pub struct SocketEntry {
    pub record: SocketRecord,
    pub owner: Option<ProcessIdentity>,
    pub user: Option<String>,
}

impl SocketEntry {
    pub fn pid(&self) -> Option<u32> {
        self.owner.as_ref().map(|o| o.pid)
    }
}
