use std::io;
use std::path::Path;

/// Read access to the per-process information the resolver needs.
///
/// Every method may fail for a single process (it exited, or its
/// descriptors belong to another user); callers treat such errors as
/// expected and move on.
pub trait ProcessTree {
    /// Pids of all visible processes, ascending.
    fn pids(&self) -> io::Result<Vec<u32>>;
    /// Short program name of `pid`.
    fn program_name(&self, pid: u32) -> io::Result<String>;
    /// Inodes of every socket `pid` holds a descriptor for.
    fn socket_inodes(&self, pid: u32) -> io::Result<Vec<u64>>;
}

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::ProcfsTree;

#[cfg(not(target_os = "linux"))]
compile_error!("whoport reads procfs and only supports Linux");

pub fn create_tree(proc_root: &Path) -> Box<dyn ProcessTree> {
    Box::new(ProcfsTree::new(proc_root))
}
