use super::ProcessTree;

use std::io::{self, Read};
use std::path::PathBuf;

use procfs::process::{FDTarget, Process};
use procfs::ProcError;

/// `ProcessTree` over a procfs mount (or a directory laid out like one).
pub struct ProcfsTree {
    root: PathBuf,
}

impl ProcfsTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn process(&self, pid: u32) -> io::Result<Process> {
        Process::new_with_root(self.root.join(pid.to_string())).map_err(into_io)
    }
}

/// Only positive pids name a single process; 0 and negative values
/// address process groups when handed to `kill(2)`.
fn signalable_pid(pid: i32) -> Option<u32> {
    u32::try_from(pid).ok().filter(|pid| *pid > 0)
}

fn into_io(err: ProcError) -> io::Error {
    match err {
        ProcError::Io(e, _) => e,
        ProcError::NotFound(_) => io::ErrorKind::NotFound.into(),
        ProcError::PermissionDenied(_) => io::ErrorKind::PermissionDenied.into(),
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}

impl ProcessTree for ProcfsTree {
    fn pids(&self) -> io::Result<Vec<u32>> {
        let all_procs = procfs::process::all_processes_with_root(&self.root).map_err(into_io)?;

        let mut pids: Vec<u32> = all_procs
            // Entries that vanished or are not process directories.
            .filter_map(|proc_result| proc_result.ok())
            .filter_map(|proc| signalable_pid(proc.pid))
            .collect();
        pids.sort_unstable();
        pids.dedup();
        Ok(pids)
    }

    fn program_name(&self, pid: u32) -> io::Result<String> {
        let mut comm = String::new();
        self.process(pid)?
            .open_relative("comm")
            .map_err(into_io)?
            .read_to_string(&mut comm)?;
        Ok(comm.lines().next().unwrap_or_default().to_string())
    }

    fn socket_inodes(&self, pid: u32) -> io::Result<Vec<u64>> {
        let fds = self.process(pid)?.fd().map_err(into_io)?;

        let mut inodes = Vec::new();
        for fd_info in fds {
            // The descriptor may be closed between listing and readlink.
            let fd_info = match fd_info {
                Ok(fi) => fi,
                Err(_) => continue,
            };
            if let FDTarget::Socket(inode) = fd_info.target {
                inodes.push(inode);
            }
        }
        Ok(inodes)
    }
}
