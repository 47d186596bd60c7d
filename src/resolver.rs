//! Socket inode -> owning process resolution.
//!
//! Scanning every process's descriptor table is the expensive step, so all
//! inodes of interest are resolved together in one sweep that stops as soon
//! as nothing is left to find.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, WhoportError};
use crate::model::ProcessIdentity;
use crate::platform::ProcessTree;

pub type InodeOwners = HashMap<u64, ProcessIdentity>;

/// Map each of `targets` to the first process found holding it.
///
/// Processes that vanish or deny access mid-scan are skipped. Inodes that
/// are never found are simply absent from the result. Only a failure to
/// list the process tree itself is an error.
pub fn resolve_inodes<T>(tree: &T, targets: impl IntoIterator<Item = u64>) -> Result<InodeOwners>
where
    T: ProcessTree + ?Sized,
{
    let mut remaining: HashSet<u64> = targets.into_iter().collect();
    let mut owners = InodeOwners::with_capacity(remaining.len());
    if remaining.is_empty() {
        return Ok(owners);
    }

    let pids = tree.pids().map_err(WhoportError::ProcessTree)?;

    for pid in pids {
        let inodes = match tree.socket_inodes(pid) {
            Ok(inodes) => inodes,
            Err(e) => {
                log::debug!("pid {}: descriptors unavailable: {}", pid, e);
                continue;
            }
        };

        let matched: Vec<u64> = inodes
            .into_iter()
            .filter(|inode| remaining.remove(inode))
            .collect();
        if matched.is_empty() {
            continue;
        }

        let program_name = match tree.program_name(pid) {
            Ok(name) => name,
            Err(e) => {
                log::debug!("pid {}: exited during scan: {}", pid, e);
                remaining.extend(matched);
                continue;
            }
        };

        for inode in matched {
            owners.insert(inode, ProcessIdentity::new(pid, program_name.clone()));
        }

        if remaining.is_empty() {
            log::debug!("all sockets resolved at pid {}", pid);
            break;
        }
    }

    log::info!(
        "resolved {} sockets, {} unresolved",
        owners.len(),
        remaining.len()
    );
    Ok(owners)
}
