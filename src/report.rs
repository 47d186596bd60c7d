use std::collections::HashSet;
use std::path::Path;

use crate::accounts::AccountDb;
use crate::error::Result;
use crate::filter::FilterConfig;
use crate::model::{Protocol, SocketEntry, SocketRecord};
use crate::platform::ProcessTree;
use crate::resolver::resolve_inodes;
use crate::table::read_table;

/// Take one snapshot: read the selected tables, resolve owners and users,
/// then collapse duplicates and order by port.
pub fn scan(
    proc_root: &Path,
    filter: &FilterConfig,
    tree: &dyn ProcessTree,
    accounts: &AccountDb,
) -> Result<Vec<SocketEntry>> {
    let mut records: Vec<SocketRecord> = Vec::new();
    for protocol in filter.protocols() {
        records.extend(read_table(proc_root, protocol)?);
    }
    records.retain(|r| filter.matches(r));

    let owners = resolve_inodes(tree, records.iter().map(|r| r.inode))?;

    let entries = records
        .into_iter()
        .map(|record| SocketEntry {
            owner: owners.get(&record.inode).cloned(),
            user: accounts.username(record.uid),
            record,
        })
        .collect();

    let mut entries = dedup_entries(entries);
    sort_by_port(&mut entries);
    Ok(entries)
}

/// Drop later entries owned by the same process on the same port and
/// protocol. Unresolved entries are never collapsed.
pub fn dedup_entries(entries: Vec<SocketEntry>) -> Vec<SocketEntry> {
    let mut seen: HashSet<(u32, u16, Protocol)> = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| match entry.pid() {
            Some(pid) => seen.insert((pid, entry.record.local_port, entry.record.protocol)),
            None => true,
        })
        .collect()
}

/// Stable, so equal ports keep discovery order.
pub fn sort_by_port(entries: &mut [SocketEntry]) {
    entries.sort_by_key(|e| e.record.local_port);
}

/// What the port column shows for one row of sorted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortLabel {
    /// First row at this port.
    Number(u16),
    /// More rows at this port follow.
    More,
    /// Last of several rows at this port.
    Last,
}

/// Label each row of port-sorted entries.
pub fn port_labels(entries: &[SocketEntry]) -> Vec<PortLabel> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let port = entry.record.local_port;
            let same_as_prev = i > 0 && entries[i - 1].record.local_port == port;
            let same_as_next = entries
                .get(i + 1)
                .is_some_and(|next| next.record.local_port == port);
            match (same_as_prev, same_as_next) {
                (false, _) => PortLabel::Number(port),
                (true, true) => PortLabel::More,
                (true, false) => PortLabel::Last,
            }
        })
        .collect()
}
