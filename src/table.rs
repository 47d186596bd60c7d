use std::fs;
use std::path::Path;

use crate::decode::{decode_address, decode_port, decode_state};
use crate::error::{LineError, Result, WhoportError};
use crate::model::{Protocol, SocketRecord};

/// Columns (0-based) of a `/proc/net/{tcp,udp}[6]` data line.
const LOCAL_FIELD: usize = 1;
const REMOTE_FIELD: usize = 2;
const STATE_FIELD: usize = 3;
const UID_FIELD: usize = 7;
const INODE_FIELD: usize = 9;
const MIN_FIELDS: usize = INODE_FIELD + 1;

/// Read `<proc_root>/net/<protocol>` and decode every socket in it.
pub fn read_table(proc_root: &Path, protocol: Protocol) -> Result<Vec<SocketRecord>> {
    let path = proc_root.join("net").join(protocol.table_name());
    let content = fs::read_to_string(&path).map_err(|e| WhoportError::io(&path, e))?;
    let records = parse_table(&content, protocol)?;
    log::info!("{}: {} sockets", path.display(), records.len());
    Ok(records)
}

/// Decode a socket table. The first line is the header; any data line that
/// does not match the schema aborts the whole table.
pub fn parse_table(content: &str, protocol: Protocol) -> Result<Vec<SocketRecord>> {
    content
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_line(line, protocol).map_err(|source| WhoportError::Table {
                protocol,
                line: idx + 1,
                source,
            })
        })
        .collect()
}

fn parse_line(line: &str, protocol: Protocol) -> std::result::Result<SocketRecord, LineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return Err(LineError::TooFewFields {
            found: fields.len(),
        });
    }

    let (local_hex, local_port_hex) = split_endpoint(fields[LOCAL_FIELD])?;
    let (remote_hex, remote_port_hex) = split_endpoint(fields[REMOTE_FIELD])?;

    Ok(SocketRecord {
        protocol,
        local_addr: decode_address(local_hex, protocol)?,
        local_port: decode_port(local_port_hex)?,
        remote_addr: decode_address(remote_hex, protocol)?,
        remote_port: decode_port(remote_port_hex)?,
        state: decode_state(fields[STATE_FIELD], protocol)?,
        uid: parse_numeric("uid", fields[UID_FIELD])?,
        inode: parse_numeric("inode", fields[INODE_FIELD])?,
    })
}

fn split_endpoint(field: &str) -> std::result::Result<(&str, &str), LineError> {
    field
        .split_once(':')
        .ok_or_else(|| LineError::Endpoint(field.to_string()))
}

fn parse_numeric<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> std::result::Result<T, LineError> {
    value.parse().map_err(|_| LineError::Numeric {
        field,
        value: value.to_string(),
    })
}
