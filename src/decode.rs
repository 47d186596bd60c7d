//! Decoders for the hex text encodings used in `/proc/net/{tcp,udp}[6]`.
//!
//! Addresses are written as the raw in-memory bytes of the kernel's
//! network-order value, printed one 32-bit host-order word at a time, so on
//! little-endian machines every word appears byte-reversed.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::DecodeError;
use crate::model::{Protocol, SocketState, TcpState};

/// Parse a hex string made only of hex digits.
///
/// `from_str_radix` alone also accepts a leading `+`, which never appears
/// in the kernel tables.
fn parse_hex(hex: &str) -> Result<u64, DecodeError> {
    if hex.is_empty() || hex.len() > 16 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::NotHex(hex.to_string()));
    }
    u64::from_str_radix(hex, 16).map_err(|_| DecodeError::NotHex(hex.to_string()))
}

fn expect_len(hex: &str, expected: usize) -> Result<(), DecodeError> {
    if hex.len() != expected {
        return Err(DecodeError::Length {
            expected,
            value: hex.to_string(),
        });
    }
    Ok(())
}

/// Read one 8-digit word and undo the host byte order.
fn parse_word(hex: &str) -> Result<[u8; 4], DecodeError> {
    let word = parse_hex(hex)? as u32;
    Ok(word.swap_bytes().to_be_bytes())
}

/// Decode an 8-digit IPv4 address, e.g. `0100007F` is `127.0.0.1`.
pub fn decode_ipv4(hex: &str) -> Result<Ipv4Addr, DecodeError> {
    expect_len(hex, 8)?;
    Ok(Ipv4Addr::from(parse_word(hex)?))
}

/// Decode a 32-digit IPv6 address made of four byte-reversed words.
pub fn decode_ipv6(hex: &str) -> Result<Ipv6Addr, DecodeError> {
    expect_len(hex, 32)?;
    let mut octets = [0u8; 16];
    for (i, chunk) in octets.chunks_exact_mut(4).enumerate() {
        let word = hex
            .get(i * 8..(i + 1) * 8)
            .ok_or_else(|| DecodeError::NotHex(hex.to_string()))?;
        chunk.copy_from_slice(&parse_word(word)?);
    }
    Ok(Ipv6Addr::from(octets))
}

pub fn decode_address(hex: &str, protocol: Protocol) -> Result<IpAddr, DecodeError> {
    if protocol.is_ipv6() {
        decode_ipv6(hex).map(IpAddr::V6)
    } else {
        decode_ipv4(hex).map(IpAddr::V4)
    }
}

/// Ports are plain big-endian hex.
pub fn decode_port(hex: &str) -> Result<u16, DecodeError> {
    let value = parse_hex(hex)?;
    u16::try_from(value).map_err(|_| DecodeError::PortRange(value))
}

pub fn decode_state(hex: &str, protocol: Protocol) -> Result<SocketState, DecodeError> {
    if protocol.is_stateless() {
        return Ok(SocketState::NotApplicable);
    }
    let value = parse_hex(hex)?;
    u8::try_from(value)
        .ok()
        .and_then(TcpState::from_index)
        .map(SocketState::Tcp)
        .ok_or(DecodeError::UnknownState(value))
}
