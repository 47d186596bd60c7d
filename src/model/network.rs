use std::fmt;
use std::net::IpAddr;

/// One row of a kernel socket table, fully decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SocketRecord {
    pub protocol: Protocol,
    pub local_addr: IpAddr,
    pub local_port: u16,
    pub remote_addr: IpAddr,
    pub remote_port: u16,
    pub state: SocketState,
    pub uid: u32,
    pub inode: u64,
}

impl SocketRecord {
    pub fn local(&self) -> String {
        fmt_endpoint(&self.local_addr, self.local_port)
    }

    pub fn remote(&self) -> String {
        fmt_endpoint(&self.remote_addr, self.remote_port)
    }
}

/// Render an address/port pair, bracketing IPv6 hosts.
pub fn fmt_endpoint(addr: &IpAddr, port: u16) -> String {
    match addr {
        IpAddr::V4(v4) => format!("{}:{}", v4, port),
        IpAddr::V6(v6) => format!("[{}]:{}", v6, port),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Tcp6,
    Udp,
    Udp6,
}

impl Protocol {
    /// Discovery order: tables are always read in this sequence.
    pub const ALL: [Protocol; 4] = [Protocol::Tcp, Protocol::Tcp6, Protocol::Udp, Protocol::Udp6];

    /// Name of the table file below `<proc root>/net/`.
    pub fn table_name(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Tcp6 => "tcp6",
            Protocol::Udp => "udp",
            Protocol::Udp6 => "udp6",
        }
    }

    pub fn is_ipv6(self) -> bool {
        matches!(self, Protocol::Tcp6 | Protocol::Udp6)
    }

    /// UDP sockets carry no connection state.
    pub fn is_stateless(self) -> bool {
        matches!(self, Protocol::Udp | Protocol::Udp6)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// TCP connection states in kernel order; the discriminant is the value
/// found in the `st` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcpState {
    Established = 1,
    SynSent,
    SynRecv,
    FinWait1,
    FinWait2,
    TimeWait,
    Close,
    CloseWait,
    LastAck,
    Listen,
    Closing,
}

impl TcpState {
    const TABLE: [TcpState; 11] = [
        TcpState::Established,
        TcpState::SynSent,
        TcpState::SynRecv,
        TcpState::FinWait1,
        TcpState::FinWait2,
        TcpState::TimeWait,
        TcpState::Close,
        TcpState::CloseWait,
        TcpState::LastAck,
        TcpState::Listen,
        TcpState::Closing,
    ];

    /// Look up a 1-based kernel state index.
    pub fn from_index(index: u8) -> Option<TcpState> {
        let slot = usize::from(index).checked_sub(1)?;
        Self::TABLE.get(slot).copied()
    }
}

impl fmt::Display for TcpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TcpState::Established => write!(f, "ESTABLISHED"),
            TcpState::SynSent => write!(f, "SYN_SENT"),
            TcpState::SynRecv => write!(f, "SYN_RECV"),
            TcpState::FinWait1 => write!(f, "FIN_WAIT1"),
            TcpState::FinWait2 => write!(f, "FIN_WAIT2"),
            TcpState::TimeWait => write!(f, "TIME_WAIT"),
            TcpState::Close => write!(f, "CLOSE"),
            TcpState::CloseWait => write!(f, "CLOSE_WAIT"),
            TcpState::LastAck => write!(f, "LAST_ACK"),
            TcpState::Listen => write!(f, "LISTEN"),
            TcpState::Closing => write!(f, "CLOSING"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    Tcp(TcpState),
    /// UDP sockets have no state.
    NotApplicable,
}

impl fmt::Display for SocketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketState::Tcp(state) => state.fmt(f),
            SocketState::NotApplicable => write!(f, "n/a"),
        }
    }
}
