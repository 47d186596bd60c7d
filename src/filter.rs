use crate::cli::CliArgs;
use crate::error::{Result, WhoportError};
use crate::model::{Protocol, SocketRecord, SocketState, TcpState};

/// Which sockets a run looks at, built from CLI arguments.
///
/// The protocol flags pick which tables are read at all; `port` and
/// `listening` are applied to each record before owner resolution.
#[derive(Debug, Default)]
pub struct FilterConfig {
    pub port: Option<u16>,
    pub tcp: bool,
    pub udp: bool,
    pub ipv4: bool,
    pub ipv6: bool,
    pub listening: bool,
}

/// Parse a user-supplied port number.
pub fn parse_port(s: &str) -> Result<u16> {
    s.trim()
        .parse::<u16>()
        .map_err(|_| WhoportError::InvalidPort(s.to_string()))
}

impl FilterConfig {
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let port = match args.kill.as_deref().or(args.port.as_deref()) {
            Some(s) => Some(parse_port(s)?),
            None => None,
        };
        Ok(FilterConfig {
            port,
            tcp: args.tcp,
            udp: args.udp,
            ipv4: args.ipv4,
            ipv6: args.ipv6,
            listening: args.listening,
        })
    }

    /// Tables to read, in discovery order.
    pub fn protocols(&self) -> Vec<Protocol> {
        Protocol::ALL
            .into_iter()
            .filter(|p| {
                let kind = (!self.tcp && !self.udp)
                    || (self.tcp && !p.is_stateless())
                    || (self.udp && p.is_stateless());
                let family = (!self.ipv4 && !self.ipv6)
                    || (self.ipv4 && !p.is_ipv6())
                    || (self.ipv6 && p.is_ipv6());
                kind && family
            })
            .collect()
    }

    pub fn matches(&self, record: &SocketRecord) -> bool {
        if let Some(port) = self.port {
            if record.local_port != port {
                return false;
            }
        }
        !self.listening || is_listening(record)
    }
}

/// TCP sockets in LISTEN, or UDP sockets not connected to a peer.
fn is_listening(record: &SocketRecord) -> bool {
    match record.state {
        SocketState::Tcp(state) => state == TcpState::Listen,
        SocketState::NotApplicable => record.remote_port == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::net::{IpAddr, Ipv4Addr};

    fn record(protocol: Protocol, port: u16, state: SocketState, remote_port: u16) -> SocketRecord {
        SocketRecord {
            protocol,
            local_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            local_port: port,
            remote_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            remote_port,
            state,
            uid: 0,
            inode: 1,
        }
    }

    fn from_args(args: &[&str]) -> Result<FilterConfig> {
        let mut argv = vec!["whoport"];
        argv.extend_from_slice(args);
        FilterConfig::from_cli(&CliArgs::parse_from(argv))
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert!(matches!(parse_port("http"), Err(WhoportError::InvalidPort(_))));
        assert!(matches!(parse_port("70000"), Err(WhoportError::InvalidPort(_))));
        assert!(matches!(parse_port("-1"), Err(WhoportError::InvalidPort(_))));
    }

    #[test]
    fn test_default_reads_all_tables() {
        assert_eq!(FilterConfig::default().protocols(), Protocol::ALL.to_vec());
    }

    #[test]
    fn test_protocol_selection() {
        let tcp = from_args(&["--tcp"]).unwrap();
        assert_eq!(tcp.protocols(), vec![Protocol::Tcp, Protocol::Tcp6]);

        let udp6 = from_args(&["--udp", "-6"]).unwrap();
        assert_eq!(udp6.protocols(), vec![Protocol::Udp6]);

        let v4 = from_args(&["-4"]).unwrap();
        assert_eq!(v4.protocols(), vec![Protocol::Tcp, Protocol::Udp]);

        let both = from_args(&["--tcp", "--udp", "-4", "-6"]).unwrap();
        assert_eq!(both.protocols(), Protocol::ALL.to_vec());
    }

    #[test]
    fn test_port_filter() {
        let filter = from_args(&["-p", "22"]).unwrap();
        let listen = SocketState::Tcp(TcpState::Listen);
        assert!(filter.matches(&record(Protocol::Tcp, 22, listen, 0)));
        assert!(!filter.matches(&record(Protocol::Tcp, 23, listen, 0)));
    }

    #[test]
    fn test_kill_port_becomes_filter() {
        let filter = from_args(&["-k", "8080"]).unwrap();
        assert_eq!(filter.port, Some(8080));
    }

    #[test]
    fn test_bad_port_is_user_error() {
        let err = from_args(&["-p", "ssh"]).unwrap_err();
        assert!(err.is_user_error());
    }

    #[test]
    fn test_listening_filter() {
        let filter = from_args(&["-L"]).unwrap();
        assert!(filter.matches(&record(Protocol::Tcp, 22, SocketState::Tcp(TcpState::Listen), 0)));
        assert!(!filter.matches(&record(
            Protocol::Tcp,
            22,
            SocketState::Tcp(TcpState::Established),
            5000
        )));
        assert!(filter.matches(&record(Protocol::Udp, 53, SocketState::NotApplicable, 0)));
        assert!(!filter.matches(&record(Protocol::Udp6, 53, SocketState::NotApplicable, 443)));
    }
}
