use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "whoport",
    version,
    about = "Show which processes own the sockets on this host"
)]
pub struct CliArgs {
    /// Only show sockets bound to this local port
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: Option<String>,

    /// Show TCP sockets (default: TCP and UDP)
    #[arg(long = "tcp")]
    pub tcp: bool,

    /// Show UDP sockets (default: TCP and UDP)
    #[arg(long = "udp")]
    pub udp: bool,

    /// Show IPv4 sockets (default: IPv4 and IPv6)
    #[arg(short = '4')]
    pub ipv4: bool,

    /// Show IPv6 sockets (default: IPv4 and IPv6)
    #[arg(short = '6')]
    pub ipv6: bool,

    /// Only listening TCP sockets and unconnected UDP sockets
    #[arg(short = 'L', long = "listening")]
    pub listening: bool,

    /// Terse output: owning PIDs only
    #[arg(short = 't')]
    pub terse: bool,

    /// List UID numbers instead of login names
    #[arg(short = 'l')]
    pub list_uid: bool,

    /// Send a signal to every process owning a socket on PORT, any protocol
    #[arg(
        short = 'k',
        long = "kill",
        value_name = "PORT",
        conflicts_with_all = ["port", "tcp", "udp", "ipv4", "ipv6", "listening"]
    )]
    pub kill: Option<String>,

    /// Signal used by --kill (TERM, KILL, INT, HUP, QUIT or a number)
    #[arg(short = 's', long = "signal", value_name = "SIG", default_value = "TERM")]
    pub signal: String,

    /// Do not ask for confirmation before --kill
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Root of the process information filesystem
    #[arg(long = "proc-root", value_name = "DIR", env = "WHOPORT_PROC_ROOT", default_value = "/proc")]
    pub proc_root: PathBuf,

    /// Account database to map UIDs to names (default: /etc/passwd plus NSS)
    #[arg(long = "passwd", value_name = "FILE", env = "WHOPORT_PASSWD")]
    pub passwd: Option<PathBuf>,

    /// Suppress warnings
    #[arg(short = 'w')]
    pub suppress_warnings: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Default `log` filter implied by -v/-w; RUST_LOG still wins.
    pub fn log_level(&self) -> &'static str {
        match (self.suppress_warnings, self.verbose) {
            (_, 2..) => "debug",
            (_, 1) => "info",
            (true, 0) => "error",
            (false, 0) => "warn",
        }
    }
}
