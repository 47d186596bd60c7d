use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;

use crate::error::{Result, WhoportError};
use crate::model::{ProcessIdentity, SocketEntry};

/// Parse a signal by name (with or without `SIG`, any case) or number.
pub fn parse_signal(s: &str) -> Result<Signal> {
    let upper = s.trim().to_uppercase();
    let name = upper.strip_prefix("SIG").unwrap_or(&upper);

    match name {
        "TERM" | "15" => Ok(Signal::SIGTERM),
        "KILL" | "9" => Ok(Signal::SIGKILL),
        "INT" | "2" => Ok(Signal::SIGINT),
        "HUP" | "1" => Ok(Signal::SIGHUP),
        "QUIT" | "3" => Ok(Signal::SIGQUIT),
        _ => Err(WhoportError::InvalidSignal(s.to_string())),
    }
}

/// Unique resolved owners of sockets bound to `port`, first seen first.
pub fn owners_on_port(entries: &[SocketEntry], port: u16) -> Vec<ProcessIdentity> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|e| e.record.local_port == port)
        .filter_map(|e| e.owner.as_ref())
        .filter(|owner| seen.insert(owner.pid))
        .cloned()
        .collect()
}

/// Outcome of one kill request.
#[derive(Debug, PartialEq)]
pub struct KillOutcome {
    pub owner: ProcessIdentity,
    pub result: std::result::Result<(), Errno>,
}

/// Send `signal` to every owner through `send`, recording each result.
pub fn kill_owners<F>(owners: &[ProcessIdentity], signal: Signal, mut send: F) -> Vec<KillOutcome>
where
    F: FnMut(Pid, Signal) -> nix::Result<()>,
{
    owners
        .iter()
        .map(|owner| {
            // 0 and anything past i32::MAX would address a process group.
            let result = match i32::try_from(owner.pid) {
                Ok(raw) if raw > 0 => send(Pid::from_raw(raw), signal),
                _ => Err(Errno::ESRCH),
            };
            match &result {
                Ok(()) => log::info!("sent {} to {}", signal, owner),
                Err(e) => log::warn!("could not signal {}: {}", owner, e),
            }
            KillOutcome {
                owner: owner.clone(),
                result,
            }
        })
        .collect()
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
