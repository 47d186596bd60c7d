mod accounts;
mod cli;
mod decode;
mod error;
mod filter;
mod kill;
mod model;
mod output;
mod platform;
mod report;
mod resolver;
mod table;

use std::io;

use clap::Parser;
use cli::CliArgs;
use filter::FilterConfig;
use output::OutputFormatter;

use accounts::AccountDb;
use model::SocketEntry;

fn main() {
    let args = CliArgs::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .format_timestamp(None)
        .init();

    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(if e.is_user_error() { 2 } else { 1 });
        }
    }
}

fn run(args: &CliArgs) -> error::Result<i32> {
    let filter_config = FilterConfig::from_cli(args)?;
    // Reject a bad signal before doing any work.
    let signal = match args.kill {
        Some(_) => Some(kill::parse_signal(&args.signal)?),
        None => None,
    };

    let accounts = match &args.passwd {
        Some(path) => AccountDb::load(path)?,
        None => AccountDb::system()?,
    };
    log::debug!("{} accounts loaded", accounts.len());

    let tree = platform::create_tree(&args.proc_root);
    let entries = report::scan(&args.proc_root, &filter_config, &*tree, &accounts)?;
    warn_unresolved(&entries);

    match (signal, filter_config.port) {
        (Some(signal), Some(port)) => run_kill(&entries, port, signal, args.yes),
        _ => {
            OutputFormatter::from_cli(args).print(&entries);
            Ok(0)
        }
    }
}

/// Without root only our own descriptors are visible.
fn warn_unresolved(entries: &[SocketEntry]) {
    let unresolved = entries.iter().filter(|e| e.owner.is_none()).count();
    if unresolved > 0 && !nix::unistd::geteuid().is_root() {
        log::warn!(
            "{} sockets could not be matched to a process; run as root to see all owners",
            unresolved
        );
    }
}

fn run_kill(
    entries: &[SocketEntry],
    port: u16,
    signal: nix::sys::signal::Signal,
    assume_yes: bool,
) -> error::Result<i32> {
    let owners = kill::owners_on_port(entries, port);
    if owners.is_empty() {
        println!("nothing to kill on port {}", port);
        return Ok(0);
    }

    for owner in &owners {
        println!("{}", owner);
    }

    if !assume_yes {
        let prompt = format!("Kill {} process(es) on port {}?", owners.len(), port);
        let confirmed = kill::confirm(&prompt, &mut io::stdin().lock(), &mut io::stdout())
            .map_err(|e| error::WhoportError::io("stdin", e))?;
        if !confirmed {
            println!("aborted");
            return Ok(0);
        }
    }

    let outcomes = kill::kill_owners(&owners, signal, |pid, sig| nix::sys::signal::kill(pid, sig));
    let mut failed = false;
    for outcome in &outcomes {
        match outcome.result {
            Ok(()) => println!("{}: killed", outcome.owner),
            Err(errno) => {
                failed = true;
                println!("{}: failed: {}", outcome.owner, errno);
            }
        }
    }

    Ok(if failed { 1 } else { 0 })
}
