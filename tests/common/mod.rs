#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::symlink;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

pub const HEADER: &str =
    "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode\n";

/// A directory laid out like /proc plus a passwd file next to it.
pub struct FakeHost {
    dir: TempDir,
}

impl FakeHost {
    /// Every socket table exists but is empty.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("proc/net")).unwrap();
        for table in ["tcp", "tcp6", "udp", "udp6"] {
            fs::write(dir.path().join("proc/net").join(table), HEADER).unwrap();
        }
        fs::write(dir.path().join("passwd"), "root:x:0:0:root:/root:/bin/bash\n").unwrap();
        FakeHost { dir }
    }

    pub fn proc_root(&self) -> PathBuf {
        self.dir.path().join("proc")
    }

    pub fn passwd(&self) -> PathBuf {
        self.dir.path().join("passwd")
    }

    /// Append data lines (without the header) to a socket table.
    pub fn table(self, name: &str, lines: &[String]) -> Self {
        let mut content = HEADER.to_string();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(self.proc_root().join("net").join(name), content).unwrap();
        self
    }

    pub fn process(self, pid: u32, comm: &str, inodes: &[u64]) -> Self {
        let dir = self.proc_root().join(pid.to_string());
        fs::create_dir_all(dir.join("fd")).unwrap();
        fs::write(dir.join("comm"), format!("{}\n", comm)).unwrap();
        for (fd, inode) in inodes.iter().enumerate() {
            symlink(format!("socket:[{}]", inode), dir.join("fd").join((fd + 3).to_string()))
                .unwrap();
        }
        self
    }

    pub fn remove(self, relative: &str) -> Self {
        fs::remove_file(self.proc_root().join(relative)).unwrap();
        self
    }

    pub fn whoport(&self) -> Command {
        let mut cmd = Command::cargo_bin("whoport").unwrap();
        cmd.arg("--proc-root")
            .arg(self.proc_root())
            .arg("--passwd")
            .arg(self.passwd())
            .env_remove("RUST_LOG");
        cmd
    }
}

/// A /proc/net/tcp line: LISTEN on 0.0.0.0:`port`.
pub fn tcp_listen(port: u16, uid: u32, inode: u64) -> String {
    format!(
        "   0: 00000000:{:04X} 00000000:0000 0A 00000000:00000000 00:00000000 00000000 {:>5}        0 {} 1 0000000000000000 100 0 0 10 0",
        port, uid, inode
    )
}

/// A /proc/net/tcp6 line: LISTEN on [::]:`port`.
pub fn tcp6_listen(port: u16, uid: u32, inode: u64) -> String {
    format!(
        "   0: 00000000000000000000000000000000:{:04X} 00000000000000000000000000000000:0000 0A 00000000:00000000 00:00000000 00000000 {:>5}        0 {} 1 0000000000000000 100 0 0 10 0",
        port, uid, inode
    )
}

/// A /proc/net/udp line bound to 0.0.0.0:`port`.
pub fn udp_bound(port: u16, uid: u32, inode: u64) -> String {
    format!(
        "   0: 00000000:{:04X} 00000000:0000 07 00000000:00000000 00:00000000 00000000 {:>5}        0 {} 2 0000000000000000 0",
        port, uid, inode
    )
}
