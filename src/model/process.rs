use std::fmt;

/// The process found holding a descriptor for a socket inode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub pid: u32,
    pub program_name: String,
}

impl ProcessIdentity {
    pub fn new(pid: u32, program_name: impl Into<String>) -> Self {
        Self {
            pid,
            program_name: program_name.into(),
        }
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pid, self.program_name)
    }
}
