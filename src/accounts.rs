use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, WhoportError};

pub const SYSTEM_PASSWD: &str = "/etc/passwd";

/// uid -> account name, built from a passwd-format file.
#[derive(Debug, Default)]
pub struct AccountDb {
    names: HashMap<u32, String>,
    /// Ask the system user database (NSS) about uids the file lacks.
    system_fallback: bool,
}

impl AccountDb {
    /// Parse `name:passwd:uid:...` lines. Later lines win on duplicate uids.
    pub fn parse(content: &str) -> Self {
        let mut names = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split(':').collect();
            if fields.len() < 3 {
                log::debug!("account line {}: too few fields, skipped", idx + 1);
                continue;
            }
            match fields[2].parse::<u32>() {
                Ok(uid) => {
                    names.insert(uid, fields[0].to_string());
                }
                Err(_) => {
                    log::debug!("account line {}: bad uid {:?}, skipped", idx + 1, fields[2]);
                }
            }
        }
        Self {
            names,
            system_fallback: false,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| WhoportError::io(path, e))?;
        Ok(Self::parse(&content))
    }

    /// Load `/etc/passwd` and fall back to NSS for anything it lacks.
    pub fn system() -> Result<Self> {
        let mut db = Self::load(Path::new(SYSTEM_PASSWD))?;
        db.system_fallback = true;
        Ok(db)
    }

    /// Account name for `uid`, or `None` when no source knows it.
    pub fn username(&self, uid: u32) -> Option<String> {
        if let Some(name) = self.names.get(&uid) {
            return Some(name.clone());
        }
        if self.system_fallback {
            return users::get_user_by_uid(uid).map(|u| u.name().to_string_lossy().to_string());
        }
        None
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
