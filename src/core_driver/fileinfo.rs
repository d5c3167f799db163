use chrono::{DateTime, Utc};

/// One entry of a directory listing as reported by a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
    pub mod_time: DateTime<Utc>,
    /// Unix permission bits, e.g. `0o644`.
    pub mode: u32,
    pub owner: String,
    pub group: String,
}

impl FileInfo {
    pub fn new_dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            is_dir: true,
            mod_time: Utc::now(),
            mode: 0o755,
            owner: "owner".to_string(),
            group: "group".to_string(),
        }
    }

    pub fn new_file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            is_dir: false,
            mod_time: Utc::now(),
            mode: 0o644,
            owner: "owner".to_string(),
            group: "group".to_string(),
        }
    }

    pub fn with_mod_time(mut self, mod_time: DateTime<Utc>) -> Self {
        self.mod_time = mod_time;
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>, group: impl Into<String>) -> Self {
        self.owner = owner.into();
        self.group = group.into();
        self
    }

    /// Renders the entry type and permission bits the way `ls -l` does.
    pub fn mode_string(&self) -> String {
        let mut out = String::with_capacity(10);
        out.push(if self.is_dir { 'd' } else { '-' });
        for shift in [6u32, 3, 0] {
            let bits = (self.mode >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        out
    }
}
