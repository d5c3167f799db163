use crate::core_driver::DriverError;

/// Ownership and permission metadata for listed entries.
pub trait Perm: Send + Sync {
    fn get_owner(&self, path: &str) -> Result<String, DriverError>;
    fn get_group(&self, path: &str) -> Result<String, DriverError>;
    fn get_mode(&self, path: &str) -> Result<u32, DriverError>;

    fn ch_owner(&self, path: &str, owner: &str) -> Result<(), DriverError>;
    fn ch_group(&self, path: &str, group: &str) -> Result<(), DriverError>;
    fn ch_mode(&self, path: &str, mode: u32) -> Result<(), DriverError>;
}

/// Reports the same owner, group and file mode for every path and ignores changes.
#[derive(Debug, Clone)]
pub struct SimplePerm {
    owner: String,
    group: String,
    file_mode: u32,
}

impl SimplePerm {
    pub fn new(owner: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            group: group.into(),
            file_mode: 0o644,
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }
}

impl Perm for SimplePerm {
    fn get_owner(&self, _path: &str) -> Result<String, DriverError> {
        Ok(self.owner.clone())
    }

    fn get_group(&self, _path: &str) -> Result<String, DriverError> {
        Ok(self.group.clone())
    }

    fn get_mode(&self, _path: &str) -> Result<u32, DriverError> {
        Ok(self.file_mode)
    }

    fn ch_owner(&self, _path: &str, _owner: &str) -> Result<(), DriverError> {
        Ok(())
    }

    fn ch_group(&self, _path: &str, _group: &str) -> Result<(), DriverError> {
        Ok(())
    }

    fn ch_mode(&self, _path: &str, _mode: u32) -> Result<(), DriverError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_perm() {
        let perm = SimplePerm::new("test", "staff").with_mode(0o600);
        assert_eq!(perm.get_owner("/a").unwrap(), "test");
        assert_eq!(perm.get_group("/a").unwrap(), "staff");
        assert_eq!(perm.get_mode("/a").unwrap(), 0o600);
        assert!(perm.ch_mode("/a", 0o777).is_ok());
        assert_eq!(perm.get_mode("/a").unwrap(), 0o600);
    }
}
