use crate::constants::LIST_SIZE_COLUMN_WIDTH;
use crate::core_driver::FileInfo;
use crate::helpers::lpad;

/// Renders directory entries for LIST and NLST.
pub struct ListFormatter {
    files: Vec<FileInfo>,
}

impl ListFormatter {
    pub fn new(files: Vec<FileInfo>) -> Self {
        Self { files }
    }

    /// Names only, one per line.
    pub fn short(&self) -> String {
        self.files
            .iter()
            .map(|file| format!("{}\r\n", file.name))
            .collect()
    }

    /// `ls -l` style lines.
    pub fn detailed(&self) -> String {
        self.files
            .iter()
            .map(|file| {
                format!(
                    "{} 1 {} {} {} {} {}\r\n",
                    file.mode_string(),
                    file.owner,
                    file.group,
                    lpad(&file.size.to_string(), LIST_SIZE_COLUMN_WIDTH),
                    file.mod_time.format("%b %e %H:%M"),
                    file.name
                )
            })
            .collect()
    }
}
