/// Extensions a bill attachment may have, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Message shown next to the file control when a file is rejected.
pub const REJECTION_MESSAGE: &str = "Seuls les fichiers jpg, jpeg et png sont acceptés";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCheck {
    Accepted,
    Rejected(String),
}

impl FileCheck {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FileCheck::Accepted)
    }
}

/// Extension after the last `.`, lowercased. `None` when there is no dot.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Total over all inputs: anything without an accepted extension is rejected.
pub fn validate(filename: &str) -> FileCheck {
    match extension_of(filename) {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => FileCheck::Accepted,
        _ => FileCheck::Rejected(REJECTION_MESSAGE.to_string()),
    }
}
