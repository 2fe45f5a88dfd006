use anyhow::Context;
use fake::rand;
use std::io::Write;
use std::path::Path;

/// Prefix of in-flight temp files; store listings skip names starting with it
pub const TEMP_FILE_PREFIX: &str = "tmp-obj-";

/// Write `content` to `path` via a temp file in the same directory and a rename
///
/// Readers see either the previous content or the new one, never a partial
/// write.
pub fn write_atomically(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .context(format!("Invalid object path {}", path.display()))?;
    let temp_path = dir.join(generate_temp_name());

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .context(format!("Unable to open temp file {}", temp_path.display()))?;

    file.write_all(content)
        .context(format!("Unable to write temp file {}", temp_path.display()))?;
    file.sync_data()
        .context(format!("Unable to flush temp file {}", temp_path.display()))?;

    std::fs::rename(&temp_path, path)
        .context(format!("Unable to rename temp file to {}", path.display()))?;

    Ok(())
}

pub fn is_temp_file(name: &str) -> bool {
    name.starts_with(TEMP_FILE_PREFIX)
}

fn generate_temp_name() -> String {
    format!("{TEMP_FILE_PREFIX}{}", rand::random::<u32>())
}
