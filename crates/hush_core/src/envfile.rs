//! Line-preserving `.env` rewriter.
//!
//! Deployment produces identifiers (contract id, token address) that later
//! invocations read back from the environment file. Rewrites keep comments
//! and unrelated lines intact and replace the file atomically.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// An environment file held as raw lines.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl EnvFile {
    /// Load an env file. A missing file starts empty and is created on save.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let lines = if path.exists() {
            fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?
                .lines()
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };
        Ok(Self { path, lines })
    }

    /// Current value of a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .find_map(|line| line.strip_prefix(&format!("{key}=")))
    }

    /// Set a key, replacing its first occurrence or appending a new line.
    pub fn set(&mut self, key: &str, value: &str) {
        let entry = format!("{key}={value}");
        match self
            .lines
            .iter_mut()
            .find(|line| line.starts_with(&format!("{key}=")))
        {
            Some(line) => *line = entry,
            None => self.lines.push(entry),
        }
    }

    /// Write the file back atomically (temp file + rename).
    pub fn save(&self) -> Result<()> {
        let mut content = self.lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        let tmp = tmp_path_for(&self.path);
        fs::write(&tmp, content)
            .with_context(|| format!("failed to write temp file {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        info!(path = %self.path.display(), "environment file updated");
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_existing_key_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "# operator settings\nHUSH_OPERATOR_ID=0.0.1\nHUSH_CONTRACT_ADDRESS=0.0.2\n",
        )
        .unwrap();

        let mut env = EnvFile::load(&path).unwrap();
        env.set("HUSH_CONTRACT_ADDRESS", "0.0.99");
        env.save().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "# operator settings\nHUSH_OPERATOR_ID=0.0.1\nHUSH_CONTRACT_ADDRESS=0.0.99\n"
        );
    }

    #[test]
    fn set_appends_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "HUSH_OPERATOR_ID=0.0.1\n").unwrap();

        let mut env = EnvFile::load(&path).unwrap();
        env.set("HUSH_TOKEN_ADDRESS", "0xabc");
        env.save().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("HUSH_TOKEN_ADDRESS=0xabc\n"));
        assert!(written.starts_with("HUSH_OPERATOR_ID=0.0.1\n"));
    }

    #[test]
    fn missing_file_starts_empty_and_is_created_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        let mut env = EnvFile::load(&path).unwrap();
        assert!(env.get("ANY").is_none());
        env.set("HUSH_CONTRACT_ADDRESS", "0.0.7");
        env.save().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "HUSH_CONTRACT_ADDRESS=0.0.7\n"
        );
    }

    #[test]
    fn get_reads_current_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "A=1\nB=two\n").unwrap();

        let env = EnvFile::load(&path).unwrap();
        assert_eq!(env.get("B"), Some("two"));
        assert_eq!(env.get("C"), None);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        let mut env = EnvFile::load(&path).unwrap();
        env.set("K", "v");
        env.save().unwrap();

        assert!(!dir.path().join(".env.tmp").exists());
    }
}
