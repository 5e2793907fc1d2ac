//! Respawn policy loading
//!
//! Load respawn windows from TOML files. Each file holds a list of `[[boss]]`
//! entries; a directory may split the table across several files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spawnwatch_types::RespawnWindow;

use super::window::MAX_WINDOW_HOURS;
use super::{PolicyError, RespawnPolicy};

/// Root of a policy TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyFile {
    #[serde(default, rename = "boss")]
    pub bosses: Vec<PolicyEntry>,
}

/// One `[[boss]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub name: String,

    /// Map the boss spawns on (informational)
    #[serde(default)]
    pub map: Option<String>,

    pub min_hours: f64,
    pub max_hours: f64,
}

impl PolicyEntry {
    fn validate(&self, path: &Path) -> Result<(), PolicyError> {
        let invalid = |reason: &str| PolicyError::InvalidWindow {
            path: path.to_path_buf(),
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("boss name is empty"));
        }
        if !self.min_hours.is_finite() || !self.max_hours.is_finite() {
            return Err(invalid("hours must be finite numbers"));
        }
        if self.min_hours <= 0.0 {
            return Err(invalid("min_hours must be positive"));
        }
        if self.min_hours > self.max_hours {
            return Err(invalid("min_hours is greater than max_hours"));
        }
        if self.max_hours > MAX_WINDOW_HOURS {
            return Err(invalid("respawn window longer than one year"));
        }
        Ok(())
    }
}

/// Parse policy TOML content. `path` is only used for error context.
pub fn parse_policy(content: &str, path: &Path) -> Result<Vec<PolicyEntry>, PolicyError> {
    let file: PolicyFile = toml::from_str(content).map_err(|source| PolicyError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    for entry in &file.bosses {
        entry.validate(path)?;
    }

    Ok(file.bosses)
}

/// Load a policy table from a single TOML file
pub fn load_policy_from_file(path: &Path) -> Result<RespawnPolicy, PolicyError> {
    let mut policy = RespawnPolicy::new();
    let mut seen = HashSet::new();
    merge_file(path, &mut policy, &mut seen)?;

    tracing::info!(path = %path.display(), bosses = policy.len(), "Loaded respawn policy");
    Ok(policy)
}

/// Load a policy table from every `.toml` file under a directory (recursive)
pub fn load_policy_from_dir(dir: &Path) -> Result<RespawnPolicy, PolicyError> {
    let mut policy = RespawnPolicy::new();
    if !dir.exists() {
        return Ok(policy);
    }

    let mut files = Vec::new();
    collect_toml_files(dir, &mut files)?;
    // Directory order is platform dependent; keep duplicate reporting stable
    files.sort();

    let mut seen = HashSet::new();
    for path in &files {
        merge_file(path, &mut policy, &mut seen)?;
    }

    tracing::info!(
        dir = %dir.display(),
        files = files.len(),
        bosses = policy.len(),
        "Loaded respawn policy directory"
    );
    Ok(policy)
}

fn collect_toml_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), PolicyError> {
    let entries = fs::read_dir(dir).map_err(|source| PolicyError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_toml_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    Ok(())
}

fn merge_file(
    path: &Path,
    policy: &mut RespawnPolicy,
    seen: &mut HashSet<String>,
) -> Result<(), PolicyError> {
    let content = fs::read_to_string(path).map_err(|source| PolicyError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    for entry in parse_policy(&content, path)? {
        if !seen.insert(entry.name.clone()) {
            return Err(PolicyError::DuplicateBoss {
                path: path.to_path_buf(),
                name: entry.name,
            });
        }
        policy.insert(
            entry.name,
            RespawnWindow::new(entry.min_hours, entry.max_hours),
            entry.map,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[boss]]
name = "Nix"
map = "Frozen Reach"
min_hours = 48
max_hours = 60

[[boss]]
name = "TestBoss"
min_hours = 24.0
max_hours = 32.0
"#;

    #[test]
    fn parse_policy_entries() {
        let entries = parse_policy(SAMPLE, Path::new("respawn.toml")).expect("Failed to parse TOML");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Nix");
        assert_eq!(entries[0].map.as_deref(), Some("Frozen Reach"));
        assert_eq!(entries[0].min_hours, 48.0);
        assert_eq!(entries[1].map, None);
    }

    #[test]
    fn rejects_inverted_window() {
        let toml = r#"
[[boss]]
name = "Backwards"
min_hours = 30
max_hours = 20
"#;
        let err = parse_policy(toml, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidWindow { ref name, .. } if name == "Backwards"));
    }

    #[test]
    fn rejects_window_longer_than_a_year() {
        let toml = r#"
[[boss]]
name = "Ancient"
min_hours = 1e12
max_hours = 1e12
"#;
        let err = parse_policy(toml, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidWindow { ref name, .. } if name == "Ancient"));
    }

    #[test]
    fn rejects_missing_hours() {
        let toml = r#"
[[boss]]
name = "Incomplete"
min_hours = 30
"#;
        let err = parse_policy(toml, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, PolicyError::ParseToml { .. }));
    }

    #[test]
    fn load_file_builds_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("respawn.toml");
        fs::write(&path, SAMPLE).unwrap();

        let policy = load_policy_from_file(&path).unwrap();
        assert_eq!(policy.len(), 2);
        assert_eq!(policy.window_for("Nix"), RespawnWindow::new(48.0, 60.0));
        assert_eq!(policy.map_for("Nix"), Some("Frozen Reach"));
    }

    #[test]
    fn load_dir_merges_files_and_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("north")).unwrap();
        fs::write(dir.path().join("a.toml"), SAMPLE).unwrap();
        fs::write(
            dir.path().join("north").join("b.toml"),
            "[[boss]]\nname = \"Frost Wyrm\"\nmin_hours = 12\nmax_hours = 16\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let policy = load_policy_from_dir(dir.path()).unwrap();
        assert_eq!(policy.boss_names(), vec!["Frost Wyrm", "Nix", "TestBoss"]);

        fs::write(dir.path().join("c.toml"), SAMPLE).unwrap();
        let err = load_policy_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, PolicyError::DuplicateBoss { .. }));
    }

    #[test]
    fn missing_dir_is_empty_policy() {
        let policy = load_policy_from_dir(Path::new("/definitely/not/here")).unwrap();
        assert!(policy.is_empty());
    }
}
