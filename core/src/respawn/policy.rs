//! Respawn policy table

use std::collections::HashMap;

use spawnwatch_types::{DEFAULT_RESPAWN_WINDOW, RespawnWindow};

/// Per-boss policy entry
#[derive(Debug, Clone, PartialEq)]
struct BossPolicy {
    window: RespawnWindow,
    map: Option<String>,
}

/// Respawn windows keyed by boss name.
///
/// Loaded once at startup; a reload replaces the whole table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RespawnPolicy {
    bosses: HashMap<String, BossPolicy>,
}

impl RespawnPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a boss entry
    pub fn insert(&mut self, name: impl Into<String>, window: RespawnWindow, map: Option<String>) {
        self.bosses.insert(name.into(), BossPolicy { window, map });
    }

    /// Builder-style insert, handy for tests and fixtures
    pub fn with_boss(mut self, name: &str, min_hours: f64, max_hours: f64) -> Self {
        self.insert(name, RespawnWindow::new(min_hours, max_hours), None);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bosses.contains_key(name)
    }

    /// Configured window for a boss, if any
    pub fn get(&self, name: &str) -> Option<RespawnWindow> {
        self.bosses.get(name).map(|p| p.window)
    }

    /// Window for a boss, falling back to the default 24h/32h window
    pub fn window_for(&self, name: &str) -> RespawnWindow {
        self.get(name).unwrap_or(DEFAULT_RESPAWN_WINDOW)
    }

    /// Map the boss lives on, if the table names one
    pub fn map_for(&self, name: &str) -> Option<&str> {
        self.bosses.get(name).and_then(|p| p.map.as_deref())
    }

    /// All boss names, sorted
    pub fn boss_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bosses.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bosses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bosses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_boss_gets_default_window() {
        let policy = RespawnPolicy::new().with_boss("Nix", 48.0, 60.0);
        assert_eq!(policy.window_for("Nix"), RespawnWindow::new(48.0, 60.0));
        assert_eq!(policy.window_for("Someone Else"), RespawnWindow::new(24.0, 32.0));
        assert!(policy.get("Someone Else").is_none());
    }

    #[test]
    fn boss_names_are_sorted() {
        let policy = RespawnPolicy::new()
            .with_boss("Zed", 24.0, 32.0)
            .with_boss("Abe", 24.0, 32.0);
        assert_eq!(policy.boss_names(), vec!["Abe", "Zed"]);
    }
}
