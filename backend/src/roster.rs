//! Family-member roster: a configuration-supplied id → {name, color} lookup
//! injected at startup. Unknown ids degrade display (raw id, default color)
//! and are never rejected.

use shared::FamilyMember;

pub const DEFAULT_COLOR: &str = "#9e9e9e";

#[derive(Debug, Clone)]
pub struct Roster {
    members: Vec<FamilyMember>,
}

impl Roster {
    /// Load from a JSON file; any problem falls back to the built-in roster.
    pub fn load(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Vec<FamilyMember>>(&raw) {
                Ok(members) => {
                    tracing::info!("Loaded {} roster members from {}", members.len(), path);
                    Self { members }
                }
                Err(e) => {
                    tracing::warn!("Invalid roster file {}: {}; using built-in roster", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read roster file {}: {}; using built-in roster", path, e);
                Self::default()
            }
        }
    }

    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn get(&self, id: &str) -> Option<&FamilyMember> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Unknown ids fall back to the raw id string.
    pub fn display_name(&self, id: &str) -> String {
        self.get(id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn color(&self, id: &str) -> &str {
        self.get(id).map(|m| m.color.as_str()).unwrap_or(DEFAULT_COLOR)
    }
}

impl Default for Roster {
    fn default() -> Self {
        let member = |id: &str, name: &str, color: &str| FamilyMember {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        };

        Self {
            members: vec![
                member("dad", "Dad", "#4a90d2"),
                member("mom", "Mom", "#e2707f"),
                member("alice", "Alice", "#7cb342"),
                member("ken", "Ken", "#f5a623"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_member_resolves() {
        let roster = Roster::default();
        assert_eq!(roster.display_name("mom"), "Mom");
        assert_eq!(roster.color("mom"), "#e2707f");
    }

    #[test]
    fn unknown_member_degrades_gracefully() {
        let roster = Roster::default();
        assert_eq!(roster.display_name("stranger"), "stranger");
        assert_eq!(roster.color("stranger"), DEFAULT_COLOR);
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let roster = Roster::load(Some("/nonexistent/roster.json"));
        assert!(!roster.members().is_empty());
    }
}
