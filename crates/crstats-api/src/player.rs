//! Single-player statistics summary.

use crate::walker::{display_value, walk};
use serde_json::Value;

/// Fields of a player summary, each kept as the raw JSON value found.
///
/// When a key occurs more than once in the document the last visited value wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    /// Player name.
    pub name: Option<Value>,
    /// Player tag, such as `#2PP`.
    pub tag: Option<Value>,
    /// Current arena.
    pub arena: Option<Value>,
    /// Current trophies.
    pub trophies: Option<Value>,
    /// Best season trophies.
    pub best_trophies: Option<Value>,
    /// Most challenge wins.
    pub challenge_maxwins: Option<Value>,
    /// Total wins.
    pub wins: Option<Value>,
    /// Experience level.
    pub exp_level: Option<Value>,
    /// Clan.
    pub clan: Option<Value>,
}

impl PlayerStats {
    /// Extracts the summary fields from a decoded response.
    pub fn from_json(document: &Value) -> Self {
        let mut stats = Self::default();
        walk(document, &mut |slot, value| {
            let target = match slot.key() {
                Some("name") => &mut stats.name,
                Some("tag") => &mut stats.tag,
                Some("arena") => &mut stats.arena,
                Some("trophies") => &mut stats.trophies,
                Some("best_trophies") => &mut stats.best_trophies,
                Some("challenge_maxwins") => &mut stats.challenge_maxwins,
                Some("wins") => &mut stats.wins,
                Some("exp_level") => &mut stats.exp_level,
                Some("clan") => &mut stats.clan,
                _ => return,
            };
            *target = Some(value.clone());
        });
        stats
    }

    /// Label/value pairs in display order.
    pub fn rows(&self) -> [(&'static str, String); 9] {
        let show = |v: &Option<Value>| v.as_ref().map_or_else(|| "N/A".to_string(), display_value);
        [
            ("Name", show(&self.name)),
            ("Tag", show(&self.tag)),
            ("Arena", show(&self.arena)),
            ("Trophies", show(&self.trophies)),
            ("Best trophies", show(&self.best_trophies)),
            ("Challenge max wins", show(&self.challenge_maxwins)),
            ("Wins", show(&self.wins)),
            ("Exp level", show(&self.exp_level)),
            ("Clan", show(&self.clan)),
        ]
    }

    /// Renders the summary as one `Label: \`value\`` line per field.
    pub fn render(&self) -> String {
        self.rows()
            .iter()
            .map(|(label, value)| format!("{label}: `{value}`"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_flat_document() {
        let doc = json!({
            "name": "Alice", "tag": "#AAA", "arena": "Arena 10", "trophies": 5000,
            "best_trophies": 5200, "challenge_maxwins": 12, "wins": 300,
            "exp_level": 13, "clan": "ClanX"
        });
        let stats = PlayerStats::from_json(&doc);

        assert_eq!(stats.name, Some(json!("Alice")));
        assert_eq!(stats.trophies, Some(json!(5000)));
        assert_eq!(
            stats.render(),
            "Name: `Alice`\nTag: `#AAA`\nArena: `Arena 10`\nTrophies: `5000`\n\
             Best trophies: `5200`\nChallenge max wins: `12`\nWins: `300`\n\
             Exp level: `13`\nClan: `ClanX`"
        );
    }

    #[test]
    fn test_finds_fields_inside_wrappers() {
        let doc = json!([{"player": {"wins": 7, "tag": "#B"}}]);
        let stats = PlayerStats::from_json(&doc);
        assert_eq!(stats.wins, Some(json!(7)));
        assert_eq!(stats.tag, Some(json!("#B")));
    }

    #[test]
    fn test_missing_fields_render_as_not_available() {
        let stats = PlayerStats::from_json(&json!({"name": "Bob"}));
        let rows = stats.rows();
        assert_eq!(rows[0], ("Name", "Bob".to_string()));
        assert_eq!(rows[8], ("Clan", "N/A".to_string()));
    }

    #[test]
    fn test_unrelated_document_renders_placeholders() {
        for doc in [json!({"error": "not found"}), json!([])] {
            let stats = PlayerStats::from_json(&doc);
            assert_eq!(stats, PlayerStats::default());
            assert!(stats.rows().iter().all(|(_, value)| value == "N/A"));
        }
    }
}
