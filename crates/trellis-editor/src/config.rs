//! Per-canvas configuration.

use serde::Deserialize;

/// Settings for one [`crate::Canvas`]. Hosts may pass these as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Maximum number of undo snapshots kept.
    pub history_depth: usize,
    /// Prefix of generated element ids.
    pub id_prefix: String,
    /// Ask before a load replaces non-empty canvas content.
    pub confirm_replace: bool,
    /// Property panel text shown when nothing is selected.
    pub empty_panel_message: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            history_depth: 100,
            id_prefix: "el".to_string(),
            confirm_replace: true,
            empty_panel_message: "Select an element to edit its properties".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: CanvasConfig = serde_json::from_str(r#"{"idPrefix": "node", "historyDepth": 5}"#).unwrap();
        assert_eq!(config.id_prefix, "node");
        assert_eq!(config.history_depth, 5);
        assert!(config.confirm_replace);
        assert_eq!(config.empty_panel_message, CanvasConfig::default().empty_panel_message);
    }
}
