use anyhow::Result;
use serde::Deserialize;

/// Tunables of the explorer. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Case-sensitive file name suffix that a file must carry to be read.
    pub accepted_extension: String,
    pub point_radius: u32,
    /// Radius of a hovered point, and how far from a point a hover still hits it.
    pub hover_radius: u32,
    pub chart_margin: u32,
    pub label_area_size: u32,
    pub font_size: u32,
    /// Size of the chart in pixels. Canvas surfaces resize their canvas to it.
    pub width: u32,
    pub height: u32,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            accepted_extension: ".tsv".into(),
            point_radius: 5,
            hover_radius: 7,
            chart_margin: 20,
            label_area_size: 50,
            font_size: 16,
            width: 800,
            height: 600,
        }
    }
}

impl ExplorerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = ExplorerConfig::from_json("{}").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.accepted_extension, ".tsv");
    }

    #[test]
    fn partial_override() {
        let config = ExplorerConfig::from_json(r#"{"point_radius": 3, "width": 1000}"#).unwrap();
        assert_eq!(config.point_radius, 3);
        assert_eq!(config.width, 1000);
        assert_eq!(config.hover_radius, 7);
    }

    #[test]
    fn unknown_field() {
        assert!(ExplorerConfig::from_json(r#"{"colour": "red"}"#).is_err());
    }
}
