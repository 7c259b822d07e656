use std::collections::HashMap;

use serde::Deserialize;

use crate::components::force_graph::PhysicsSettings;

/// Per-entity display data supplied by the host.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EntityMetadata {
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub instances: Option<u64>,
}

pub type EntityMetadataMap = HashMap<String, EntityMetadata>;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphConfig {
	pub default_node_color: String,
	/// Fill for nodes outside an active filter.
	pub muted_node_color: String,
	pub select_color: String,
	pub hover_color: String,
	pub select_border_width: f64,
	pub edge_color: String,
	pub edge_hover_color: String,
	/// Gap between a right-clicked node and the menu opened for it.
	pub context_menu_offset: f64,
	pub physics: PhysicsSettings,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			default_node_color: "#cfe3e8".into(),
			muted_node_color: "#F5F5F5".into(),
			select_color: "#5b69af".into(),
			hover_color: "#edf7fb".into(),
			select_border_width: 3.0,
			edge_color: "#666".into(),
			edge_hover_color: "#7FADE3".into(),
			context_menu_offset: 40.0,
			physics: PhysicsSettings::default(),
		}
	}
}

impl GraphConfig {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Metadata color of an entity, or the default node color.
	pub fn entity_color(&self, metadata: &EntityMetadataMap, entity_name: &str) -> String {
		metadata
			.get(entity_name)
			.and_then(|m| m.color.clone())
			.unwrap_or_else(|| self.default_node_color.clone())
	}
}
