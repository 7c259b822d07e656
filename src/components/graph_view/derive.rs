//! Entity types → canvas nodes and edges.

use std::collections::HashMap;

use super::config::{EntityMetadataMap, GraphConfig};
use super::coords::CoordinateCache;
use super::schema::{Cardinality, EntityType};
use crate::components::force_graph::{
	ArrowGlyph, ChosenEdgeStyle, ChosenNodeStyle, EdgeKey, GraphEdge, GraphNode, NodeColor,
};

const EDGE_TITLE: &str = "Edit Relationship";

/// Everything besides the entity list that shapes a node.
pub struct NodeInputs<'a> {
	pub metadata: &'a EntityMetadataMap,
	/// Entity names to keep in color; empty means no filter.
	pub filtered: &'a [String],
	pub selected_entity: Option<&'a str>,
	/// Entity the host has picked out; the selection border is only drawn
	/// while there is one.
	pub entity_selected: Option<&'a str>,
	pub coords: &'a CoordinateCache,
	pub config: &'a GraphConfig,
}

impl NodeInputs<'_> {
	pub fn node_color(&self, entity_name: &str) -> String {
		if !self.filtered.is_empty() && !self.filtered.iter().any(|f| f == entity_name) {
			return self.config.muted_node_color.clone();
		}
		self.config.entity_color(self.metadata, entity_name)
	}

	pub fn node_label(&self, entity_name: &str) -> String {
		let instances = self
			.metadata
			.get(entity_name)
			.and_then(|m| m.instances)
			.unwrap_or(0);
		format!("{entity_name}\n{instances}")
	}
}

pub fn get_nodes(entity_types: &[EntityType], inputs: &NodeInputs) -> Vec<GraphNode> {
	let config = inputs.config;
	entity_types
		.iter()
		.map(|e| {
			let name = e.entity_name.as_str();
			let background = inputs.node_color(name);
			let selected = inputs.entity_selected.is_some() && inputs.selected_entity == Some(name);
			let (border, border_width) = if selected {
				(config.select_color.clone(), config.select_border_width)
			} else {
				(background.clone(), 0.0)
			};
			GraphNode {
				id: name.to_string(),
				label: Some(inputs.node_label(name)),
				title: Some(format!("{name} tooltip text")),
				color: NodeColor { background, border },
				border_width,
				position: inputs.coords.get(name).map(|c| (c.graph_x, c.graph_y)),
				chosen: Some(ChosenNodeStyle {
					hover_fill: config.hover_color.clone(),
					select_border: config.select_color.clone(),
					select_border_width: config.select_border_width,
				}),
			}
		})
		.collect()
}

/// What an edge id stands for.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeMeta {
	pub relationship_name: String,
	pub join_property_name: Option<String>,
	pub cardinality: Cardinality,
}

pub type EdgeMetaTable = HashMap<EdgeKey, EdgeMeta>;

pub fn edge_id(relationship_name: &str, join_property_name: Option<&str>) -> String {
	format!(
		"{relationship_name}-{}-edge",
		join_property_name.unwrap_or_default()
	)
}

/// Reads relationship and join-property names back out of an edge id by
/// position. Names containing `-` come back truncated.
pub fn parse_edge_id(edge_id: &str) -> (String, Option<String>) {
	let mut parts = edge_id.split('-');
	let relationship = parts.next().unwrap_or_default().to_string();
	let join = parts
		.next()
		.filter(|s| !s.is_empty())
		.map(str::to_string);
	(relationship, join)
}

pub fn get_edges(
	entity_types: &[EntityType],
	config: &GraphConfig,
) -> (Vec<GraphEdge>, EdgeMetaTable) {
	let mut edges = Vec::new();
	let mut table = EdgeMetaTable::new();
	for e in entity_types {
		for (name, property) in e.properties() {
			let Some(relation) = property.relation() else {
				continue;
			};
			let id = edge_id(name, relation.join_property_name);
			let (arrow, arrow_strikethrough) = match relation.cardinality {
				Cardinality::OneToOne => (ArrowGlyph::OneToOne, true),
				Cardinality::OneToMany => (ArrowGlyph::OneToMany, false),
			};
			table.insert(
				EdgeKey::new(&e.entity_name, &id),
				EdgeMeta {
					relationship_name: name.clone(),
					join_property_name: relation.join_property_name.map(str::to_string),
					cardinality: relation.cardinality,
				},
			);
			edges.push(GraphEdge {
				id,
				from: e.entity_name.clone(),
				to: relation.target.to_string(),
				label: Some(name.clone()),
				title: Some(EDGE_TITLE.to_string()),
				color: config.edge_color.clone(),
				arrow,
				arrow_strikethrough,
				chosen: Some(ChosenEdgeStyle {
					hover_color: config.edge_hover_color.clone(),
				}),
			});
		}
	}
	(edges, table)
}
