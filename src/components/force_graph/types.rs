use serde::Deserialize;

use super::style::{ArrowGlyph, ChosenEdgeStyle, ChosenNodeStyle};

/// A node as handed to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	/// Newline separated; the first line renders bold.
	pub label: Option<String>,
	pub title: Option<String>,
	pub color: NodeColor,
	pub border_width: f64,
	/// Fixed canvas position. Nodes carrying one are anchored.
	pub position: Option<(f64, f64)>,
	pub chosen: Option<ChosenNodeStyle>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeColor {
	pub background: String,
	pub border: String,
}

/// A directed edge as handed to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub id: String,
	pub from: String,
	pub to: String,
	pub label: Option<String>,
	pub title: Option<String>,
	pub color: String,
	pub arrow: ArrowGlyph,
	/// When cleared the line stops short of the glyph instead of running through it.
	pub arrow_strikethrough: bool,
	pub chosen: Option<ChosenEdgeStyle>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

/// Force simulation tuning, mapped onto `force_graph::SimulationParameters`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsSettings {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	/// Largest per-tick node displacement still counted as "at rest".
	pub rest_threshold: f64,
	/// Consecutive resting ticks before the layout reports itself stabilized.
	pub rest_ticks: u32,
}

impl Default for PhysicsSettings {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			rest_threshold: 0.05,
			rest_ticks: 30,
		}
	}
}
