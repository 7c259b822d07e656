use std::collections::{BTreeMap, HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::warn;

use super::network::{EdgeKey, Network, NetworkError, NetworkEvent, Position};
use super::style::{ChosenEdgeStyle, ChosenNodeStyle, EdgeStyle, NodeStyle, VisualState};
use super::types::{GraphData, GraphNode, PhysicsSettings};

pub const DRAG_THRESHOLD: f64 = 3.0;
pub const EDGE_HIT_WIDTH: f64 = 6.0;
pub const LOOP_RADIUS: f64 = 14.0;
pub const LINE_HEIGHT: f64 = 16.0;

const CHAR_WIDTH: f64 = 7.5;
const PADDING_X: f64 = 10.0;
const PADDING_Y: f64 = 8.0;
const MIN_NODE_WIDTH: f64 = 40.0;
const FOCUS_DURATION: f64 = 0.5;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: Option<String>,
	pub title: Option<String>,
	pub base: NodeStyle,
	pub chosen: Option<ChosenNodeStyle>,
	pub half_width: f64,
	pub half_height: f64,
}

impl NodeInfo {
	fn new(node: &GraphNode) -> Self {
		let (half_width, half_height) = box_extent(node.label.as_deref());
		Self {
			id: node.id.clone(),
			label: node.label.clone(),
			title: node.title.clone(),
			base: NodeStyle {
				fill: node.color.background.clone(),
				border_color: node.color.border.clone(),
				border_width: node.border_width,
			},
			chosen: node.chosen.clone(),
			half_width,
			half_height,
		}
	}
}

/// Half extents of the box a label is drawn in.
fn box_extent(label: Option<&str>) -> (f64, f64) {
	let lines: Vec<&str> = label.map(|l| l.lines().collect()).unwrap_or_default();
	let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
	let width = (widest * CHAR_WIDTH + 2.0 * PADDING_X).max(MIN_NODE_WIDTH);
	let height = lines.len().max(1) as f64 * LINE_HEIGHT + 2.0 * PADDING_Y;
	(width / 2.0, height / 2.0)
}

#[derive(Clone, Debug)]
pub struct EdgeEntry {
	pub key: EdgeKey,
	pub from: DefaultNodeIdx,
	pub to: DefaultNodeIdx,
	pub label: Option<String>,
	pub title: Option<String>,
	pub base: EdgeStyle,
	pub chosen: Option<ChosenEdgeStyle>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeBox {
	pub x: f64,
	pub y: f64,
	pub half_width: f64,
	pub half_height: f64,
}

impl NodeBox {
	fn contains(&self, x: f64, y: f64) -> bool {
		(x - self.x).abs() <= self.half_width && (y - self.y).abs() <= self.half_height
	}

	/// Point where the ray from the center towards `(ux, uy)` leaves the box.
	pub fn boundary(&self, ux: f64, uy: f64) -> (f64, f64) {
		let tx = if ux.abs() > f64::EPSILON {
			self.half_width / ux.abs()
		} else {
			f64::INFINITY
		};
		let ty = if uy.abs() > f64::EPSILON {
			self.half_height / uy.abs()
		} else {
			f64::INFINITY
		};
		let t = tx.min(ty);
		(self.x + ux * t, self.y + uy * t)
	}

	pub fn loop_center(&self) -> (f64, f64) {
		(self.x + self.half_width, self.y - self.half_height)
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub pressed: bool,
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub edge: Option<usize>,
}

#[derive(Clone, Debug)]
struct FocusAnimation {
	from: (f64, f64),
	to: (f64, f64),
	t: f64,
}

#[derive(Clone, Debug, Default)]
struct RestState {
	quiet_ticks: u32,
	settled: bool,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	settings: PhysicsSettings,
	physics_enabled: bool,
	ids: HashMap<String, DefaultNodeIdx>,
	edges: Vec<EdgeEntry>,
	selected: HashSet<DefaultNodeIdx>,
	focus: Option<FocusAnimation>,
	rest: RestState,
	events: Vec<NetworkEvent>,
}

fn simulation(settings: &PhysicsSettings) -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: settings.force_charge,
		force_spring: settings.force_spring,
		force_max: settings.force_max,
		node_speed: settings.node_speed,
		damping_factor: settings.damping_factor,
	})
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < f64::EPSILON {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		settings: PhysicsSettings,
		physics_enabled: bool,
	) -> Self {
		let mut state = Self {
			graph: simulation(&settings),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			settings,
			physics_enabled,
			ids: HashMap::new(),
			edges: Vec::new(),
			selected: HashSet::new(),
			focus: None,
			rest: RestState::default(),
			events: Vec::new(),
		};
		state.set_data(data);
		state
	}

	/// Rebuilds the simulation from `data`. Nodes that survive keep their
	/// current position and selection unless `data` pins them elsewhere, and a
	/// drag in progress carries on if its node survives.
	pub fn set_data(&mut self, data: &GraphData) {
		let previous = self.positions(None);
		let selected = self.selected_ids();
		let dragged = self.drag.node_idx.and_then(|idx| self.id_of(idx));
		let mut graph = simulation(&self.settings);
		let mut ids = HashMap::new();
		let radius = (data.nodes.len() as f64 * 25.0).max(100.0);

		for (i, node) in data.nodes.iter().enumerate() {
			if ids.contains_key(&node.id) {
				warn!("duplicate node `{}` ignored", node.id);
				continue;
			}
			let (x, y, is_anchor) = match (node.position, previous.get(&node.id)) {
				(Some((x, y)), _) => (x, y, true),
				(None, Some(p)) => (p.x, p.y, false),
				(None, None) => {
					let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
					(radius * angle.cos(), radius * angle.sin(), false)
				}
			};
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo::new(node),
			});
			ids.insert(node.id.clone(), idx);
		}

		let mut edges = Vec::new();
		let mut seen = HashSet::new();
		let mut linked = HashSet::new();
		for edge in &data.edges {
			if !seen.insert((edge.from.as_str(), edge.id.as_str())) {
				warn!("duplicate edge `{}` from `{}` ignored", edge.id, edge.from);
				continue;
			}
			let (Some(&from), Some(&to)) = (ids.get(&edge.from), ids.get(&edge.to)) else {
				warn!("edge `{}` points at a node that is not in the graph", edge.id);
				continue;
			};
			// self loops and parallel edges are drawn but not simulated
			if from != to && linked.insert((from, to)) {
				graph.add_edge(from, to, EdgeData::default());
			}
			edges.push(EdgeEntry {
				key: EdgeKey::new(&edge.from, &edge.id),
				from,
				to,
				label: edge.label.clone(),
				title: edge.title.clone(),
				base: EdgeStyle {
					color: edge.color.clone(),
					arrow: edge.arrow,
					arrow_strikethrough: edge.arrow_strikethrough,
				},
				chosen: edge.chosen.clone(),
			});
		}

		let node_set_changed =
			previous.len() != ids.len() || ids.keys().any(|id| !previous.contains_key(id));
		self.selected = selected.iter().filter_map(|id| ids.get(id).copied()).collect();
		if let Some(id) = dragged {
			match ids.get(&id) {
				Some(&idx) => self.drag.node_idx = Some(idx),
				None => {
					if self.drag.active {
						self.events.push(NetworkEvent::DragEnd { nodes: Vec::new() });
					}
					self.drag = DragState::default();
				}
			}
		}
		self.graph = graph;
		self.ids = ids;
		self.edges = edges;
		self.hover = HoverState::default();
		self.rest = RestState::default();
		// without physics the layout is final as soon as it is placed
		if !self.physics_enabled {
			self.rest.settled = true;
			if node_set_changed {
				self.events.push(NetworkEvent::Stabilized);
			}
		}
	}

	pub fn edges(&self) -> &[EdgeEntry] {
		&self.edges
	}

	pub fn take_events(&mut self) -> Vec<NetworkEvent> {
		std::mem::take(&mut self.events)
	}

	pub fn selected_ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self
			.selected
			.iter()
			.filter_map(|&idx| self.id_of(idx))
			.collect();
		ids.sort();
		ids
	}

	fn id_of(&self, idx: DefaultNodeIdx) -> Option<String> {
		self.ids
			.iter()
			.find(|&(_, &i)| i == idx)
			.map(|(id, _)| id.clone())
	}

	fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	pub fn node_boxes(&self) -> HashMap<DefaultNodeIdx, NodeBox> {
		let mut boxes = HashMap::new();
		self.graph.visit_nodes(|node| {
			boxes.insert(
				node.index(),
				NodeBox {
					x: node.x() as f64,
					y: node.y() as f64,
					half_width: node.data.user_data.half_width,
					half_height: node.data.user_data.half_height,
				},
			);
		});
		boxes
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let bounds = NodeBox {
				x: node.x() as f64,
				y: node.y() as f64,
				half_width: node.data.user_data.half_width,
				half_height: node.data.user_data.half_height,
			};
			if bounds.contains(gx, gy) {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let tolerance = EDGE_HIT_WIDTH / self.transform.k;
		let boxes = self.node_boxes();
		self.edges.iter().position(|edge| {
			let (Some(a), Some(b)) = (boxes.get(&edge.from), boxes.get(&edge.to)) else {
				return false;
			};
			if edge.from == edge.to {
				let (cx, cy) = a.loop_center();
				let dist = ((gx - cx).powi(2) + (gy - cy).powi(2)).sqrt();
				(dist - LOOP_RADIUS).abs() < tolerance
			} else {
				distance_to_segment((gx, gy), (a.x, a.y), (b.x, b.y)) < tolerance
			}
		})
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>, edge: Option<usize>) {
		self.hover.node = node;
		self.hover.edge = if node.is_some() { None } else { edge };
	}

	pub fn visual_state(&self, idx: DefaultNodeIdx) -> VisualState {
		VisualState::from_flags(self.selected.contains(&idx), self.hover.node == Some(idx))
	}

	pub fn node_style(&self, idx: DefaultNodeIdx, info: &NodeInfo) -> NodeStyle {
		match &info.chosen {
			Some(chosen) => chosen.apply(&info.base, self.visual_state(idx)),
			None => info.base.clone(),
		}
	}

	pub fn edge_style(&self, i: usize) -> Option<EdgeStyle> {
		let edge = self.edges.get(i)?;
		let hovering = self.hover.edge == Some(i);
		Some(match &edge.chosen {
			Some(chosen) => chosen.apply(&edge.base, hovering),
			None => edge.base.clone(),
		})
	}

	pub fn cursor(&self) -> &'static str {
		if self.drag.active {
			"grabbing"
		} else if self.hover.node.is_some() || self.hover.edge.is_some() {
			"pointer"
		} else {
			"grab"
		}
	}

	fn drag_nodes(&self) -> Vec<String> {
		self.drag
			.node_idx
			.and_then(|idx| self.id_of(idx))
			.into_iter()
			.collect()
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		let node_idx = self.node_at_position(x, y);
		let (node_start_x, node_start_y) = node_idx
			.and_then(|idx| self.node_position(idx))
			.unwrap_or_default();
		self.drag = DragState {
			pressed: true,
			active: false,
			node_idx,
			start_x: x,
			start_y: y,
			node_start_x,
			node_start_y,
		};
		self.pan = PanState {
			active: false,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.pressed {
			let node = self.node_at_position(x, y);
			let edge = match node {
				Some(_) => None,
				None => self.edge_at_position(x, y),
			};
			self.set_hover(node, edge);
			return;
		}

		let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
		if !self.drag.active {
			if (dx * dx + dy * dy).sqrt() < DRAG_THRESHOLD {
				return;
			}
			self.drag.active = true;
			self.pan.active = self.drag.node_idx.is_none();
			let nodes = self.drag_nodes();
			self.events.push(NetworkEvent::DragStart { nodes });
		}

		if let Some(idx) = self.drag.node_idx {
			let (nx, ny) = (
				self.drag.node_start_x + dx / self.transform.k,
				self.drag.node_start_y + dy / self.transform.k,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx as f32;
					node.data.y = ny as f32;
					node.data.is_anchor = true;
				}
			});
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
		let nodes = self.drag_nodes();
		self.events.push(NetworkEvent::Dragging { nodes });
	}

	pub fn pointer_up(&mut self, x: f64, y: f64) {
		if !self.drag.pressed {
			return;
		}
		if self.drag.active {
			let nodes = self.drag_nodes();
			self.events.push(NetworkEvent::DragEnd { nodes });
		} else {
			self.click(x, y);
		}
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn pointer_leave(&mut self) {
		if self.drag.active {
			let nodes = self.drag_nodes();
			self.events.push(NetworkEvent::DragEnd { nodes });
		}
		self.drag = DragState::default();
		self.pan.active = false;
		self.set_hover(None, None);
	}

	fn click(&mut self, x: f64, y: f64) {
		let node = self.node_at_position(x, y);
		let nodes: Vec<String> = node.and_then(|idx| self.id_of(idx)).into_iter().collect();
		let edges: Vec<EdgeKey> = match node {
			Some(_) => Vec::new(),
			None => self
				.edge_at_position(x, y)
				.map(|i| self.edges[i].key.clone())
				.into_iter()
				.collect(),
		};
		match node {
			Some(idx) => {
				self.selected = HashSet::from([idx]);
				self.events.push(NetworkEvent::Select {
					nodes: nodes.clone(),
				});
			}
			None => self.selected.clear(),
		}
		self.events.push(NetworkEvent::Click {
			nodes,
			edges,
			pointer: Position::new(x, y),
		});
	}

	/// Reports a right click; returns whether a node is under the pointer.
	pub fn context(&mut self, x: f64, y: f64) -> bool {
		self.events.push(NetworkEvent::Context {
			pointer: Position::new(x, y),
		});
		self.node_at_position(x, y).is_some()
	}

	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f64) {
		if let Some(anim) = self.focus.as_mut() {
			anim.t = (anim.t + dt / FOCUS_DURATION).min(1.0);
			let e = ease_out_cubic(anim.t);
			self.transform.x = anim.from.0 + (anim.to.0 - anim.from.0) * e;
			self.transform.y = anim.from.1 + (anim.to.1 - anim.from.1) * e;
			if anim.t >= 1.0 {
				self.focus = None;
			}
		}

		if !self.physics_enabled {
			return;
		}

		let before = self.node_boxes();
		self.graph.update(dt as f32);
		let mut max_step: f64 = 0.0;
		self.graph.visit_nodes(|node| {
			if let Some(b) = before.get(&node.index()) {
				let (dx, dy) = (node.x() as f64 - b.x, node.y() as f64 - b.y);
				max_step = max_step.max((dx * dx + dy * dy).sqrt());
			}
		});

		if max_step < self.settings.rest_threshold {
			self.rest.quiet_ticks = self.rest.quiet_ticks.saturating_add(1);
			if !self.rest.settled && self.rest.quiet_ticks >= self.settings.rest_ticks {
				self.rest.settled = true;
				self.events.push(NetworkEvent::Stabilized);
			}
		} else {
			self.rest = RestState::default();
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

impl Network for ForceGraphState {
	fn positions(&self, ids: Option<&[String]>) -> BTreeMap<String, Position> {
		let boxes = self.node_boxes();
		let lookup = |id: &String| {
			let b = boxes.get(self.ids.get(id)?)?;
			Some((id.clone(), Position::new(b.x, b.y)))
		};
		match ids {
			Some(ids) => ids.iter().filter_map(lookup).collect(),
			None => self.ids.keys().filter_map(lookup).collect(),
		}
	}

	fn position(&self, id: &str) -> Option<Position> {
		let &idx = self.ids.get(id)?;
		self.node_position(idx).map(|(x, y)| Position::new(x, y))
	}

	fn select_nodes(&mut self, ids: &[String]) -> Result<(), NetworkError> {
		let selected = ids
			.iter()
			.map(|id| {
				self.ids
					.get(id)
					.copied()
					.ok_or_else(|| NetworkError::UnknownNode(id.clone()))
			})
			.collect::<Result<HashSet<_>, _>>()?;
		self.selected = selected;
		Ok(())
	}

	fn focus(&mut self, id: &str) -> Result<(), NetworkError> {
		let pos = self
			.position(id)
			.ok_or_else(|| NetworkError::UnknownNode(id.to_string()))?;
		let k = self.transform.k;
		self.focus = Some(FocusAnimation {
			from: (self.transform.x, self.transform.y),
			to: (self.width / 2.0 - pos.x * k, self.height / 2.0 - pos.y * k),
			t: 0.0,
		});
		Ok(())
	}

	fn connected_nodes(&self, key: &EdgeKey) -> Result<(String, String), NetworkError> {
		let unknown = || NetworkError::UnknownEdge(key.clone());
		let edge = self.edges.iter().find(|e| &e.key == key).ok_or_else(unknown)?;
		let from = self.id_of(edge.from).ok_or_else(unknown)?;
		let to = self.id_of(edge.to).ok_or_else(unknown)?;
		Ok((from, to))
	}

	fn node_at(&self, dom: Position) -> Option<String> {
		self.node_at_position(dom.x, dom.y)
			.and_then(|idx| self.id_of(idx))
	}

	fn canvas_to_dom(&self, canvas: Position) -> Position {
		Position::new(
			canvas.x * self.transform.k + self.transform.x,
			canvas.y * self.transform.k + self.transform.y,
		)
	}

	fn set_physics(&mut self, enabled: bool) {
		if self.physics_enabled != enabled {
			self.physics_enabled = enabled;
			self.rest = RestState::default();
		}
	}

	fn physics_enabled(&self) -> bool {
		self.physics_enabled
	}
}
