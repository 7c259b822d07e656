//! Keeps the canvas, the coordinate cache and the owning component in step.

use log::{debug, error, warn};

use super::config::{EntityMetadataMap, GraphConfig};
use super::coords::{CoordinateCache, has_persisted_coordinates};
use super::derive::{EdgeMetaTable, NodeInputs, get_edges, get_nodes, parse_edge_id};
use super::schema::EntityType;
use crate::components::force_graph::{
	EdgeKey, GraphData, Network, NetworkError, NetworkEvent, Position,
};

/// Outbound side of the graph view. Every call is fire-and-forget.
pub trait GraphOwner {
	fn select_entity(&self, entity_name: &str);
	fn save_entity_coords(&self, entity_name: &str, x: f64, y: f64);
	fn edit_relationship(&self, info: RelationshipInfo);
	fn toggle_relationship_modal(&self, visible: bool);
}

/// Descriptor handed to the relationship editor.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipInfo {
	pub edge_id: String,
	pub source_node_name: String,
	pub source_node_color: String,
	pub target_node_name: String,
	pub target_node_color: String,
	pub relationship_name: String,
	pub join_property_name: Option<String>,
}

/// Node context menu, anchored in canvas-element pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextMenu {
	pub node: String,
	pub left: f64,
	pub top: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
	CenterOnEntityType,
}

/// The owner-side inputs an event may need.
pub struct ViewInputs<'a> {
	pub entity_types: &'a [EntityType],
	pub metadata: &'a EntityMetadataMap,
	pub filtered: &'a [String],
	pub selected_entity: Option<&'a str>,
	pub entity_selected: Option<&'a str>,
}

pub struct GraphSync {
	config: GraphConfig,
	coords: CoordinateCache,
	physics_enabled: bool,
	edge_meta: EdgeMetaTable,
	context_menu: Option<ContextMenu>,
}

impl GraphSync {
	pub fn new(config: GraphConfig) -> Self {
		Self {
			config,
			coords: CoordinateCache::default(),
			physics_enabled: true,
			edge_meta: EdgeMetaTable::new(),
			context_menu: None,
		}
	}

	pub fn physics_enabled(&self) -> bool {
		self.physics_enabled
	}

	pub fn coordinates(&self) -> &CoordinateCache {
		&self.coords
	}

	pub fn context_menu(&self) -> Option<&ContextMenu> {
		self.context_menu.as_ref()
	}

	/// Recomputes the view model. Physics is switched off here, ahead of the
	/// render, as soon as any entity has a saved position.
	pub fn update(&mut self, inputs: &ViewInputs) -> GraphData {
		if let Some(count) = self.coords.seed(inputs.entity_types) {
			debug!("seeded {count} saved coordinates");
		}
		if self.physics_enabled && has_persisted_coordinates(inputs.entity_types) {
			debug!("saved layout found, physics disabled");
			self.physics_enabled = false;
		}
		self.context_menu = None;

		let nodes = get_nodes(
			inputs.entity_types,
			&NodeInputs {
				metadata: inputs.metadata,
				filtered: inputs.filtered,
				selected_entity: inputs.selected_entity,
				entity_selected: inputs.entity_selected,
				coords: &self.coords,
				config: &self.config,
			},
		);
		let (edges, edge_meta) = get_edges(inputs.entity_types, &self.config);
		self.edge_meta = edge_meta;
		GraphData { nodes, edges }
	}

	pub fn handle_event<N, O>(
		&mut self,
		event: NetworkEvent,
		inputs: &ViewInputs,
		net: &mut N,
		owner: &O,
	) where
		N: Network + ?Sized,
		O: GraphOwner + ?Sized,
	{
		match event {
			NetworkEvent::Select { nodes } => {
				if let Some(node) = nodes.first() {
					owner.select_entity(node);
				}
			}
			NetworkEvent::Click { nodes, edges, .. } => {
				if let (Some(edge), true) = (edges.first(), nodes.is_empty()) {
					match self.relationship_info(edge, inputs.metadata, net) {
						Ok(info) => {
							owner.edit_relationship(info);
							owner.toggle_relationship_modal(true);
						}
						Err(err) => warn!("cannot edit relationship: {err}"),
					}
				}
				self.close_context_menu();
			}
			NetworkEvent::DragStart { .. } => {
				if self.physics_enabled {
					self.physics_enabled = false;
					net.set_physics(false);
				}
			}
			NetworkEvent::Dragging { .. } => self.close_context_menu(),
			NetworkEvent::DragEnd { nodes } => {
				if let Some(node) = nodes.first() {
					self.persist_position(node, net, owner);
				}
			}
			NetworkEvent::Context { pointer } => self.open_context_menu(pointer, net),
			NetworkEvent::Stabilized => {
				self.save_unsaved_coords(inputs.entity_types, net, owner);
				if let Some(selected) = inputs.selected_entity {
					// the canvas may not know a just-created entity yet
					if let Err(err) = net.select_nodes(&[selected.to_string()]) {
						error!("{err}");
					}
				}
			}
		}
	}

	fn close_context_menu(&mut self) {
		self.context_menu = None;
	}

	fn open_context_menu<N: Network + ?Sized>(&mut self, pointer: Position, net: &N) {
		self.context_menu = net.node_at(pointer).and_then(|node| {
			let dom = net.canvas_to_dom(net.position(&node)?);
			Some(ContextMenu {
				node,
				left: dom.x,
				top: dom.y + self.config.context_menu_offset,
			})
		});
	}

	/// Caches the rendered position of `entity_name`, then hands it to the owner.
	pub fn persist_position<N, O>(&mut self, entity_name: &str, net: &N, owner: &O)
	where
		N: Network + ?Sized,
		O: GraphOwner + ?Sized,
	{
		let Some(pos) = net.position(entity_name) else {
			return;
		};
		if !(pos.x.is_finite() && pos.y.is_finite()) {
			return;
		}
		self.coords.insert(entity_name, pos.x, pos.y);
		debug!("saving {entity_name} at ({}, {})", pos.x, pos.y);
		owner.save_entity_coords(entity_name, pos.x, pos.y);
	}

	/// Persists the rendered position of every entity without a cached one.
	pub fn save_unsaved_coords<N, O>(
		&mut self,
		entity_types: &[EntityType],
		net: &N,
		owner: &O,
	) where
		N: Network + ?Sized,
		O: GraphOwner + ?Sized,
	{
		for e in entity_types {
			if !self.coords.contains(&e.entity_name) {
				self.persist_position(&e.entity_name, net, owner);
			}
		}
	}

	/// Mirrors a selection made outside the canvas. Returns `false` when the
	/// entity is not in the list, in which case the caller should drop it.
	pub fn sync_selection<N, O>(
		&mut self,
		selected: &str,
		entity_types: &[EntityType],
		net: &mut N,
		owner: &O,
	) -> bool
	where
		N: Network + ?Sized,
		O: GraphOwner + ?Sized,
	{
		if !entity_types.iter().any(|e| e.entity_name == selected) {
			warn!("selected entity `{selected}` is not in the model");
			return false;
		}
		if let Err(err) = net.select_nodes(&[selected.to_string()]) {
			error!("{err}");
		}
		self.save_unsaved_coords(entity_types, net, owner);
		true
	}

	pub fn focus_entity<N: Network + ?Sized>(&self, entity_name: &str, net: &mut N) {
		if let Err(err) = net.focus(entity_name) {
			warn!("{err}");
		}
	}

	/// Focuses `entity` when the owner asks for it. Returns whether a focus
	/// was attempted.
	pub fn focus_requested<N: Network + ?Sized>(
		&self,
		requested: bool,
		entity: Option<&str>,
		net: &mut N,
	) -> bool {
		match (requested, entity) {
			(true, Some(name)) => {
				self.focus_entity(name, net);
				true
			}
			_ => false,
		}
	}

	pub fn menu_click<N: Network + ?Sized>(&mut self, action: MenuAction, net: &mut N) {
		let Some(menu) = self.context_menu.take() else {
			return;
		};
		match action {
			MenuAction::CenterOnEntityType => self.focus_entity(&menu.node, net),
		}
	}

	pub fn relationship_info<N: Network + ?Sized>(
		&self,
		edge: &EdgeKey,
		metadata: &EntityMetadataMap,
		net: &N,
	) -> Result<RelationshipInfo, NetworkError> {
		let (source, target) = net.connected_nodes(edge)?;
		let (relationship_name, join_property_name) = match self.edge_meta.get(edge) {
			Some(meta) => (meta.relationship_name.clone(), meta.join_property_name.clone()),
			None => parse_edge_id(&edge.id),
		};
		Ok(RelationshipInfo {
			edge_id: edge.id.clone(),
			source_node_color: self.config.entity_color(metadata, &source),
			source_node_name: source,
			target_node_color: self.config.entity_color(metadata, &target),
			target_node_name: target,
			relationship_name,
			join_property_name,
		})
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::collections::BTreeMap;

	use serde_json::json;

	use super::*;
	use crate::components::force_graph::{ForceGraphState, PhysicsSettings};
	use crate::components::graph_view::config::EntityMetadata;

	#[derive(Default)]
	struct MockNetwork {
		positions: BTreeMap<String, Position>,
		edges: BTreeMap<EdgeKey, (String, String)>,
		selected: Vec<String>,
		focused: Vec<String>,
		physics: bool,
		queries: RefCell<Vec<String>>,
	}

	impl MockNetwork {
		fn with_nodes(nodes: &[(&str, f64, f64)]) -> Self {
			Self {
				positions: nodes
					.iter()
					.map(|&(id, x, y)| (id.to_string(), Position::new(x, y)))
					.collect(),
				physics: true,
				..Default::default()
			}
		}
	}

	impl Network for MockNetwork {
		fn positions(&self, ids: Option<&[String]>) -> BTreeMap<String, Position> {
			match ids {
				Some(ids) => ids
					.iter()
					.filter_map(|id| Some((id.clone(), *self.positions.get(id)?)))
					.collect(),
				None => self.positions.clone(),
			}
		}

		fn position(&self, id: &str) -> Option<Position> {
			self.queries.borrow_mut().push(id.to_string());
			self.positions.get(id).copied()
		}

		fn select_nodes(&mut self, ids: &[String]) -> Result<(), NetworkError> {
			if let Some(missing) = ids.iter().find(|id| !self.positions.contains_key(*id)) {
				return Err(NetworkError::UnknownNode(missing.clone()));
			}
			self.selected = ids.to_vec();
			Ok(())
		}

		fn focus(&mut self, id: &str) -> Result<(), NetworkError> {
			self.focused.push(id.to_string());
			Ok(())
		}

		fn connected_nodes(&self, edge: &EdgeKey) -> Result<(String, String), NetworkError> {
			self.edges
				.get(edge)
				.cloned()
				.ok_or_else(|| NetworkError::UnknownEdge(edge.clone()))
		}

		fn node_at(&self, dom: Position) -> Option<String> {
			// nodes are hit within 10px of their position
			self.positions
				.iter()
				.find(|(_, p)| (p.x - dom.x).abs() < 10.0 && (p.y - dom.y).abs() < 10.0)
				.map(|(id, _)| id.clone())
		}

		fn canvas_to_dom(&self, canvas: Position) -> Position {
			canvas
		}

		fn set_physics(&mut self, enabled: bool) {
			self.physics = enabled;
		}

		fn physics_enabled(&self) -> bool {
			self.physics
		}
	}

	#[derive(Debug, PartialEq)]
	enum Call {
		Select(String),
		Save(String, f64, f64),
		Edit(RelationshipInfo),
		Modal(bool),
	}

	#[derive(Default)]
	struct Recorder(RefCell<Vec<Call>>);

	impl Recorder {
		fn calls(&self) -> Vec<Call> {
			self.0.take()
		}
	}

	impl GraphOwner for Recorder {
		fn select_entity(&self, entity_name: &str) {
			self.0.borrow_mut().push(Call::Select(entity_name.into()));
		}

		fn save_entity_coords(&self, entity_name: &str, x: f64, y: f64) {
			self.0.borrow_mut().push(Call::Save(entity_name.into(), x, y));
		}

		fn edit_relationship(&self, info: RelationshipInfo) {
			self.0.borrow_mut().push(Call::Edit(info));
		}

		fn toggle_relationship_modal(&self, visible: bool) {
			self.0.borrow_mut().push(Call::Modal(visible));
		}
	}

	fn customer_order(saved: bool) -> Vec<EntityType> {
		let hub = if saved {
			json!({"modeling": {"graphX": -300, "graphY": 0}})
		} else {
			json!(null)
		};
		serde_json::from_value(json!([
			{"entityName": "Customer", "model": {
				"definitions": {"Customer": {"properties": {
					"orderRef": {"relatedEntityType": "http://example.org/Order-0.0.1/Order", "joinPropertyName": "orderId"}
				}}},
				"hubCentral": hub
			}},
			{"entityName": "Order", "model": {"definitions": {"Order": {"properties": {}}}}}
		]))
		.unwrap()
	}

	fn view<'a>(entity_types: &'a [EntityType], metadata: &'a EntityMetadataMap) -> ViewInputs<'a> {
		ViewInputs {
			entity_types,
			metadata,
			filtered: &[],
			selected_entity: None,
			entity_selected: None,
		}
	}

	#[test]
	fn test_saved_coordinate_disables_physics_before_render() {
		let metadata = EntityMetadataMap::new();
		let mut sync = GraphSync::new(GraphConfig::default());
		assert!(sync.physics_enabled());

		let unsaved = customer_order(false);
		sync.update(&view(&unsaved, &metadata));
		assert!(sync.physics_enabled());

		let mut sync = GraphSync::new(GraphConfig::default());
		let saved = customer_order(true);
		let data = sync.update(&view(&saved, &metadata));
		assert!(!sync.physics_enabled());
		assert_eq!(data.nodes[0].position, Some((-300.0, 0.0)));
		assert_eq!(data.nodes[1].position, None);
	}

	#[test]
	fn test_drag_end_persists_and_caches() {
		let (entities, metadata) = (customer_order(false), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		sync.update(&view(&entities, &metadata));
		let mut net = MockNetwork::with_nodes(&[("Customer", 0.0, 0.0), ("Order", 120.0, 40.0)]);
		let owner = Recorder::default();

		sync.handle_event(
			NetworkEvent::DragEnd {
				nodes: vec!["Order".into()],
			},
			&view(&entities, &metadata),
			&mut net,
			&owner,
		);
		assert_eq!(owner.calls(), vec![Call::Save("Order".into(), 120.0, 40.0)]);

		net.queries.borrow_mut().clear();
		let cached = sync.coordinates().get("Order").unwrap();
		assert_eq!((cached.graph_x, cached.graph_y), (120.0, 40.0));
		assert!(net.queries.borrow().is_empty());
	}

	#[test]
	fn test_drag_start_turns_physics_off() {
		let (entities, metadata) = (customer_order(false), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		let mut net = MockNetwork::with_nodes(&[]);
		sync.handle_event(
			NetworkEvent::DragStart { nodes: vec![] },
			&view(&entities, &metadata),
			&mut net,
			&Recorder::default(),
		);
		assert!(!sync.physics_enabled());
		assert!(!net.physics_enabled());
	}

	#[test]
	fn test_context_menu_open_and_dismiss() {
		let (entities, metadata) = (customer_order(false), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		let mut net = MockNetwork::with_nodes(&[("Order", 50.0, 60.0)]);
		let owner = Recorder::default();
		let inputs = view(&entities, &metadata);

		sync.handle_event(
			NetworkEvent::Context {
				pointer: Position::new(52.0, 61.0),
			},
			&inputs,
			&mut net,
			&owner,
		);
		assert_eq!(
			sync.context_menu(),
			Some(&ContextMenu {
				node: "Order".into(),
				left: 50.0,
				top: 100.0
			})
		);

		sync.handle_event(
			NetworkEvent::Context {
				pointer: Position::new(400.0, 400.0),
			},
			&inputs,
			&mut net,
			&owner,
		);
		assert_eq!(sync.context_menu(), None);

		// dismissing with nothing open is a no-op
		sync.handle_event(
			NetworkEvent::Context {
				pointer: Position::new(400.0, 400.0),
			},
			&inputs,
			&mut net,
			&owner,
		);
		assert_eq!(sync.context_menu(), None);
		assert!(owner.calls().is_empty());
	}

	#[test]
	fn test_dragging_and_click_close_menu() {
		let (entities, metadata) = (customer_order(false), EntityMetadataMap::new());
		let inputs = view(&entities, &metadata);
		let mut sync = GraphSync::new(GraphConfig::default());
		let mut net = MockNetwork::with_nodes(&[("Order", 0.0, 0.0)]);
		let owner = Recorder::default();
		let open = NetworkEvent::Context {
			pointer: Position::new(0.0, 0.0),
		};

		sync.handle_event(open.clone(), &inputs, &mut net, &owner);
		assert!(sync.context_menu().is_some());
		sync.handle_event(NetworkEvent::Dragging { nodes: vec![] }, &inputs, &mut net, &owner);
		assert!(sync.context_menu().is_none());

		sync.handle_event(open, &inputs, &mut net, &owner);
		sync.handle_event(
			NetworkEvent::Click {
				nodes: vec![],
				edges: vec![],
				pointer: Position::new(300.0, 300.0),
			},
			&inputs,
			&mut net,
			&owner,
		);
		assert!(sync.context_menu().is_none());
	}

	#[test]
	fn test_center_on_entity_type() {
		let (entities, metadata) = (customer_order(false), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		let mut net = MockNetwork::with_nodes(&[("Customer", 0.0, 0.0)]);
		sync.handle_event(
			NetworkEvent::Context {
				pointer: Position::new(0.0, 0.0),
			},
			&view(&entities, &metadata),
			&mut net,
			&Recorder::default(),
		);
		sync.menu_click(MenuAction::CenterOnEntityType, &mut net);
		assert_eq!(net.focused, vec!["Customer".to_string()]);
		assert!(sync.context_menu().is_none());

		sync.menu_click(MenuAction::CenterOnEntityType, &mut net);
		assert_eq!(net.focused.len(), 1);
	}

	#[test]
	fn test_edge_click_opens_editor() {
		let entities = customer_order(false);
		let metadata = EntityMetadataMap::from([(
			"Customer".to_string(),
			EntityMetadata {
				color: Some("#f0c0a0".into()),
				instances: None,
			},
		)]);
		let mut sync = GraphSync::new(GraphConfig::default());
		sync.update(&view(&entities, &metadata));
		let mut net = MockNetwork::with_nodes(&[]);
		let order_ref = EdgeKey::new("Customer", "orderRef-orderId-edge");
		net.edges
			.insert(order_ref.clone(), ("Customer".into(), "Order".into()));
		let owner = Recorder::default();

		sync.handle_event(
			NetworkEvent::Click {
				nodes: vec![],
				edges: vec![order_ref.clone()],
				pointer: Position::default(),
			},
			&view(&entities, &metadata),
			&mut net,
			&owner,
		);
		assert_eq!(
			owner.calls(),
			vec![
				Call::Edit(RelationshipInfo {
					edge_id: "orderRef-orderId-edge".into(),
					source_node_name: "Customer".into(),
					source_node_color: "#f0c0a0".into(),
					target_node_name: "Order".into(),
					target_node_color: "#cfe3e8".into(),
					relationship_name: "orderRef".into(),
					join_property_name: Some("orderId".into()),
				}),
				Call::Modal(true),
			]
		);

		// a click that also hit a node is not an edge click
		sync.handle_event(
			NetworkEvent::Click {
				nodes: vec!["Order".into()],
				edges: vec![order_ref],
				pointer: Position::default(),
			},
			&view(&entities, &metadata),
			&mut net,
			&owner,
		);
		assert!(owner.calls().is_empty());
	}

	#[test]
	fn test_edge_metadata_beats_id_parsing() {
		let entities: Vec<EntityType> = serde_json::from_value(json!([
			{"entityName": "Order", "model": {"definitions": {"Order": {"properties": {
				"ship-to": {"relatedEntityType": "Address", "joinPropertyName": "address-id"}
			}}}}},
			{"entityName": "Address", "model": {}}
		]))
		.unwrap();
		let metadata = EntityMetadataMap::new();
		let mut sync = GraphSync::new(GraphConfig::default());
		sync.update(&view(&entities, &metadata));
		let mut net = MockNetwork::with_nodes(&[]);
		let ship_to = EdgeKey::new("Order", "ship-to-address-id-edge");
		net.edges
			.insert(ship_to.clone(), ("Order".into(), "Address".into()));

		let info = sync.relationship_info(&ship_to, &metadata, &net).unwrap();
		assert_eq!(info.relationship_name, "ship-to");
		assert_eq!(info.join_property_name.as_deref(), Some("address-id"));
	}

	#[test]
	fn test_shared_edge_id_resolves_per_source() {
		let entities: Vec<EntityType> = serde_json::from_value(json!([
			{"entityName": "Customer", "model": {}},
			{"entityName": "Order", "model": {"definitions": {"Order": {"properties": {
				"customer": {"relatedEntityType": "Customer", "joinPropertyName": "customerId"}
			}}}}},
			{"entityName": "Invoice", "model": {"definitions": {"Invoice": {"properties": {
				"customer": {"relatedEntityType": "Customer", "joinPropertyName": "customerId"}
			}}}}}
		]))
		.unwrap();
		let metadata = EntityMetadataMap::new();
		let mut sync = GraphSync::new(GraphConfig::default());
		let data = sync.update(&view(&entities, &metadata));
		let mut canvas =
			ForceGraphState::new(&data, 800.0, 600.0, PhysicsSettings::default(), false);
		assert_eq!(canvas.edges().len(), 2);

		let owner = Recorder::default();
		sync.handle_event(
			NetworkEvent::Click {
				nodes: vec![],
				edges: vec![EdgeKey::new("Invoice", "customer-customerId-edge")],
				pointer: Position::default(),
			},
			&view(&entities, &metadata),
			&mut canvas,
			&owner,
		);
		let calls = owner.calls();
		let Some(Call::Edit(info)) = calls.first() else {
			panic!("expected the relationship editor, got {calls:?}");
		};
		assert_eq!(info.edge_id, "customer-customerId-edge");
		assert_eq!(info.source_node_name, "Invoice");
		assert_eq!(info.target_node_name, "Customer");
		assert_eq!(info.relationship_name, "customer");
		assert_eq!(info.join_property_name.as_deref(), Some("customerId"));
	}

	#[test]
	fn test_recomputation_closes_context_menu() {
		let (entities, metadata) = (customer_order(false), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		let mut net = MockNetwork::with_nodes(&[("Order", 0.0, 0.0)]);
		sync.handle_event(
			NetworkEvent::Context {
				pointer: Position::new(0.0, 0.0),
			},
			&view(&entities, &metadata),
			&mut net,
			&Recorder::default(),
		);
		assert!(sync.context_menu().is_some());

		sync.update(&view(&entities, &metadata));
		assert!(sync.context_menu().is_none());
	}

	#[test]
	fn test_focus_only_when_requested() {
		let sync = GraphSync::new(GraphConfig::default());
		let mut net = MockNetwork::with_nodes(&[("Order", 0.0, 0.0)]);

		assert!(!sync.focus_requested(false, Some("Order"), &mut net));
		assert!(!sync.focus_requested(true, None, &mut net));
		assert!(net.focused.is_empty());

		assert!(sync.focus_requested(true, Some("Order"), &mut net));
		assert_eq!(net.focused, vec!["Order".to_string()]);
	}

	#[test]
	fn test_selected_entity_border_follows_entity_selected() {
		let (entities, metadata) = (customer_order(false), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		let inputs = ViewInputs {
			selected_entity: Some("Order"),
			..view(&entities, &metadata)
		};
		let data = sync.update(&inputs);
		assert_eq!(data.nodes[1].border_width, 0.0);

		let inputs = ViewInputs {
			entity_selected: Some("Order"),
			..inputs
		};
		let data = sync.update(&inputs);
		assert_eq!(data.nodes[1].border_width, 3.0);
		assert_eq!(data.nodes[1].color.border, "#5b69af");
	}

	#[test]
	fn test_select_notifies_owner() {
		let (entities, metadata) = (customer_order(false), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		let owner = Recorder::default();
		sync.handle_event(
			NetworkEvent::Select {
				nodes: vec!["Order".into()],
			},
			&view(&entities, &metadata),
			&mut MockNetwork::default(),
			&owner,
		);
		assert_eq!(owner.calls(), vec![Call::Select("Order".into())]);
	}

	#[test]
	fn test_stabilized_sweeps_unsaved_and_survives_stale_selection() {
		let (entities, metadata) = (customer_order(true), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		sync.update(&view(&entities, &metadata));
		let mut net = MockNetwork::with_nodes(&[("Customer", -300.0, 0.0), ("Order", 80.0, 10.0)]);
		let owner = Recorder::default();
		let inputs = ViewInputs {
			selected_entity: Some("Brand new"),
			..view(&entities, &metadata)
		};

		sync.handle_event(NetworkEvent::Stabilized, &inputs, &mut net, &owner);
		assert_eq!(owner.calls(), vec![Call::Save("Order".into(), 80.0, 10.0)]);

		sync.handle_event(NetworkEvent::Stabilized, &inputs, &mut net, &owner);
		assert!(owner.calls().is_empty());
	}

	#[test]
	fn test_external_selection() {
		let (entities, metadata) = (customer_order(false), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		sync.update(&view(&entities, &metadata));
		let mut net = MockNetwork::with_nodes(&[("Customer", 1.0, 2.0), ("Order", 3.0, 4.0)]);
		let owner = Recorder::default();

		assert!(sync.sync_selection("Order", &entities, &mut net, &owner));
		assert_eq!(net.selected, vec!["Order".to_string()]);
		assert_eq!(
			owner.calls(),
			vec![
				Call::Save("Customer".into(), 1.0, 2.0),
				Call::Save("Order".into(), 3.0, 4.0),
			]
		);

		assert!(!sync.sync_selection("Ghost", &entities, &mut net, &owner));
		assert_eq!(net.selected, vec!["Order".to_string()]);
	}

	#[test]
	fn test_drag_through_real_canvas() {
		let (entities, metadata) = (customer_order(true), EntityMetadataMap::new());
		let mut sync = GraphSync::new(GraphConfig::default());
		let data = sync.update(&view(&entities, &metadata));
		let mut canvas = ForceGraphState::new(
			&data,
			800.0,
			600.0,
			PhysicsSettings::default(),
			sync.physics_enabled(),
		);
		let owner = Recorder::default();
		let inputs = view(&entities, &metadata);

		let pump = |sync: &mut GraphSync, canvas: &mut ForceGraphState| {
			for event in canvas.take_events() {
				sync.handle_event(event, &inputs, canvas, &owner);
			}
		};
		pump(&mut sync, &mut canvas);
		let calls = owner.calls();
		assert!(matches!(&calls[..], [Call::Save(name, _, _)] if name == "Order"));

		let order = canvas.position("Order").unwrap();
		let start = canvas.canvas_to_dom(order);
		canvas.pointer_down(start.x, start.y);
		canvas.pointer_move(start.x + 120.0 - order.x, start.y + 40.0 - order.y);
		canvas.pointer_up(start.x + 120.0 - order.x, start.y + 40.0 - order.y);
		pump(&mut sync, &mut canvas);

		assert_eq!(owner.calls(), vec![Call::Save("Order".into(), 120.0, 40.0)]);
		let cached = sync.coordinates().get("Order").unwrap();
		assert_eq!((cached.graph_x, cached.graph_y), (120.0, 40.0));
	}
}
