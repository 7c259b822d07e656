use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use log::warn;
use thiserror::Error;

use super::state::ForceGraphState;

/// A point either in canvas space or in DOM (client pixel) space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Identifies an edge on the canvas. Edge ids only need to be unique per
/// source node, so two entities may each own a `customer-customerId-edge`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
	pub from: String,
	pub id: String,
}

impl EdgeKey {
	pub fn new(from: impl Into<String>, id: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			id: id.into(),
		}
	}
}

impl fmt::Display for EdgeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.from, self.id)
	}
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
	#[error("node `{0}` is not part of the network")]
	UnknownNode(String),
	#[error("edge `{0}` is not part of the network")]
	UnknownEdge(EdgeKey),
}

/// Queries and commands the graph canvas answers, in canvas coordinates
/// unless stated otherwise.
pub trait Network {
	/// Positions of the given nodes, or of every node when `ids` is `None`.
	/// Unknown ids are left out.
	fn positions(&self, ids: Option<&[String]>) -> BTreeMap<String, Position>;

	fn position(&self, id: &str) -> Option<Position>;

	/// Replaces the selection. Fails without touching it if any id is unknown.
	fn select_nodes(&mut self, ids: &[String]) -> Result<(), NetworkError>;

	/// Pans the view so the node sits in the middle of the canvas.
	fn focus(&mut self, id: &str) -> Result<(), NetworkError>;

	/// `(from, to)` node ids of an edge.
	fn connected_nodes(&self, edge: &EdgeKey) -> Result<(String, String), NetworkError>;

	/// Node under a DOM-space point.
	fn node_at(&self, dom: Position) -> Option<String>;

	fn canvas_to_dom(&self, canvas: Position) -> Position;

	fn set_physics(&mut self, enabled: bool);

	fn physics_enabled(&self) -> bool;
}

/// Interaction reports emitted by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum NetworkEvent {
	Select { nodes: Vec<String> },
	Click {
		nodes: Vec<String>,
		edges: Vec<EdgeKey>,
		pointer: Position,
	},
	DragStart { nodes: Vec<String> },
	Dragging { nodes: Vec<String> },
	DragEnd { nodes: Vec<String> },
	/// Right click; `pointer` is in DOM space.
	Context { pointer: Position },
	/// The layout came to rest (or was placed without physics).
	Stabilized,
}

/// Shared handle to a mounted canvas.
#[derive(Clone, Default)]
pub struct NetworkHandle(Rc<RefCell<Option<ForceGraphState>>>);

impl NetworkHandle {
	pub fn install(&self, state: ForceGraphState) {
		*self.0.borrow_mut() = Some(state);
	}

	pub fn is_mounted(&self) -> bool {
		self.0.try_borrow().map(|s| s.is_some()).unwrap_or(true)
	}

	pub fn with<R>(&self, f: impl FnOnce(&ForceGraphState) -> R) -> Option<R> {
		let Ok(state) = self.0.try_borrow() else {
			warn!("graph canvas is busy, skipping read");
			return None;
		};
		state.as_ref().map(f)
	}

	pub fn with_mut<R>(&self, f: impl FnOnce(&mut ForceGraphState) -> R) -> Option<R> {
		let Ok(mut state) = self.0.try_borrow_mut() else {
			warn!("graph canvas is busy, skipping update");
			return None;
		};
		state.as_mut().map(f)
	}
}
