use std::collections::BTreeMap;

use crate::components::force_graph::{Network, NetworkHandle, Position};

/// Read-only view of the mounted canvas for end-to-end harnesses. Handed out
/// only to hosts that ask for it through `GraphVis`'s `on_test_adapter`.
#[derive(Clone)]
pub struct GraphTestAdapter {
	network: NetworkHandle,
}

impl GraphTestAdapter {
	pub fn new(network: NetworkHandle) -> Self {
		Self { network }
	}

	/// Canvas positions of the given nodes, or of all of them.
	pub fn get_node_positions(&self, ids: Option<&[String]>) -> BTreeMap<String, Position> {
		self.network
			.with(|net| net.positions(ids))
			.unwrap_or_default()
	}

	pub fn canvas_to_dom(&self, x: f64, y: f64) -> Option<Position> {
		self.network
			.with(|net| net.canvas_to_dom(Position::new(x, y)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::{
		ForceGraphState, GraphData, GraphNode, NodeColor, PhysicsSettings,
	};

	fn mounted() -> NetworkHandle {
		let data = GraphData {
			nodes: vec![GraphNode {
				id: "Order".into(),
				label: Some("Order\n0".into()),
				title: None,
				color: NodeColor::default(),
				border_width: 0.0,
				position: Some((10.0, -20.0)),
				chosen: None,
			}],
			edges: vec![],
		};
		let handle = NetworkHandle::default();
		handle.install(ForceGraphState::new(
			&data,
			400.0,
			300.0,
			PhysicsSettings::default(),
			false,
		));
		handle
	}

	#[test]
	fn test_reports_positions_and_transform() {
		let adapter = GraphTestAdapter::new(mounted());
		let all = adapter.get_node_positions(None);
		assert_eq!(all.get("Order"), Some(&Position::new(10.0, -20.0)));
		assert!(adapter
			.get_node_positions(Some(&["Missing".to_string()]))
			.is_empty());
		assert_eq!(
			adapter.canvas_to_dom(10.0, -20.0),
			Some(Position::new(210.0, 130.0))
		);
	}

	#[test]
	fn test_unmounted_canvas_reports_nothing() {
		let adapter = GraphTestAdapter::new(NetworkHandle::default());
		assert!(adapter.get_node_positions(None).is_empty());
		assert_eq!(adapter.canvas_to_dom(0.0, 0.0), None);
	}
}
