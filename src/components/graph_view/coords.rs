use std::collections::HashMap;

use super::schema::EntityType;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
	pub graph_x: f64,
	pub graph_y: f64,
}

/// Last known canvas position of each entity. Seeded once from the
/// persisted layout, then kept current as positions are saved.
#[derive(Clone, Debug, Default)]
pub struct CoordinateCache {
	loaded: bool,
	entries: HashMap<String, Coordinates>,
}

impl CoordinateCache {
	/// Seeds from the first non-empty entity list. Returns how many saved
	/// positions it found, or `None` once already seeded.
	pub fn seed(&mut self, entity_types: &[EntityType]) -> Option<usize> {
		if self.loaded || entity_types.is_empty() {
			return None;
		}
		self.entries = entity_types
			.iter()
			.filter_map(|e| {
				let (graph_x, graph_y) = e.persisted_coordinates()?;
				Some((e.entity_name.clone(), Coordinates { graph_x, graph_y }))
			})
			.collect();
		self.loaded = true;
		Some(self.entries.len())
	}

	pub fn get(&self, entity_name: &str) -> Option<Coordinates> {
		self.entries.get(entity_name).copied()
	}

	pub fn contains(&self, entity_name: &str) -> bool {
		self.entries.contains_key(entity_name)
	}

	pub fn insert(&mut self, entity_name: &str, graph_x: f64, graph_y: f64) {
		self.entries
			.insert(entity_name.to_string(), Coordinates { graph_x, graph_y });
	}
}

/// Whether any entity already carries a saved position.
pub fn has_persisted_coordinates(entity_types: &[EntityType]) -> bool {
	entity_types
		.iter()
		.any(|e| e.persisted_coordinates().is_some())
}
