//! Entity-type records as the modeling service hands them out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityType {
	pub entity_name: String,
	pub model: EntityModel,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityModel {
	#[serde(default)]
	pub definitions: BTreeMap<String, Definition>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hub_central: Option<HubCentral>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
	#[serde(default)]
	pub properties: BTreeMap<String, PropertyDef>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HubCentral {
	#[serde(default)]
	pub modeling: Modeling,
}

/// Layout metadata saved alongside the model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modeling {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub graph_x: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub graph_y: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub related_entity_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub join_property_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub items: Option<Items>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Items {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub related_entity_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub join_property_name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
	OneToOne,
	OneToMany,
}

/// A property that points at another entity type.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation<'a> {
	pub target: &'a str,
	pub join_property_name: Option<&'a str>,
	pub cardinality: Cardinality,
}

/// Last `/` segment of a related-entity-type IRI.
pub fn related_name(iri: &str) -> &str {
	iri.rsplit('/').next().unwrap_or(iri)
}

impl PropertyDef {
	/// The relation this property describes. A direct reference wins over an
	/// array of references.
	pub fn relation(&self) -> Option<Relation<'_>> {
		if let Some(iri) = &self.related_entity_type {
			return Some(Relation {
				target: related_name(iri),
				join_property_name: self.join_property_name.as_deref(),
				cardinality: Cardinality::OneToOne,
			});
		}
		let items = self.items.as_ref()?;
		let iri = items.related_entity_type.as_ref()?;
		Some(Relation {
			target: related_name(iri),
			join_property_name: items.join_property_name.as_deref(),
			cardinality: Cardinality::OneToMany,
		})
	}
}

impl EntityType {
	pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Properties of the definition named after the entity itself.
	pub fn properties(&self) -> impl Iterator<Item = (&String, &PropertyDef)> {
		self.model
			.definitions
			.get(&self.entity_name)
			.into_iter()
			.flat_map(|d| d.properties.iter())
	}

	pub fn persisted_coordinates(&self) -> Option<(f64, f64)> {
		let modeling = &self.model.hub_central.as_ref()?.modeling;
		Some((modeling.graph_x?, modeling.graph_y?))
	}

	pub fn set_coordinates(&mut self, x: f64, y: f64) {
		let modeling = &mut self
			.model
			.hub_central
			.get_or_insert_with(HubCentral::default)
			.modeling;
		modeling.graph_x = Some(x);
		modeling.graph_y = Some(y);
	}
}
