//! Entity-relationship graph of the modeling page: derives nodes and edges
//! from entity-type schemas, keeps saved node coordinates in step with the
//! canvas, and reports interaction back to the host.

mod component;
pub mod config;
pub mod coords;
pub mod derive;
pub mod schema;
mod sync;
mod test_adapter;

pub use component::{GraphCallbacks, GraphVis, ModelingContext};
pub use config::{EntityMetadata, EntityMetadataMap, GraphConfig};
pub use schema::EntityType;
pub use sync::{ContextMenu, GraphOwner, GraphSync, MenuAction, RelationshipInfo, ViewInputs};
pub use test_adapter::GraphTestAdapter;
