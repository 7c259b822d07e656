mod component;
mod network;
mod render;
mod state;
mod style;
mod types;

pub use component::NetworkCanvas;
pub use network::{EdgeKey, Network, NetworkError, NetworkEvent, NetworkHandle, Position};
pub use state::ForceGraphState;
pub use style::{ArrowGlyph, ChosenEdgeStyle, ChosenNodeStyle, EdgeStyle, NodeStyle, VisualState};
pub use types::{GraphData, GraphEdge, GraphNode, NodeColor, PhysicsSettings};
