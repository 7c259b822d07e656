//! UI components of the modeling view.

pub mod force_graph;
pub mod graph_view;
pub mod tag;
