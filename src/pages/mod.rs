//! Routed pages.

mod graph;

pub use graph::{GraphMode, GraphPage};
