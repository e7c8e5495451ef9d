//! Animated k-nearest-neighbor network background.
//!
//! The simulation core (`state`, `node`, `neighbors`, `edges`, `picker`,
//! `camera`) is independent of the browser and draws through the
//! [`Renderer`] trait; `render` and `component` bind it to a canvas.

mod camera;
mod component;
mod config;
mod edges;
mod error;
mod neighbors;
mod node;
mod picker;
mod render;
mod renderer;
mod state;
#[cfg(test)]
mod testing;

pub use camera::{Camera, Ray, pointer_to_ndc};
pub use component::NetworkBackground;
pub use config::NetworkConfig;
pub use edges::{Edge, EdgeCache, ReconcileStats};
pub use error::{NetworkError, RenderError};
pub use neighbors::{ActiveEdgeSet, EdgeKey, NeighborGraphBuilder};
pub use node::{Node, NodeId};
pub use picker::{HoverChange, PointerPicker};
pub use render::CanvasRenderer;
pub use renderer::{LineHandle, LineStyle, PointHandle, PointStyle, Renderer};
pub use state::{FrameReport, NetworkSimulation, Phase};
