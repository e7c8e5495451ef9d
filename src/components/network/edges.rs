use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::error::RenderError;
use super::neighbors::{ActiveEdgeSet, EdgeKey};
use super::node::Node;
use super::renderer::{LineHandle, LineStyle, Renderer};

/// A pooled connection between two nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
	/// Node pair this edge connects.
	pub key: EdgeKey,
	/// Renderer line drawn for the pair.
	pub line: LineHandle,
	/// Whether the line is currently shown.
	pub visible: bool,
}

/// Counts of the changes made by one [`EdgeCache::reconcile`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
	/// Line resources created by this call.
	pub allocated: usize,
	/// Edges that went from hidden to visible.
	pub shown: usize,
	/// Edges that went from visible to hidden.
	pub hidden: usize,
}

/// Pool of edge line resources, one per node pair ever connected.
///
/// Edges are never released while the simulation runs: an edge leaving the
/// active set is hidden and may be shown again later without reallocating.
#[derive(Debug)]
pub struct EdgeCache {
	style: LineStyle,
	edges: HashMap<EdgeKey, Edge>,
	allocations: usize,
}

impl EdgeCache {
	/// Empty pool; new lines are created with `style`.
	pub fn new(style: LineStyle) -> Self {
		Self {
			style,
			edges: HashMap::new(),
			allocations: 0,
		}
	}

	/// Make exactly the edges in `active` visible, allocating the missing ones.
	///
	/// Endpoints of every active edge are rewritten from `nodes`, which must be
	/// indexed by node id. Visibility is only touched when it changes.
	pub fn reconcile<R: Renderer>(
		&mut self,
		active: &ActiveEdgeSet,
		nodes: &[Node],
		renderer: &mut R,
	) -> Result<ReconcileStats, RenderError> {
		let mut stats = ReconcileStats::default();

		for &key in active {
			let edge = match self.edges.entry(key) {
				Entry::Occupied(slot) => slot.into_mut(),
				Entry::Vacant(slot) => {
					let line = renderer.create_line(self.style)?;
					self.allocations += 1;
					stats.allocated += 1;
					slot.insert(Edge {
						key,
						line,
						visible: false,
					})
				}
			};
			let (a, b) = key.endpoints();
			renderer.update_line(edge.line, nodes[a.index()].position, nodes[b.index()].position)?;
			if !edge.visible {
				renderer.set_line_visible(edge.line, true)?;
				edge.visible = true;
				stats.shown += 1;
			}
		}

		for edge in self.edges.values_mut() {
			if edge.visible && !active.contains(&edge.key) {
				renderer.set_line_visible(edge.line, false)?;
				edge.visible = false;
				stats.hidden += 1;
			}
		}

		Ok(stats)
	}

	/// Rewrite the endpoints of the visible edges from the current node positions.
	pub fn refresh<R: Renderer>(&self, nodes: &[Node], renderer: &mut R) -> Result<(), RenderError> {
		for edge in self.edges.values().filter(|e| e.visible) {
			let (a, b) = edge.key.endpoints();
			renderer.update_line(edge.line, nodes[a.index()].position, nodes[b.index()].position)?;
		}
		Ok(())
	}

	/// Release every pooled line and empty the cache.
	pub fn release_all<R: Renderer>(&mut self, renderer: &mut R) {
		for (_, edge) in self.edges.drain() {
			renderer.release_line(edge.line);
		}
	}

	/// Line resources ever created by this cache.
	pub fn allocations(&self) -> usize {
		self.allocations
	}

	/// Pooled edges, visible or not.
	pub fn len(&self) -> usize {
		self.edges.len()
	}

	/// True when no edge was ever pooled.
	pub fn is_empty(&self) -> bool {
		self.edges.is_empty()
	}

	/// Edges currently shown.
	pub fn visible_count(&self) -> usize {
		self.edges.values().filter(|e| e.visible).count()
	}

	/// Pooled edge for `key`, if the pair was ever connected.
	pub fn get(&self, key: &EdgeKey) -> Option<&Edge> {
		self.edges.get(key)
	}

	/// Every pooled edge, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = &Edge> {
		self.edges.values()
	}
}
