use std::collections::HashSet;

use super::node::{Node, NodeId};

/// Canonical key of an undirected node pair, smaller id first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
	low: NodeId,
	high: NodeId,
}

impl EdgeKey {
	/// Key for the pair `{a, b}`, regardless of argument order.
	pub fn new(a: NodeId, b: NodeId) -> Self {
		if a <= b {
			Self { low: a, high: b }
		} else {
			Self { low: b, high: a }
		}
	}

	/// Both ids, smaller first.
	pub fn endpoints(self) -> (NodeId, NodeId) {
		(self.low, self.high)
	}

	/// Whether `id` is one of the endpoints.
	pub fn contains(self, id: NodeId) -> bool {
		self.low == id || self.high == id
	}
}

/// Edge keys that should be visible after one recomputation.
pub type ActiveEdgeSet = HashSet<EdgeKey>;

/// Brute-force k-nearest-neighbor graph over the node set.
///
/// Each node picks its `k` closest other nodes independently, so the relation
/// is not symmetric; the union is deduplicated through [`EdgeKey`]. Ties on
/// equal distance are resolved by an unstable sort, which neighbor wins is
/// unspecified.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborGraphBuilder {
	/// Neighbors proposed per node.
	pub k: usize,
	/// Longest connection allowed, if any.
	pub max_distance: Option<f32>,
}

impl NeighborGraphBuilder {
	/// Builder proposing `k` neighbors per node.
	pub fn new(k: usize, max_distance: Option<f32>) -> Self {
		Self { k, max_distance }
	}

	/// Ids of the closest other nodes to `nodes[index]`, nearest first.
	pub fn nearest(&self, nodes: &[Node], index: usize) -> Vec<NodeId> {
		if self.k == 0 {
			return Vec::new();
		}
		let origin = nodes[index].position;
		let cap = self.max_distance.map(|d| d * d);

		let mut candidates: Vec<(f32, NodeId)> = nodes
			.iter()
			.enumerate()
			.filter(|(i, _)| *i != index)
			.map(|(_, other)| (origin.distance_squared(other.position), other.id))
			.filter(|(d2, _)| cap.is_none_or(|c| *d2 <= c))
			.collect();
		candidates.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
		candidates.truncate(self.k);
		candidates.into_iter().map(|(_, id)| id).collect()
	}

	/// Union of every node's nearest neighbors, deduplicated by [`EdgeKey`].
	pub fn build(&self, nodes: &[Node]) -> ActiveEdgeSet {
		let per_node = self.k.min(nodes.len().saturating_sub(1));
		let mut active = ActiveEdgeSet::with_capacity(nodes.len() * per_node);
		for (i, node) in nodes.iter().enumerate() {
			for other in self.nearest(nodes, i) {
				active.insert(EdgeKey::new(node.id, other));
			}
		}
		active
	}
}

#[cfg(test)]
mod tests {
	use glam::Vec2;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::node::spawn;
	use super::*;

	fn layout(points: &[(f32, f32)]) -> Vec<Node> {
		points
			.iter()
			.enumerate()
			.map(|(i, &(x, y))| Node::new(NodeId(i as u32), Vec2::new(x, y), Vec2::ZERO))
			.collect()
	}

	#[test]
	fn key_is_order_independent() {
		let (a, b) = (NodeId(9), NodeId(2));
		assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
		assert_eq!(EdgeKey::new(a, b).endpoints(), (b, a));
		assert!(EdgeKey::new(a, b).contains(a));
		assert!(!EdgeKey::new(a, b).contains(NodeId(3)));
	}

	#[test]
	fn isolated_node_only_takes_its_closest() {
		let nodes = layout(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (5.0, 5.0)]);
		let builder = NeighborGraphBuilder::new(1, None);
		let active = builder.build(&nodes);

		// 1 and 2 both pick 0; 0 picks one of them (tie); 3 picks 1 or 2 (tie).
		assert!(active.contains(&EdgeKey::new(NodeId(0), NodeId(1))));
		assert!(active.contains(&EdgeKey::new(NodeId(0), NodeId(2))));
		assert!(!active.contains(&EdgeKey::new(NodeId(0), NodeId(3))));
		assert!(!active.contains(&EdgeKey::new(NodeId(1), NodeId(2))));

		let far: Vec<_> = active.iter().filter(|k| k.contains(NodeId(3))).collect();
		assert_eq!(far.len(), 1);
		assert!(far[0].contains(NodeId(1)) || far[0].contains(NodeId(2)));
		assert_eq!(active.len(), 3);
	}

	#[test]
	fn nearest_is_sorted_ascending() {
		let nodes = layout(&[(0.0, 0.0), (3.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
		let builder = NeighborGraphBuilder::new(3, None);
		assert_eq!(
			builder.nearest(&nodes, 0),
			vec![NodeId(2), NodeId(3), NodeId(1)]
		);
	}

	#[test]
	fn k_zero_produces_no_edges() {
		let nodes = layout(&[(0.0, 0.0), (1.0, 0.0)]);
		assert!(NeighborGraphBuilder::new(0, None).build(&nodes).is_empty());
	}

	#[test]
	fn single_node_has_no_neighbors() {
		let nodes = layout(&[(4.0, 4.0)]);
		assert!(NeighborGraphBuilder::new(4, None).build(&nodes).is_empty());
	}

	#[test]
	fn large_k_connects_every_pair() {
		let nodes = layout(&[(0.0, 0.0), (10.0, 0.0), (0.0, 7.0), (-3.0, 2.0), (8.0, 8.0)]);
		let active = NeighborGraphBuilder::new(10, None).build(&nodes);
		assert_eq!(active.len(), 5 * 4 / 2);
	}

	#[test]
	fn unbounded_k_connects_every_pair() {
		let nodes = layout(&[(0.0, 0.0), (10.0, 0.0), (0.0, 7.0), (-3.0, 2.0), (8.0, 8.0)]);
		let active = NeighborGraphBuilder::new(usize::MAX, None).build(&nodes);
		assert_eq!(active.len(), 5 * 4 / 2);

		let mut rng = SmallRng::seed_from_u64(80);
		let nodes = spawn(80, Vec2::new(50.0, 30.0), 1.0, &mut rng);
		let active = NeighborGraphBuilder::new(1 << 40, None).build(&nodes);
		assert_eq!(active.len(), 80 * 79 / 2);
	}

	#[test]
	fn distance_cap_limits_neighbors() {
		let nodes = layout(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (5.0, 5.0)]);
		let builder = NeighborGraphBuilder::new(3, Some(2.0));
		assert!(builder.nearest(&nodes, 3).is_empty());
		assert_eq!(builder.nearest(&nodes, 0).len(), 2);

		let active = builder.build(&nodes);
		assert!(active.iter().all(|k| !k.contains(NodeId(3))));
		assert_eq!(active.len(), 3);
	}

	#[test]
	fn proposal_counts_and_set_bounds_hold() {
		let mut rng = SmallRng::seed_from_u64(0x5eed);
		for n in 1..=24usize {
			for k in 0..n {
				let nodes = spawn(n, Vec2::new(50.0, 30.0), 1.0, &mut rng);
				let builder = NeighborGraphBuilder::new(k, None);
				for i in 0..n {
					let proposed = builder.nearest(&nodes, i);
					assert_eq!(proposed.len(), k.min(n - 1));
					assert!(!proposed.contains(&nodes[i].id));
				}

				let active = builder.build(&nodes);
				let proposals = n * k.min(n - 1);
				assert!(active.len() <= proposals);
				assert!(2 * active.len() >= proposals);
				assert!(active.len() <= n * (n - 1) / 2);
			}
		}
	}
}
