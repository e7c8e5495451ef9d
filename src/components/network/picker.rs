use super::camera::Ray;
use super::node::{Node, NodeId};

/// Outcome of a hover update: which node lost and which gained emphasis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverChange {
	/// Node hovered before the update.
	pub previous: Option<NodeId>,
	/// Node hovered after the update.
	pub current: Option<NodeId>,
}

impl HoverChange {
	/// Whether the hovered node differs.
	pub fn changed(&self) -> bool {
		self.previous != self.current
	}
}

/// Tracks the single node under the pointer.
#[derive(Clone, Debug, Default)]
pub struct PointerPicker {
	hovered: Option<NodeId>,
}

impl PointerPicker {
	/// Node currently under the pointer.
	pub fn hovered(&self) -> Option<NodeId> {
		self.hovered
	}

	/// Nearest node along `ray` whose sphere of `radius_of(node)` it hits.
	pub fn pick(
		&self,
		ray: &Ray,
		nodes: &[Node],
		radius_of: impl Fn(&Node) -> f32,
	) -> Option<NodeId> {
		nodes
			.iter()
			.filter_map(|node| {
				ray.intersect_sphere(node.position, radius_of(node))
					.map(|t| (node.id, t))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(id, _)| id)
	}

	/// Move the hover target to `hit`, resetting the previous target.
	pub fn apply(&mut self, hit: Option<NodeId>, nodes: &mut [Node]) -> HoverChange {
		let previous = self.hovered;
		if previous == hit {
			return HoverChange {
				previous,
				current: hit,
			};
		}
		if let Some(node) = previous.and_then(|id| nodes.get_mut(id.index())) {
			node.highlighted = false;
		}
		if let Some(node) = hit.and_then(|id| nodes.get_mut(id.index())) {
			node.highlighted = true;
		}
		self.hovered = hit;
		HoverChange {
			previous,
			current: hit,
		}
	}

	/// Drop the hover, e.g. when the pointer leaves the page.
	pub fn clear(&mut self, nodes: &mut [Node]) -> HoverChange {
		self.apply(None, nodes)
	}
}

#[cfg(test)]
mod tests {
	use glam::{Vec2, Vec3};

	use super::*;

	fn nodes() -> Vec<Node> {
		vec![
			Node::new(NodeId(0), Vec2::new(0.0, 0.0), Vec2::ZERO),
			Node::new(NodeId(1), Vec2::new(5.0, 0.0), Vec2::ZERO),
		]
	}

	fn ray_at(x: f32, y: f32) -> Ray {
		Ray {
			origin: Vec3::new(x, y, 50.0),
			direction: Vec3::NEG_Z,
		}
	}

	#[test]
	fn picks_node_under_ray() {
		let picker = PointerPicker::default();
		let nodes = nodes();
		assert_eq!(picker.pick(&ray_at(5.1, 0.0), &nodes, |_| 0.3), Some(NodeId(1)));
		assert_eq!(picker.pick(&ray_at(2.5, 0.0), &nodes, |_| 0.3), None);
	}

	#[test]
	fn nearest_hit_wins() {
		let picker = PointerPicker::default();
		let nodes = nodes();
		let ray = Ray {
			origin: Vec3::new(-10.0, 0.0, 0.0),
			direction: Vec3::X,
		};
		assert_eq!(picker.pick(&ray, &nodes, |_| 0.3), Some(NodeId(0)));
	}

	#[test]
	fn radius_follows_node_scale() {
		let picker = PointerPicker::default();
		let mut nodes = nodes();
		nodes[1].highlighted = true;
		let radius = |n: &Node| if n.highlighted { 0.45 } else { 0.3 };
		assert_eq!(picker.pick(&ray_at(5.4, 0.0), &nodes, radius), Some(NodeId(1)));
		assert_eq!(picker.pick(&ray_at(0.4, 0.0), &nodes, radius), None);
	}

	#[test]
	fn apply_moves_highlight_and_resets_previous() {
		let mut picker = PointerPicker::default();
		let mut nodes = nodes();

		let change = picker.apply(Some(NodeId(0)), &mut nodes);
		assert!(change.changed());
		assert!(nodes[0].highlighted);

		let change = picker.apply(Some(NodeId(1)), &mut nodes);
		assert_eq!(change.previous, Some(NodeId(0)));
		assert!(!nodes[0].highlighted);
		assert!(nodes[1].highlighted);

		let change = picker.apply(Some(NodeId(1)), &mut nodes);
		assert!(!change.changed());

		let change = picker.clear(&mut nodes);
		assert_eq!(change.previous, Some(NodeId(1)));
		assert_eq!(picker.hovered(), None);
		assert!(nodes.iter().all(|n| !n.highlighted));
	}
}
