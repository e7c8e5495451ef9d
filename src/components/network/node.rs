use glam::{Vec2, Vec3};
use rand::Rng;

/// Opacity of a node that is not hovered.
pub const BASE_OPACITY: f32 = 0.8;
/// Opacity of the hovered node.
pub const HOVER_OPACITY: f32 = 1.0;
/// Scale of the hovered node.
pub const HOVER_SCALE: f32 = 1.5;

const PULSE_RATE: f32 = 0.02;
const PULSE_AMPLITUDE: f32 = 0.1;

/// Stable identity of a node: its position in the spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
	/// Index of the node in the spawn order.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// A drifting point on the z = 0 plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Stable identity.
	pub id: NodeId,
	/// World position; z stays 0.
	pub position: Vec3,
	/// World units per second.
	pub velocity: Vec3,
	/// Set while the pointer hovers this node.
	pub highlighted: bool,
}

impl Node {
	/// Any z component is dropped to keep the layout planar.
	pub fn new(id: NodeId, position: Vec2, velocity: Vec2) -> Self {
		Self {
			id,
			position: position.extend(0.0),
			velocity: velocity.extend(0.0),
			highlighted: false,
		}
	}

	/// A node placed uniformly inside `half_extent` with a velocity of at most
	/// `max_speed / 2` per axis.
	pub fn random(id: NodeId, half_extent: Vec2, max_speed: f32, rng: &mut impl Rng) -> Self {
		let half_speed = max_speed * 0.5;
		let position = Vec2::new(
			rng.gen_range(-half_extent.x..=half_extent.x),
			rng.gen_range(-half_extent.y..=half_extent.y),
		);
		let velocity = Vec2::new(
			rng.gen_range(-half_speed..=half_speed),
			rng.gen_range(-half_speed..=half_speed),
		);
		Self::new(id, position, velocity)
	}

	/// Integrate one step and bounce off the bounds.
	///
	/// A velocity component is flipped only while the node is outside on that
	/// axis and still heading outward, so each crossing flips exactly once and
	/// the following step moves back toward the interior.
	pub fn advance(&mut self, dt: f32, half_extent: Vec2) {
		self.position += self.velocity * dt;

		if self.position.x.abs() > half_extent.x
			&& self.position.x.signum() == self.velocity.x.signum()
		{
			self.velocity.x = -self.velocity.x;
		}
		if self.position.y.abs() > half_extent.y
			&& self.position.y.signum() == self.velocity.y.signum()
		{
			self.velocity.y = -self.velocity.y;
		}
	}

	/// Breathing scale for idle nodes. Purely visual.
	pub fn pulse(&self, frame: u64) -> f32 {
		1.0 + (frame as f32 * PULSE_RATE + self.position.x).sin() * PULSE_AMPLITUDE
	}

	/// `(scale, opacity)` the node is drawn with on `frame`.
	pub fn visual(&self, frame: u64) -> (f32, f32) {
		if self.highlighted {
			(HOVER_SCALE, HOVER_OPACITY)
		} else {
			(self.pulse(frame), BASE_OPACITY)
		}
	}
}

/// Spawn `count` nodes with ids `0..count`.
pub fn spawn(count: usize, half_extent: Vec2, max_speed: f32, rng: &mut impl Rng) -> Vec<Node> {
	(0..count)
		.map(|i| Node::random(NodeId(i as u32), half_extent, max_speed, rng))
		.collect()
}
