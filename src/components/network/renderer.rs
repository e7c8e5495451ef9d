use glam::Vec3;

use super::camera::Camera;
use super::error::RenderError;

/// Handle to a node representation owned by a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointHandle(pub u32);

/// Handle to a line segment owned by a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineHandle(pub u32);

/// Appearance of a node representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointStyle {
	/// `0xRRGGBB`.
	pub color: u32,
	/// Radius in world units at scale 1.
	pub size: f32,
	/// Initial opacity.
	pub opacity: f32,
}

/// Appearance of an edge line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
	/// `0xRRGGBB`.
	pub color: u32,
	/// Line opacity.
	pub opacity: f32,
}

/// Drawing surface the simulation renders through.
///
/// Resources are created once and then mutated through their handles; the
/// simulation never recreates a resource it still holds. Releasing is
/// infallible so teardown always completes.
pub trait Renderer {
	/// Match the drawing surface to a viewport in CSS pixels.
	fn resize(&mut self, width: f64, height: f64) -> Result<(), RenderError>;

	/// Allocate a node representation.
	fn create_point(&mut self, style: PointStyle) -> Result<PointHandle, RenderError>;
	/// Move and restyle a node representation.
	fn update_point(
		&mut self,
		handle: PointHandle,
		position: Vec3,
		scale: f32,
		opacity: f32,
	) -> Result<(), RenderError>;
	/// Free a node representation; unknown handles are ignored.
	fn release_point(&mut self, handle: PointHandle);

	/// Allocate a hidden line segment.
	fn create_line(&mut self, style: LineStyle) -> Result<LineHandle, RenderError>;
	/// Move the endpoints of a line.
	fn update_line(&mut self, handle: LineHandle, from: Vec3, to: Vec3) -> Result<(), RenderError>;
	/// Show or hide a line without freeing it.
	fn set_line_visible(&mut self, handle: LineHandle, visible: bool) -> Result<(), RenderError>;
	/// Free a line; unknown handles are ignored.
	fn release_line(&mut self, handle: LineHandle);

	/// Present the current points and visible lines as seen from `camera`.
	fn draw(&mut self, camera: &Camera) -> Result<(), RenderError>;
}
