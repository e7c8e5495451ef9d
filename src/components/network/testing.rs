//! In-memory [`Renderer`] that records every call, for tests.

use std::collections::HashMap;

use glam::Vec3;

use super::camera::Camera;
use super::error::RenderError;
use super::renderer::{LineHandle, LineStyle, PointHandle, PointStyle, Renderer};

#[derive(Clone, Debug, PartialEq)]
pub struct PointRecord {
	pub style: PointStyle,
	pub position: Vec3,
	pub scale: f32,
	pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineRecord {
	pub style: LineStyle,
	pub from: Vec3,
	pub to: Vec3,
	pub visible: bool,
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
	pub points: HashMap<u32, PointRecord>,
	pub lines: HashMap<u32, LineRecord>,
	pub points_created: usize,
	pub lines_created: usize,
	pub visibility_calls: usize,
	pub draws: usize,
	pub viewport: (f64, f64),
	/// Refuse `create_point` once this many points exist.
	pub point_limit: Option<usize>,
	/// Refuse `create_line` once this many lines exist.
	pub line_limit: Option<usize>,
	pub fail_draw: bool,
	/// Last handle id issued.
	pub last_handle: u32,
}

impl RecordingRenderer {
	pub fn live(&self) -> usize {
		self.points.len() + self.lines.len()
	}

	pub fn visible_lines(&self) -> usize {
		self.lines.values().filter(|l| l.visible).count()
	}

	pub fn point(&self, handle: PointHandle) -> &PointRecord {
		&self.points[&handle.0]
	}

	fn next_id(&mut self) -> u32 {
		self.last_handle += 1;
		self.last_handle
	}
}

impl Renderer for RecordingRenderer {
	fn resize(&mut self, width: f64, height: f64) -> Result<(), RenderError> {
		self.viewport = (width, height);
		Ok(())
	}

	fn create_point(&mut self, style: PointStyle) -> Result<PointHandle, RenderError> {
		if self.point_limit.is_some_and(|limit| self.points.len() >= limit) {
			return Err(RenderError::new("point limit reached"));
		}
		let id = self.next_id();
		self.points.insert(
			id,
			PointRecord {
				style,
				position: Vec3::ZERO,
				scale: 1.0,
				opacity: style.opacity,
			},
		);
		self.points_created += 1;
		Ok(PointHandle(id))
	}

	fn update_point(
		&mut self,
		handle: PointHandle,
		position: Vec3,
		scale: f32,
		opacity: f32,
	) -> Result<(), RenderError> {
		let point = self
			.points
			.get_mut(&handle.0)
			.ok_or_else(|| RenderError::new(format!("unknown point {}", handle.0)))?;
		point.position = position;
		point.scale = scale;
		point.opacity = opacity;
		Ok(())
	}

	fn release_point(&mut self, handle: PointHandle) {
		self.points.remove(&handle.0);
	}

	fn create_line(&mut self, style: LineStyle) -> Result<LineHandle, RenderError> {
		if self.line_limit.is_some_and(|limit| self.lines.len() >= limit) {
			return Err(RenderError::new("line limit reached"));
		}
		let id = self.next_id();
		self.lines.insert(
			id,
			LineRecord {
				style,
				from: Vec3::ZERO,
				to: Vec3::ZERO,
				visible: false,
			},
		);
		self.lines_created += 1;
		Ok(LineHandle(id))
	}

	fn update_line(&mut self, handle: LineHandle, from: Vec3, to: Vec3) -> Result<(), RenderError> {
		let line = self
			.lines
			.get_mut(&handle.0)
			.ok_or_else(|| RenderError::new(format!("unknown line {}", handle.0)))?;
		line.from = from;
		line.to = to;
		Ok(())
	}

	fn set_line_visible(&mut self, handle: LineHandle, visible: bool) -> Result<(), RenderError> {
		let line = self
			.lines
			.get_mut(&handle.0)
			.ok_or_else(|| RenderError::new(format!("unknown line {}", handle.0)))?;
		line.visible = visible;
		self.visibility_calls += 1;
		Ok(())
	}

	fn release_line(&mut self, handle: LineHandle) {
		self.lines.remove(&handle.0);
	}

	fn draw(&mut self, _camera: &Camera) -> Result<(), RenderError> {
		if self.fail_draw {
			return Err(RenderError::new("surface lost"));
		}
		self.draws += 1;
		Ok(())
	}
}
