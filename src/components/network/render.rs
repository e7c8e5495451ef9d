use std::f64::consts::PI;

use glam::Vec3;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::camera::Camera;
use super::config::css_rgba;
use super::error::{NetworkError, RenderError};
use super::renderer::{LineHandle, LineStyle, PointHandle, PointStyle, Renderer};

const MAX_PIXEL_RATIO: f64 = 2.0;

struct PointSlot {
	style: PointStyle,
	position: Vec3,
	scale: f32,
	opacity: f32,
}

struct LineSlot {
	style: LineStyle,
	from: Vec3,
	to: Vec3,
	visible: bool,
}

/// [`Renderer`] that projects the scene onto a 2d canvas context.
pub struct CanvasRenderer {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
	pixel_ratio: f64,
	points: Vec<Option<PointSlot>>,
	lines: Vec<Option<LineSlot>>,
}

impl CanvasRenderer {
	/// Bind to the 2d context of `canvas`.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, NetworkError> {
		let ctx = canvas
			.get_context("2d")
			.map_err(|e| NetworkError::Resource(format!("2d context request failed: {e:?}")))?
			.ok_or_else(|| NetworkError::Resource("canvas has no 2d context".into()))?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| NetworkError::Resource("unexpected context type".into()))?;
		let pixel_ratio = web_sys::window()
			.map(|w| w.device_pixel_ratio())
			.unwrap_or(1.0)
			.min(MAX_PIXEL_RATIO);

		Ok(Self {
			canvas,
			ctx,
			width: 0.0,
			height: 0.0,
			pixel_ratio,
			points: Vec::new(),
			lines: Vec::new(),
		})
	}

	fn point_mut(&mut self, handle: PointHandle) -> Result<&mut PointSlot, RenderError> {
		self.points
			.get_mut(handle.0 as usize)
			.and_then(Option::as_mut)
			.ok_or_else(|| RenderError::new(format!("stale point handle {}", handle.0)))
	}

	fn line_mut(&mut self, handle: LineHandle) -> Result<&mut LineSlot, RenderError> {
		self.lines
			.get_mut(handle.0 as usize)
			.and_then(Option::as_mut)
			.ok_or_else(|| RenderError::new(format!("stale line handle {}", handle.0)))
	}

	fn draw_lines(&self, camera: &Camera) {
		for line in self.lines.iter().flatten().filter(|l| l.visible) {
			let (Some((a, _)), Some((b, _))) = (
				camera.to_screen(line.from, self.width, self.height),
				camera.to_screen(line.to, self.width, self.height),
			) else {
				continue;
			};
			self.ctx
				.set_stroke_style_str(&css_rgba(line.style.color, line.style.opacity));
			self.ctx.begin_path();
			self.ctx.move_to(a.x as f64, a.y as f64);
			self.ctx.line_to(b.x as f64, b.y as f64);
			self.ctx.stroke();
		}
	}

	fn draw_points(&self, camera: &Camera) -> Result<(), RenderError> {
		for point in self.points.iter().flatten() {
			let Some((center, pixels_per_unit)) =
				camera.to_screen(point.position, self.width, self.height)
			else {
				continue;
			};
			let radius = (point.style.size * point.scale * pixels_per_unit) as f64;
			self.ctx
				.set_fill_style_str(&css_rgba(point.style.color, point.opacity));
			self.ctx.begin_path();
			self.ctx
				.arc(center.x as f64, center.y as f64, radius.max(0.5), 0.0, 2.0 * PI)
				.map_err(|e| RenderError::new(format!("arc failed: {e:?}")))?;
			self.ctx.fill();
		}
		Ok(())
	}
}

impl Renderer for CanvasRenderer {
	fn resize(&mut self, width: f64, height: f64) -> Result<(), RenderError> {
		self.width = width;
		self.height = height;
		self.canvas
			.set_width((width * self.pixel_ratio).round() as u32);
		self.canvas
			.set_height((height * self.pixel_ratio).round() as u32);
		Ok(())
	}

	fn create_point(&mut self, style: PointStyle) -> Result<PointHandle, RenderError> {
		self.points.push(Some(PointSlot {
			style,
			position: Vec3::ZERO,
			scale: 1.0,
			opacity: style.opacity,
		}));
		Ok(PointHandle((self.points.len() - 1) as u32))
	}

	fn update_point(
		&mut self,
		handle: PointHandle,
		position: Vec3,
		scale: f32,
		opacity: f32,
	) -> Result<(), RenderError> {
		let point = self.point_mut(handle)?;
		point.position = position;
		point.scale = scale;
		point.opacity = opacity;
		Ok(())
	}

	fn release_point(&mut self, handle: PointHandle) {
		if let Some(slot) = self.points.get_mut(handle.0 as usize) {
			*slot = None;
		}
	}

	fn create_line(&mut self, style: LineStyle) -> Result<LineHandle, RenderError> {
		self.lines.push(Some(LineSlot {
			style,
			from: Vec3::ZERO,
			to: Vec3::ZERO,
			visible: false,
		}));
		Ok(LineHandle((self.lines.len() - 1) as u32))
	}

	fn update_line(&mut self, handle: LineHandle, from: Vec3, to: Vec3) -> Result<(), RenderError> {
		let line = self.line_mut(handle)?;
		line.from = from;
		line.to = to;
		Ok(())
	}

	fn set_line_visible(&mut self, handle: LineHandle, visible: bool) -> Result<(), RenderError> {
		self.line_mut(handle)?.visible = visible;
		Ok(())
	}

	fn release_line(&mut self, handle: LineHandle) {
		if let Some(slot) = self.lines.get_mut(handle.0 as usize) {
			*slot = None;
		}
	}

	fn draw(&mut self, camera: &Camera) -> Result<(), RenderError> {
		if !self.canvas.is_connected() {
			return Err(RenderError::new("canvas is no longer attached"));
		}
		let ratio = self.pixel_ratio;
		self.ctx
			.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
			.map_err(|e| RenderError::new(format!("set_transform failed: {e:?}")))?;
		self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
		self.ctx.set_line_width(1.0);
		self.draw_lines(camera);
		self.draw_points(camera)
	}
}
