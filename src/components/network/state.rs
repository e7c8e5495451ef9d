use log::{debug, error, info};
use rand::Rng;

use super::camera::{Camera, pointer_to_ndc};
use super::config::NetworkConfig;
use super::edges::EdgeCache;
use super::error::{NetworkError, RenderError};
use super::neighbors::NeighborGraphBuilder;
use super::node::{self, BASE_OPACITY, HOVER_OPACITY, HOVER_SCALE, Node, NodeId};
use super::picker::{HoverChange, PointerPicker};
use super::renderer::{LineStyle, PointHandle, PointStyle, Renderer};

/// Lifecycle of a [`NetworkSimulation`]. `Disposed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Constructed, nothing allocated yet.
	Uninitialized,
	/// Nodes and edges live on the renderer.
	Running,
	/// Resources released.
	Disposed,
}

/// Summary of one [`NetworkSimulation::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
	/// Frame number, starting at 1.
	pub frame: u64,
	/// Whether the neighbor graph was rebuilt on this frame.
	pub recomputed: bool,
	/// Edges shown after the frame.
	pub visible_edges: usize,
}

/// Owns the nodes, the edge pool and the renderer, and advances them frame
/// by frame. Scheduling is left to the caller: `tick` may be driven by
/// `requestAnimationFrame`, a timer or a test loop.
pub struct NetworkSimulation<R: Renderer> {
	config: NetworkConfig,
	renderer: R,
	phase: Phase,
	nodes: Vec<Node>,
	points: Vec<PointHandle>,
	edges: EdgeCache,
	builder: NeighborGraphBuilder,
	picker: PointerPicker,
	camera: Camera,
	width: f64,
	height: f64,
	frame: u64,
}

impl<R: Renderer> NetworkSimulation<R> {
	/// Validate `config` and prepare an idle simulation. Nothing is allocated
	/// on the renderer until [`start`](Self::start).
	pub fn new(
		config: NetworkConfig,
		renderer: R,
		width: f64,
		height: f64,
	) -> Result<Self, NetworkError> {
		config.validate()?;
		check_viewport(width, height)?;

		let edges = EdgeCache::new(LineStyle {
			color: config.node_color,
			opacity: config.line_opacity,
		});
		let builder = NeighborGraphBuilder::new(config.max_connections, config.max_distance);

		Ok(Self {
			config,
			renderer,
			phase: Phase::Uninitialized,
			nodes: Vec::new(),
			points: Vec::new(),
			edges,
			builder,
			picker: PointerPicker::default(),
			camera: Camera::new(width, height),
			width,
			height,
			frame: 0,
		})
	}

	/// Spawn `node_count` nodes at random and start running.
	pub fn start(&mut self, rng: &mut impl Rng) -> Result<(), NetworkError> {
		self.expect_phase(Phase::Uninitialized)?;
		let nodes = node::spawn(
			self.config.node_count,
			self.config.bounds(),
			self.config.max_speed,
			rng,
		);
		self.start_with_nodes(nodes)
	}

	/// Start running with a prepared layout. Node ids must equal their index.
	///
	/// The first graph is built and drawn before returning. If the renderer
	/// refuses any allocation, everything allocated so far is released and the
	/// simulation stays uninitialized.
	pub fn start_with_nodes(&mut self, nodes: Vec<Node>) -> Result<(), NetworkError> {
		self.expect_phase(Phase::Uninitialized)?;
		if nodes.is_empty() {
			return Err(NetworkError::Config("at least one node is required".into()));
		}
		if let Some((i, node)) = nodes.iter().enumerate().find(|(i, n)| n.id.index() != *i) {
			return Err(NetworkError::Config(format!(
				"node at index {} has id {}",
				i, node.id.0
			)));
		}

		self.nodes = nodes;
		if let Err(e) = self.allocate() {
			self.release();
			self.nodes.clear();
			error!("network setup failed: {e}");
			return Err(NetworkError::Resource(e.to_string()));
		}

		self.phase = Phase::Running;
		info!(
			"network started: {} nodes, {} edges",
			self.nodes.len(),
			self.edges.visible_count()
		);
		Ok(())
	}

	fn allocate(&mut self) -> Result<(), RenderError> {
		self.renderer.resize(self.width, self.height)?;

		let style = PointStyle {
			color: self.config.node_color,
			size: self.config.node_size,
			opacity: BASE_OPACITY,
		};
		for _ in &self.nodes {
			let handle = self.renderer.create_point(style)?;
			self.points.push(handle);
		}

		let active = self.builder.build(&self.nodes);
		self.edges
			.reconcile(&active, &self.nodes, &mut self.renderer)?;
		self.push_points()?;
		self.renderer.draw(&self.camera)
	}

	fn release(&mut self) {
		for handle in self.points.drain(..) {
			self.renderer.release_point(handle);
		}
		self.edges.release_all(&mut self.renderer);
	}

	/// Advance one frame by `dt` seconds and draw it.
	///
	/// Motion is integrated first, then the graph is rebuilt when the frame
	/// number is a multiple of `update_interval`, then the frame is drawn. A
	/// renderer error is returned as is; the caller should stop scheduling.
	pub fn tick(&mut self, dt: f32) -> Result<FrameReport, NetworkError> {
		self.expect_phase(Phase::Running)?;
		let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

		self.frame += 1;
		let bounds = self.config.bounds();
		for node in &mut self.nodes {
			node.advance(dt, bounds);
		}

		let recomputed = self.frame % u64::from(self.config.update_interval) == 0;
		if let Err(e) = self.render_frame(recomputed) {
			error!("network frame {} failed: {e}", self.frame);
			return Err(e.into());
		}

		Ok(FrameReport {
			frame: self.frame,
			recomputed,
			visible_edges: self.edges.visible_count(),
		})
	}

	fn render_frame(&mut self, recompute: bool) -> Result<(), RenderError> {
		if recompute {
			let active = self.builder.build(&self.nodes);
			let stats = self
				.edges
				.reconcile(&active, &self.nodes, &mut self.renderer)?;
			debug!(
				"frame {}: {} active edges, {:?}, {} pooled",
				self.frame,
				active.len(),
				stats,
				self.edges.len()
			);
		} else {
			self.edges.refresh(&self.nodes, &mut self.renderer)?;
		}

		if self.config.camera_drift {
			self.camera.drift(self.frame);
		}
		self.push_points()?;
		self.renderer.draw(&self.camera)
	}

	fn push_points(&mut self) -> Result<(), RenderError> {
		for (node, &handle) in self.nodes.iter().zip(&self.points) {
			let (scale, opacity) = node.visual(self.frame);
			self.renderer
				.update_point(handle, node.position, scale, opacity)?;
		}
		Ok(())
	}

	/// Hover whichever node lies under the pointer at viewport pixel `(x, y)`.
	pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Result<Option<NodeId>, NetworkError> {
		self.expect_phase(Phase::Running)?;
		let ray = self
			.camera
			.ray_from_ndc(pointer_to_ndc(x, y, self.width, self.height));
		let (frame, size) = (self.frame, self.config.node_size);
		let hit = self
			.picker
			.pick(&ray, &self.nodes, |n| size * n.visual(frame).0);
		let change = self.picker.apply(hit, &mut self.nodes);
		self.push_hover(change)?;
		Ok(hit)
	}

	/// Clear the hover when the pointer leaves the page.
	pub fn on_pointer_leave(&mut self) -> Result<(), NetworkError> {
		self.expect_phase(Phase::Running)?;
		let change = self.picker.clear(&mut self.nodes);
		self.push_hover(change)
	}

	fn push_hover(&mut self, change: HoverChange) -> Result<(), NetworkError> {
		if !change.changed() {
			return Ok(());
		}
		if let Some(id) = change.previous {
			let node = &self.nodes[id.index()];
			self.renderer
				.update_point(self.points[id.index()], node.position, 1.0, BASE_OPACITY)?;
		}
		if let Some(id) = change.current {
			let node = &self.nodes[id.index()];
			self.renderer.update_point(
				self.points[id.index()],
				node.position,
				HOVER_SCALE,
				HOVER_OPACITY,
			)?;
		}
		Ok(())
	}

	/// Follow a viewport change. Allowed before start so the first frame fits.
	pub fn on_resize(&mut self, width: f64, height: f64) -> Result<(), NetworkError> {
		if self.phase == Phase::Disposed {
			return Err(NetworkError::InvalidState { phase: self.phase });
		}
		check_viewport(width, height)?;
		self.width = width;
		self.height = height;
		self.camera.set_viewport(width, height);
		if self.phase == Phase::Running {
			self.renderer.resize(width, height)?;
		}
		Ok(())
	}

	/// Release every render resource. Safe to call repeatedly and in any phase.
	pub fn dispose(&mut self) {
		if self.phase == Phase::Disposed {
			return;
		}
		let (points, edges) = (self.points.len(), self.edges.len());
		self.release();
		self.nodes.clear();
		self.picker = PointerPicker::default();
		self.phase = Phase::Disposed;
		info!("network disposed: released {points} nodes and {edges} edges");
	}

	fn expect_phase(&self, phase: Phase) -> Result<(), NetworkError> {
		if self.phase == phase {
			Ok(())
		} else {
			Err(NetworkError::InvalidState { phase: self.phase })
		}
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Nodes indexed by id.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// The pooled edges.
	pub fn edges(&self) -> &EdgeCache {
		&self.edges
	}

	/// Node under the pointer, if any.
	pub fn hovered(&self) -> Option<NodeId> {
		self.picker.hovered()
	}

	/// Frames ticked so far.
	pub fn frame(&self) -> u64 {
		self.frame
	}

	/// The scene camera.
	pub fn camera(&self) -> &Camera {
		&self.camera
	}

	/// Configuration the simulation was built with.
	pub fn config(&self) -> &NetworkConfig {
		&self.config
	}

	/// The backend being drawn to.
	pub fn renderer(&self) -> &R {
		&self.renderer
	}

	/// Mutable access to the backend.
	pub fn renderer_mut(&mut self) -> &mut R {
		&mut self.renderer
	}

	/// Renderer handle of node `id` while running.
	pub fn point_handle(&self, id: NodeId) -> Option<PointHandle> {
		self.points.get(id.index()).copied()
	}
}

fn check_viewport(width: f64, height: f64) -> Result<(), NetworkError> {
	if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
		Ok(())
	} else {
		Err(NetworkError::Resource(format!(
			"viewport {width}x{height} has no drawable area"
		)))
	}
}
