use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

use super::config::NetworkConfig;
use super::error::NetworkError;
use super::render::CanvasRenderer;
use super::state::NetworkSimulation;

/// Longest step fed to the simulation, so a backgrounded tab does not
/// teleport nodes when it resumes.
const MAX_FRAME_DT: f64 = 0.1;

type Simulation = Rc<RefCell<NetworkSimulation<CanvasRenderer>>>;

/// Full-screen animated network of drifting nodes behind the page content.
///
/// Every prop is optional; omitted ones fall back to [`NetworkConfig::default`].
#[component]
pub fn NetworkBackground(
	/// Number of nodes.
	#[prop(optional)]
	node_count: Option<usize>,
	/// Edge line opacity.
	#[prop(optional)]
	line_opacity: Option<f32>,
	/// Node radius in world units.
	#[prop(optional)]
	node_size: Option<f32>,
	/// Node and edge color, `0xRRGGBB`.
	#[prop(optional)]
	node_color: Option<u32>,
	/// Caps connection length; pure k-NN when omitted.
	#[prop(optional)]
	max_distance: Option<f32>,
	/// Neighbors per node.
	#[prop(optional)]
	max_connections: Option<usize>,
	/// Frames between graph rebuilds.
	#[prop(optional)]
	update_interval: Option<u32>,
	/// Sway the camera.
	#[prop(optional)]
	camera_drift: Option<bool>,
	/// Fixed layout seed.
	#[prop(optional)]
	seed: Option<u64>,
) -> impl IntoView {
	let defaults = NetworkConfig::default();
	let config = NetworkConfig {
		node_count: node_count.unwrap_or(defaults.node_count),
		line_opacity: line_opacity.unwrap_or(defaults.line_opacity),
		node_size: node_size.unwrap_or(defaults.node_size),
		node_color: node_color.unwrap_or(defaults.node_color),
		max_distance,
		max_connections: max_connections.unwrap_or(defaults.max_connections),
		update_interval: update_interval.unwrap_or(defaults.update_interval),
		camera_drift: camera_drift.unwrap_or(defaults.camera_drift),
		seed,
		..defaults
	};

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let runtime: Rc<RefCell<Option<Runtime>>> = Rc::new(RefCell::new(None));
	let runtime_init = runtime.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if runtime_init.borrow().is_some() {
			return;
		}
		match Runtime::mount(canvas.into(), config.clone()) {
			Ok(rt) => *runtime_init.borrow_mut() = Some(rt),
			Err(e) => error!("network background disabled: {e}"),
		}
	});

	let runtime_cleanup = SendWrapper::new(runtime);
	on_cleanup(move || {
		if let Some(rt) = runtime_cleanup.borrow_mut().take() {
			rt.stop();
		}
	});

	view! {
		<div
			class="network-background"
			style="position: fixed; inset: 0; width: 100vw; height: 100vh; z-index: -1; margin: 0; padding: 0; overflow: hidden;"
		>
			<canvas node_ref=canvas_ref style="display: block; width: 100%; height: 100%;" />
		</div>
	}
}

/// Browser-side wiring of one mounted simulation: the animation loop and the
/// window listeners feeding it.
struct Runtime {
	window: Window,
	sim: Simulation,
	frame_id: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	on_mouse_move: Closure<dyn FnMut(MouseEvent)>,
	on_mouse_leave: Closure<dyn FnMut(MouseEvent)>,
	on_resize: Closure<dyn FnMut()>,
}

impl Runtime {
	fn mount(canvas: HtmlCanvasElement, config: NetworkConfig) -> Result<Self, NetworkError> {
		let window =
			web_sys::window().ok_or_else(|| NetworkError::Resource("no window".into()))?;
		let (width, height) = viewport(&window)?;

		let renderer = CanvasRenderer::new(canvas)?;
		let seed = config
			.seed
			.unwrap_or_else(|| (js_sys::Math::random() * u64::MAX as f64) as u64);
		let mut sim = NetworkSimulation::new(config, renderer, width, height)?;
		sim.start(&mut SmallRng::seed_from_u64(seed))?;
		let sim: Simulation = Rc::new(RefCell::new(sim));

		let sim_mm = sim.clone();
		let on_mouse_move = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
			let mut sim = sim_mm.borrow_mut();
			if let Err(e) = sim.on_pointer_move(ev.client_x() as f64, ev.client_y() as f64) {
				debug!("pointer move ignored: {e}");
			}
		});

		let sim_ml = sim.clone();
		let on_mouse_leave = Closure::<dyn FnMut(MouseEvent)>::new(move |_: MouseEvent| {
			if let Err(e) = sim_ml.borrow_mut().on_pointer_leave() {
				debug!("pointer leave ignored: {e}");
			}
		});

		let sim_rs = sim.clone();
		let on_resize = Closure::<dyn FnMut()>::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let result = viewport(&win).and_then(|(w, h)| sim_rs.borrow_mut().on_resize(w, h));
			if let Err(e) = result {
				error!("resize failed: {e}");
			}
		});

		let runtime = Self {
			window,
			sim,
			frame_id: Rc::new(Cell::new(None)),
			animate: Rc::new(RefCell::new(None)),
			on_mouse_move,
			on_mouse_leave,
			on_resize,
		};
		if let Err(e) = runtime.attach().and_then(|_| runtime.start_loop()) {
			runtime.stop();
			return Err(e);
		}
		info!("network background mounted at {width}x{height}");
		Ok(runtime)
	}

	fn attach(&self) -> Result<(), NetworkError> {
		self.window
			.add_event_listener_with_callback("mousemove", self.on_mouse_move.as_ref().unchecked_ref())
			.map_err(|e| NetworkError::Resource(format!("mousemove listener: {e:?}")))?;
		self.window
			.add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
			.map_err(|e| NetworkError::Resource(format!("resize listener: {e:?}")))?;
		if let Some(root) = self.window.document().and_then(|d| d.document_element()) {
			root.add_event_listener_with_callback(
				"mouseleave",
				self.on_mouse_leave.as_ref().unchecked_ref(),
			)
			.map_err(|e| NetworkError::Resource(format!("mouseleave listener: {e:?}")))?;
		}
		Ok(())
	}

	fn start_loop(&self) -> Result<(), NetworkError> {
		let (sim_anim, frame_anim, animate_inner) =
			(self.sim.clone(), self.frame_id.clone(), self.animate.clone());
		let mut last: Option<f64> = None;

		*self.animate.borrow_mut() = Some(Closure::new(move |now: f64| {
			frame_anim.set(None);
			let dt = last.map_or(1.0 / 60.0, |prev| ((now - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT));
			last = Some(now);

			if let Err(e) = sim_anim.borrow_mut().tick(dt as f32) {
				error!("network animation stopped: {e}");
				return;
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				match web_sys::window().map(|w| w.request_animation_frame(cb.as_ref().unchecked_ref())) {
					Some(Ok(id)) => frame_anim.set(Some(id)),
					_ => error!("could not schedule the next frame"),
				}
			}
		}));

		if let Some(ref cb) = *self.animate.borrow() {
			let id = self
				.window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.map_err(|e| NetworkError::Resource(format!("requestAnimationFrame: {e:?}")))?;
			self.frame_id.set(Some(id));
		}
		Ok(())
	}

	/// Cancel the pending frame before anything is released, so no callback
	/// can touch a disposed simulation.
	fn stop(self) {
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		self.animate.borrow_mut().take();

		let _ = self.window.remove_event_listener_with_callback(
			"mousemove",
			self.on_mouse_move.as_ref().unchecked_ref(),
		);
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
		if let Some(root) = self.window.document().and_then(|d| d.document_element()) {
			let _ = root.remove_event_listener_with_callback(
				"mouseleave",
				self.on_mouse_leave.as_ref().unchecked_ref(),
			);
		}

		self.sim.borrow_mut().dispose();
		info!("network background unmounted");
	}
}

fn viewport(window: &Window) -> Result<(f64, f64), NetworkError> {
	let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
	match (read(window.inner_width()), read(window.inner_height())) {
		(Some(w), Some(h)) => Ok((w, h)),
		_ => Err(NetworkError::Resource("window size unavailable".into())),
	}
}
