use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

const DRIFT_X_RATE: f32 = 0.0005;
const DRIFT_Y_RATE: f32 = 0.0003;
const DRIFT_X_AMPLITUDE: f32 = 2.0;
const DRIFT_Y_AMPLITUDE: f32 = 1.0;

/// Half-line used for pointer picking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
	/// Start point, the camera eye for picking rays.
	pub origin: Vec3,
	/// Unit length.
	pub direction: Vec3,
}

impl Ray {
	/// Distance along the ray to the first hit with a sphere, if any.
	pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
		let offset = self.origin - center;
		let b = offset.dot(self.direction);
		let c = offset.length_squared() - radius * radius;
		let disc = b * b - c;
		if disc < 0.0 {
			return None;
		}
		let root = disc.sqrt();
		let near = -b - root;
		if near >= 0.0 {
			return Some(near);
		}
		// Origin inside the sphere.
		let far = -b + root;
		(far >= 0.0).then_some(far)
	}
}

/// Perspective camera looking at the scene origin from +z.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
	/// Eye position in world space.
	pub position: Vec3,
	/// Point the camera looks at.
	pub target: Vec3,
	/// Vertical field of view in radians.
	pub fov_y: f32,
	/// Viewport width over height.
	pub aspect: f32,
	/// Near clip distance.
	pub near: f32,
	/// Far clip distance.
	pub far: f32,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			position: Vec3::new(0.0, 0.0, 50.0),
			target: Vec3::ZERO,
			fov_y: 75f32.to_radians(),
			aspect: 1.0,
			near: 0.1,
			far: 1000.0,
		}
	}
}

impl Camera {
	/// Default camera with the aspect of a `width` x `height` viewport.
	pub fn new(width: f64, height: f64) -> Self {
		let mut camera = Self::default();
		camera.set_viewport(width, height);
		camera
	}

	/// Update the aspect ratio; degenerate sizes are ignored.
	pub fn set_viewport(&mut self, width: f64, height: f64) {
		if width > 0.0 && height > 0.0 {
			self.aspect = (width / height) as f32;
		}
	}

	/// World to camera transform.
	pub fn view(&self) -> Mat4 {
		Mat4::look_at_rh(self.position, self.target, Vec3::Y)
	}

	/// Camera to clip space transform.
	pub fn projection(&self) -> Mat4 {
		Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
	}

	/// `projection * view`.
	pub fn view_projection(&self) -> Mat4 {
		self.projection() * self.view()
	}

	/// Normalized device coordinates of `world`, or `None` behind the camera.
	pub fn project(&self, world: Vec3) -> Option<Vec3> {
		let clip = self.view_projection() * world.extend(1.0);
		(clip.w > self.near).then(|| clip.xyz() / clip.w)
	}

	/// Pixel position of `world` in a `width` x `height` viewport, together
	/// with how many pixels one world unit spans at that depth.
	pub fn to_screen(&self, world: Vec3, width: f64, height: f64) -> Option<(Vec2, f32)> {
		let clip = self.view_projection() * world.extend(1.0);
		if clip.w <= self.near {
			return None;
		}
		let ndc = clip.xy() / clip.w;
		let (w, h) = (width as f32, height as f32);
		let screen = Vec2::new((ndc.x + 1.0) * 0.5 * w, (1.0 - ndc.y) * 0.5 * h);
		let pixels_per_unit = 0.5 * h * self.projection().y_axis.y / clip.w;
		Some((screen, pixels_per_unit))
	}

	/// Ray from the eye through `ndc` on the image plane.
	pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
		let half = (self.fov_y * 0.5).tan();
		let local = Vec3::new(ndc.x * half * self.aspect, ndc.y * half, -1.0);
		Ray {
			origin: self.position,
			direction: self.view().inverse().transform_vector3(local).normalize(),
		}
	}

	/// Slow sway around the origin; the camera keeps aiming at `target`.
	pub fn drift(&mut self, frame: u64) {
		let t = frame as f32;
		self.position.x = (t * DRIFT_X_RATE).sin() * DRIFT_X_AMPLITUDE;
		self.position.y = (t * DRIFT_Y_RATE).cos() * DRIFT_Y_AMPLITUDE;
	}
}

/// Map viewport pixels to normalized device coordinates (+y up).
pub fn pointer_to_ndc(x: f64, y: f64, width: f64, height: f64) -> Vec2 {
	Vec2::new(
		(x / width * 2.0 - 1.0) as f32,
		(-(y / height) * 2.0 + 1.0) as f32,
	)
}
