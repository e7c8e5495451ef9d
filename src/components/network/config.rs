use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::NetworkError;

/// Tunables for the network background. Every field has a default, so a
/// partial JSON object is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
	/// Nodes spawned at start.
	pub node_count: usize,
	/// Neighbors each node connects to (k).
	pub max_connections: usize,
	/// Optional cap on connection length. `None` keeps pure k-NN; with a cap a
	/// node may end up with fewer than `max_connections` edges.
	pub max_distance: Option<f32>,
	/// Opacity of every edge line, within `0..=1`.
	pub line_opacity: f32,
	/// Base node radius in world units.
	pub node_size: f32,
	/// Node and edge color as `0xRRGGBB`.
	pub node_color: u32,
	/// Frames between neighbor graph recomputations.
	pub update_interval: u32,
	/// Half width and half height of the area nodes bounce inside.
	pub half_extent: [f32; 2],
	/// Upper bound of the drift speed, in world units per second.
	pub max_speed: f32,
	/// Slowly sway the camera around the scene.
	pub camera_drift: bool,
	/// Fixed seed for the initial layout; random when absent.
	pub seed: Option<u64>,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			node_count: 80,
			max_connections: 4,
			max_distance: None,
			line_opacity: 0.15,
			node_size: 0.3,
			node_color: 0xafa4eb,
			update_interval: 10,
			half_extent: [50.0, 30.0],
			max_speed: 1.2,
			camera_drift: true,
			seed: None,
		}
	}
}

impl NetworkConfig {
	/// Parse a (possibly partial) JSON configuration and validate it.
	pub fn from_json(input: &str) -> Result<Self, NetworkError> {
		let config: Self =
			serde_json::from_str(input).map_err(|e| NetworkError::Config(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	/// Reject values the simulation cannot run with.
	pub fn validate(&self) -> Result<(), NetworkError> {
		fn reject(message: String) -> Result<(), NetworkError> {
			Err(NetworkError::Config(message))
		}

		if self.node_count == 0 {
			return reject("node_count must be greater than zero".into());
		}
		if let Some(d) = self.max_distance {
			if !(d.is_finite() && d > 0.0) {
				return reject(format!("max_distance must be a positive number, got {d}"));
			}
		}
		if !(0.0..=1.0).contains(&self.line_opacity) {
			return reject(format!(
				"line_opacity must be within 0..=1, got {}",
				self.line_opacity
			));
		}
		if !(self.node_size.is_finite() && self.node_size > 0.0) {
			return reject(format!("node_size must be positive, got {}", self.node_size));
		}
		if self.node_color > 0xff_ffff {
			return reject(format!("node_color {:#x} is not an RGB value", self.node_color));
		}
		if self.update_interval == 0 {
			return reject("update_interval must be at least one frame".into());
		}
		if self
			.half_extent
			.iter()
			.any(|e| !(e.is_finite() && *e > 0.0))
		{
			return reject(format!("half_extent must be positive, got {:?}", self.half_extent));
		}
		if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
			return reject(format!("max_speed must be non-negative, got {}", self.max_speed));
		}
		Ok(())
	}

	/// [`half_extent`](Self::half_extent) as a vector.
	pub fn bounds(&self) -> Vec2 {
		Vec2::from(self.half_extent)
	}
}

/// CSS `rgba()` string for a `0xRRGGBB` color.
pub fn css_rgba(color: u32, alpha: f32) -> String {
	let (r, g, b) = ((color >> 16) & 0xff, (color >> 8) & 0xff, color & 0xff);
	format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let config = NetworkConfig::default();
		assert!(config.validate().is_ok());
		assert_eq!(config.bounds(), Vec2::new(50.0, 30.0));
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let config = NetworkConfig::from_json(r#"{"node_count": 12, "max_distance": 20.0}"#)
			.unwrap();
		assert_eq!(config.node_count, 12);
		assert_eq!(config.max_distance, Some(20.0));
		assert_eq!(config.max_connections, 4);
		assert_eq!(config.update_interval, 10);
	}

	#[test]
	fn rejects_zero_nodes() {
		let config = NetworkConfig {
			node_count: 0,
			..Default::default()
		};
		assert!(matches!(config.validate(), Err(NetworkError::Config(_))));
	}

	#[test]
	fn rejects_negative_connections_from_json() {
		let err = NetworkConfig::from_json(r#"{"max_connections": -1}"#).unwrap_err();
		assert!(matches!(err, NetworkError::Config(_)));
	}

	#[test]
	fn rejects_out_of_range_values() {
		let bad = [
			NetworkConfig {
				line_opacity: 1.5,
				..Default::default()
			},
			NetworkConfig {
				node_size: 0.0,
				..Default::default()
			},
			NetworkConfig {
				max_distance: Some(-3.0),
				..Default::default()
			},
			NetworkConfig {
				update_interval: 0,
				..Default::default()
			},
			NetworkConfig {
				half_extent: [50.0, f32::NAN],
				..Default::default()
			},
			NetworkConfig {
				node_color: 0x1_000_000,
				..Default::default()
			},
		];
		for config in bad {
			assert!(config.validate().is_err(), "{config:?} should be rejected");
		}
	}

	#[test]
	fn formats_css_color() {
		assert_eq!(css_rgba(0xafa4eb, 0.15), "rgba(175, 164, 235, 0.15)");
	}
}
