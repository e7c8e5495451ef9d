use thiserror::Error;

use super::state::Phase;

/// Failure reported by a [`Renderer`](super::renderer::Renderer) backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct RenderError(pub String);

impl RenderError {
	/// Error carrying `message`.
	pub fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}
}

/// Errors surfaced by the network simulation and its canvas host.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NetworkError {
	/// Construction parameters were rejected; the simulation never started.
	#[error("invalid configuration: {0}")]
	Config(String),

	/// The mount target, drawing context or an initial allocation was unavailable.
	#[error("render resource unavailable: {0}")]
	Resource(String),

	/// The renderer failed while the simulation was running.
	#[error("renderer failed: {0}")]
	Render(#[from] RenderError),

	/// An operation was invoked in a phase that does not allow it.
	#[error("operation not allowed while {phase:?}")]
	InvalidState {
		/// Phase the simulation was in.
		phase: Phase,
	},
}
