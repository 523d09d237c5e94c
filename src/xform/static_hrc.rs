use glam::DMat4;

use super::EvaluateMatrix;

/// Transform of purely organisational nodes (groups, anchors). Has no inputs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StaticTransform;

impl EvaluateMatrix for StaticTransform {
	fn evaluate_matrix(&self) -> DMat4 {
		DMat4::IDENTITY
	}
}
