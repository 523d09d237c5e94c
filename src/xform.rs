/*!
Transform providers. A provider decides the local matrix of a scene graph node:
- `static_hrc` -> `StaticTransform`, always identity
- `aim_transform` -> `AimTransform`, aims at a driver point from a driver position
*/

pub mod aim;
pub mod static_hrc;

use glam::DMat4;

pub use aim::{AimAttribute, AimTransform, DriverState, ParseAimAttributeError};
pub use static_hrc::StaticTransform;

/// Anything that can answer "what is your local matrix right now".
///
/// Evaluation is side effect free and may be called any number of times.
pub trait EvaluateMatrix {
	fn evaluate_matrix(&self) -> DMat4;
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransformProvider {
	Static(StaticTransform),
	Aim(AimTransform),
}

impl TransformProvider {
	pub fn as_aim(&self) -> Option<&AimTransform> {
		match self {
			TransformProvider::Aim(aim) => Some(aim),
			TransformProvider::Static(_) => None,
		}
	}

	pub fn as_aim_mut(&mut self) -> Option<&mut AimTransform> {
		match self {
			TransformProvider::Aim(aim) => Some(aim),
			TransformProvider::Static(_) => None,
		}
	}
}

impl EvaluateMatrix for TransformProvider {
	fn evaluate_matrix(&self) -> DMat4 {
		match self {
			TransformProvider::Static(s) => s.evaluate_matrix(),
			TransformProvider::Aim(a) => a.evaluate_matrix(),
		}
	}
}

impl From<StaticTransform> for TransformProvider {
	fn from(value: StaticTransform) -> Self {
		TransformProvider::Static(value)
	}
}

impl From<AimTransform> for TransformProvider {
	fn from(value: AimTransform) -> Self {
		TransformProvider::Aim(value)
	}
}

#[cfg(test)]
mod tests {
	use glam::{vec3, Mat4};

	use super::*;

	#[test]
	fn dispatch_matches_inner_provider() {
		let mut aim = AimTransform::new();
		aim.set_position(Mat4::from_translation(vec3(1.0, 0.0, 0.0)));
		aim.set_aim_target(Mat4::from_translation(vec3(1.0, 5.0, 0.0)));
		aim.set_up_reference(Mat4::from_translation(vec3(1.0, 0.0, 2.0)));

		let providers: [TransformProvider; 2] = [StaticTransform.into(), aim.clone().into()];

		assert_eq!(providers[0].evaluate_matrix(), DMat4::IDENTITY);
		assert_eq!(providers[1].evaluate_matrix(), aim.evaluate_matrix());
		assert!(providers[0].as_aim().is_none());
		assert_eq!(providers[1].as_aim(), Some(&aim));
	}
}
