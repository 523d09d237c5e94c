use glam::{EulerRot, Mat4, Quat, Vec3};

/// relative transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOffset {
	/// X Y Z
	pub translation: Vec3,
	/// Euler angles, radians
	pub rotation: Vec3,
	/// X Y Z
	pub scale: Vec3,
}

impl Default for TransformOffset {
	fn default() -> Self {
		Self {
			translation: Vec3::ZERO,
			rotation: Vec3::ZERO,
			scale: Vec3::ONE,
		}
	}
}

impl TransformOffset {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_translation(mut self, translation: Vec3) -> Self {
		self.translation = translation;
		self
	}

	pub fn with_rotation(mut self, rotation: Vec3) -> Self {
		self.rotation = rotation;
		self
	}

	pub fn with_scale(mut self, scale: Vec3) -> Self {
		self.scale = scale;
		self
	}

	pub fn to_matrix(&self) -> Mat4 {
		Mat4::from_translation(self.translation)
			* Mat4::from_quat(Quat::from_euler(
				EulerRot::XYZ,
				self.rotation.x,
				self.rotation.y,
				self.rotation.z,
			)) * Mat4::from_scale(self.scale)
	}
}

/// Origin of a world matrix: the translation row of a row-vector host matrix,
/// which is the `w_axis` column in glam.
#[inline]
pub fn translation_of(m: &Mat4) -> Vec3 {
	m.w_axis.truncate()
}
