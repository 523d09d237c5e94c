//! Orthonormal aim frames.
//!
//! All three inputs are world-space points. The frame is built as
//! - aim: `normalize(aim - position)`
//! - binormal: `normalize(aim × (up - position))`
//! - normal: `binormal × aim`
//!
//! and laid out as the columns `x_axis`, `y_axis`, `z_axis` of the result, with
//! `position` in `w_axis`. Row-vector hosts see the same numbers as rows.

use glam::{Mat4, Vec3};

/// Used as aim axis when the aim target coincides with the position.
pub const FALLBACK_AIM: Vec3 = Vec3::X;

/// Up directions tried, in order, when the up reference does not resolve the roll.
/// The second one can only be needed if the aim axis is parallel to the first.
pub const FALLBACK_UPS: [Vec3; 2] = [Vec3::Y, Vec3::Z];

/// Orthonormal frame aiming from a position toward a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimFrame {
	pub aim: Vec3,
	pub normal: Vec3,
	pub binormal: Vec3,
	pub position: Vec3,
}

impl AimFrame {
	pub fn new(position: Vec3, aim_target: Vec3, up_reference: Vec3) -> Self {
		let aim = match (aim_target - position).try_normalize() {
			Some(aim) => aim,
			None => {
				tracing::warn!(
					"Aim target {} coincides with position {}, aiming along {}",
					aim_target,
					position,
					FALLBACK_AIM
				);
				FALLBACK_AIM
			}
		};

		let binormal = match aim.cross(up_reference - position).try_normalize() {
			Some(binormal) => binormal,
			None => {
				tracing::warn!(
					"Up reference {} is colinear with aim axis {} from {}, using a world up",
					up_reference,
					aim,
					position
				);
				fallback_binormal(aim)
			}
		};

		let normal = binormal.cross(aim);

		Self {
			aim,
			normal,
			binormal,
			position,
		}
	}

	pub fn to_matrix(&self) -> Mat4 {
		Mat4::from_cols(
			self.aim.extend(0.0),
			self.normal.extend(0.0),
			self.binormal.extend(0.0),
			self.position.extend(1.0),
		)
	}
}

fn fallback_binormal(aim: Vec3) -> Vec3 {
	FALLBACK_UPS
		.iter()
		.find_map(|up| aim.cross(*up).try_normalize())
		// aim is a unit vector, it cannot be parallel to both fallbacks
		.unwrap_or(Vec3::Z)
}
