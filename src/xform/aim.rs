use std::fmt;
use std::str::FromStr;

use glam::{DMat4, Mat4, Vec3};

use super::EvaluateMatrix;
use crate::math::aim::AimFrame;
use crate::math::transform::translation_of;

/// Host attributes feeding an `AimTransform`. Every write must reach the transform
/// through `AimTransform::set_value` before the next evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AimAttribute {
	InverseParentSpace,
	Position,
	AimTarget,
	UpReference,
}

impl AimAttribute {
	pub const ALL: [AimAttribute; 4] = [
		AimAttribute::InverseParentSpace,
		AimAttribute::Position,
		AimAttribute::AimTarget,
		AimAttribute::UpReference,
	];

	pub fn name(self) -> &'static str {
		match self {
			AimAttribute::InverseParentSpace => "inverse_parent_world_space",
			AimAttribute::Position => "driver_world_position",
			AimAttribute::AimTarget => "driver_world_at",
			AimAttribute::UpReference => "driver_world_up",
		}
	}
}

impl fmt::Display for AimAttribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown aim attribute {0:?}")]
pub struct ParseAimAttributeError(pub String);

impl FromStr for AimAttribute {
	type Err = ParseAimAttributeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		AimAttribute::ALL
			.into_iter()
			.find(|attr| attr.name() == s)
			.ok_or_else(|| ParseAimAttributeError(s.to_owned()))
	}
}

/// Cached driver values, all in world space except `inverse_parent_space`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverState {
	/// world -> parent local
	pub inverse_parent_space: Mat4,
	pub position: Vec3,
	pub aim_target: Vec3,
	pub up_reference: Vec3,
}

impl Default for DriverState {
	fn default() -> Self {
		Self {
			inverse_parent_space: Mat4::IDENTITY,
			position: Vec3::ZERO,
			aim_target: Vec3::ZERO,
			up_reference: Vec3::ZERO,
		}
	}
}

/// Local transform that points its X axis from a driver position toward a driver target,
/// rolled so that its Y axis leans toward an up point, expressed in its parent's space.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AimTransform {
	drivers: DriverState,
}

impl AimTransform {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn drivers(&self) -> &DriverState {
		&self.drivers
	}

	pub fn set_inverse_parent_space(&mut self, m: Mat4) {
		self.drivers.inverse_parent_space = m;
	}

	/// Only the translation of `world` is kept.
	pub fn set_position(&mut self, world: Mat4) {
		self.drivers.position = translation_of(&world);
	}

	/// Only the translation of `world` is kept.
	pub fn set_aim_target(&mut self, world: Mat4) {
		self.drivers.aim_target = translation_of(&world);
	}

	/// Only the translation of `world` is kept.
	pub fn set_up_reference(&mut self, world: Mat4) {
		self.drivers.up_reference = translation_of(&world);
	}

	/// Set-value notification from the host.
	pub fn set_value(&mut self, attr: AimAttribute, value: Mat4) {
		match attr {
			AimAttribute::InverseParentSpace => self.set_inverse_parent_space(value),
			AimAttribute::Position => self.set_position(value),
			AimAttribute::AimTarget => self.set_aim_target(value),
			AimAttribute::UpReference => self.set_up_reference(value),
		}
	}

	/// The aim frame in world space, before conversion to parent space.
	pub fn world_frame(&self) -> AimFrame {
		AimFrame::new(
			self.drivers.position,
			self.drivers.aim_target,
			self.drivers.up_reference,
		)
	}
}

impl EvaluateMatrix for AimTransform {
	fn evaluate_matrix(&self) -> DMat4 {
		let world = self.world_frame().to_matrix().as_dmat4();
		self.drivers.inverse_parent_space.as_dmat4() * world
	}
}
