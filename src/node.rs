use glam::DMat4;

use crate::math::transform::TransformOffset;
use crate::plugin::NodeTypeId;
use crate::xform::{AimTransform, EvaluateMatrix, TransformProvider};

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct RigNodeUuid(pub u32);

/// How a node's local matrix is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RigNodeKind {
	/// Placed by a fixed offset from its parent.
	Transform(TransformOffset),
	Provided(TransformProvider),
}

impl RigNodeKind {
	pub fn local_matrix(&self) -> DMat4 {
		match self {
			RigNodeKind::Transform(offset) => offset.to_matrix().as_dmat4(),
			RigNodeKind::Provided(provider) => provider.evaluate_matrix(),
		}
	}
}

/// Where an aim node's inverse parent space comes from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParentSpace {
	/// Follows the inverse of the parent's world matrix on every rig update.
	#[default]
	Connected,
	/// Set explicitly and left alone by the rig until `Rig::connect_parent_space`.
	Fixed,
}

pub struct RigNode {
	pub uuid: RigNodeUuid,
	pub name: String,
	pub type_id: NodeTypeId,
	pub type_name: &'static str,
	pub kind: RigNodeKind,
	pub parent_space: ParentSpace,
}

impl RigNode {
	pub fn aim(&self) -> Option<&AimTransform> {
		match &self.kind {
			RigNodeKind::Provided(provider) => provider.as_aim(),
			RigNodeKind::Transform(_) => None,
		}
	}

	pub fn aim_mut(&mut self) -> Option<&mut AimTransform> {
		match &mut self.kind {
			RigNodeKind::Provided(provider) => provider.as_aim_mut(),
			RigNodeKind::Transform(_) => None,
		}
	}
}
