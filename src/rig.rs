mod transforms;
mod tree;

use std::collections::HashMap;

use glam::{DMat4, Mat4};

use crate::math::transform::TransformOffset;
use crate::node::{ParentSpace, RigNode, RigNodeKind, RigNodeUuid};
use crate::plugin::{NodeInstance, NodeType};
use crate::xform::{AimAttribute, ParseAimAttributeError};

pub use tree::RigNodeTree;

pub type RigResult<T> = Result<T, RigError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RigError {
	#[error("Unknown rig node {0:?}")]
	UnknownNode(RigNodeUuid),
	#[error("Rig node {0:?} already exists")]
	DuplicateNode(RigNodeUuid),
	#[error("Rig node {0:?} is not an aim transform")]
	NotAnAimTransform(RigNodeUuid),
	#[error("Rig node {0:?} has a provided matrix and no offset")]
	NotAnOffsetTransform(RigNodeUuid),
	#[error("Node type {0:?} cannot be placed in a rig hierarchy")]
	NotATransformType(&'static str),
	#[error(transparent)]
	UnknownAttribute(#[from] ParseAimAttributeError),
}

impl RigNode {
	/// Instantiate a node of a registered transform type.
	pub fn from_type(uuid: RigNodeUuid, name: impl Into<String>, ty: &NodeType) -> RigResult<Self> {
		let kind = match ty.create() {
			NodeInstance::Transform(kind) => kind,
			NodeInstance::Depend(_) => return Err(RigError::NotATransformType(ty.name)),
		};

		Ok(Self {
			uuid,
			name: name.into(),
			type_id: ty.id,
			type_name: ty.name,
			kind,
			parent_space: ParentSpace::default(),
		})
	}
}

/// A scene hierarchy of transform nodes, playing the host's part for the providers:
/// it forwards attribute notifications and propagates matrices from parents to children.
pub struct Rig {
	pub name: String,
	pub(crate) nodes: RigNodeTree,
	/// World matrices as of the last `update()`.
	worlds: HashMap<RigNodeUuid, DMat4>,
}

impl Rig {
	pub fn new(name: impl Into<String>, root: RigNode) -> Self {
		Self {
			name: name.into(),
			nodes: RigNodeTree::new_with_root(root),
			worlds: HashMap::new(),
		}
	}

	pub fn add_node(&mut self, parent: RigNodeUuid, node: RigNode) -> RigResult<()> {
		self.nodes.add(parent, node)
	}

	pub fn nodes(&self) -> &RigNodeTree {
		&self.nodes
	}

	pub fn node(&self, uuid: RigNodeUuid) -> Option<&RigNode> {
		self.nodes.get_node(uuid)
	}

	pub fn node_mut(&mut self, uuid: RigNodeUuid) -> Option<&mut RigNode> {
		self.nodes.get_node_mut(uuid)
	}

	/// Forward a set-value notification to an aim node.
	///
	/// Setting the inverse parent space explicitly detaches it from the parent:
	/// later updates keep the given value.
	pub fn set_value(&mut self, uuid: RigNodeUuid, attr: AimAttribute, value: Mat4) -> RigResult<()> {
		let node = self.nodes.get_node_mut(uuid).ok_or(RigError::UnknownNode(uuid))?;
		let aim = node.aim_mut().ok_or(RigError::NotAnAimTransform(uuid))?;
		aim.set_value(attr, value);

		if attr == AimAttribute::InverseParentSpace {
			node.parent_space = ParentSpace::Fixed;
		}
		Ok(())
	}

	/// Hand an aim node's inverse parent space back to the rig, undoing an explicit
	/// `set_value` of it. Takes effect on the next `update()`.
	pub fn connect_parent_space(&mut self, uuid: RigNodeUuid) -> RigResult<()> {
		let node = self.nodes.get_node_mut(uuid).ok_or(RigError::UnknownNode(uuid))?;
		if node.aim().is_none() {
			return Err(RigError::NotAnAimTransform(uuid));
		}

		node.parent_space = ParentSpace::Connected;
		Ok(())
	}

	pub fn set_value_by_name(&mut self, uuid: RigNodeUuid, attr: &str, value: Mat4) -> RigResult<()> {
		self.set_value(uuid, attr.parse()?, value)
	}

	/// Move a plain transform node.
	pub fn set_offset(&mut self, uuid: RigNodeUuid, offset: TransformOffset) -> RigResult<()> {
		let node = self.nodes.get_node_mut(uuid).ok_or(RigError::UnknownNode(uuid))?;
		match &mut node.kind {
			RigNodeKind::Transform(current) => {
				*current = offset;
				Ok(())
			}
			RigNodeKind::Provided(_) => Err(RigError::NotAnOffsetTransform(uuid)),
		}
	}

	/// Local matrix from the node's current inputs.
	pub fn local_matrix(&self, uuid: RigNodeUuid) -> Option<DMat4> {
		Some(self.nodes.get_node(uuid)?.kind.local_matrix())
	}

	/// World matrix computed by the last `update()`.
	pub fn world_matrix(&self, uuid: RigNodeUuid) -> Option<DMat4> {
		self.worlds.get(&uuid).copied()
	}
}
