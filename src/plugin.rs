//! Node type registration.
//!
//! A host keeps one `NodeRegistry`. Loading the plugin registers its node types,
//! unloading removes them again. Each type carries a creator used to instantiate it.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::dg::{TrigNode, TrigOp};
use crate::math::transform::TransformOffset;
use crate::node::RigNodeKind;
use crate::xform::{AimTransform, StaticTransform, TransformProvider};

pub const PLUGIN_NAME: &str = "aimrig";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeTypeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
	/// Value computation, no place in the scene hierarchy.
	Depend,
	/// Scene graph node with a local matrix.
	Transform,
}

#[derive(Debug, Clone)]
pub enum NodeInstance {
	Depend(TrigNode),
	Transform(RigNodeKind),
}

#[derive(Clone, Copy, Debug)]
pub struct NodeType {
	pub id: NodeTypeId,
	pub name: &'static str,
	pub class: NodeClass,
	/// Id of the matrix type backing a custom transform.
	pub matrix_id: Option<NodeTypeId>,
	pub creator: fn() -> NodeInstance,
}

impl NodeType {
	pub fn create(&self) -> NodeInstance {
		(self.creator)()
	}
}

fn create_transform() -> NodeInstance {
	NodeInstance::Transform(RigNodeKind::Transform(TransformOffset::default()))
}

fn create_trig_sin() -> NodeInstance {
	NodeInstance::Depend(TrigNode::new(TrigOp::Sin))
}

fn create_trig_cos() -> NodeInstance {
	NodeInstance::Depend(TrigNode::new(TrigOp::Cos))
}

fn create_static_hrc() -> NodeInstance {
	NodeInstance::Transform(RigNodeKind::Provided(TransformProvider::Static(StaticTransform)))
}

fn create_aim_transform() -> NodeInstance {
	NodeInstance::Transform(RigNodeKind::Provided(TransformProvider::Aim(AimTransform::new())))
}

/// Plain offset transform every host provides.
pub const TRANSFORM: NodeType = NodeType {
	id: NodeTypeId(0),
	name: "transform",
	class: NodeClass::Transform,
	matrix_id: None,
	creator: create_transform,
};

pub const TRIG_SIN: NodeType = NodeType {
	id: NodeTypeId(0x0012a23f),
	name: "trig_sin",
	class: NodeClass::Depend,
	matrix_id: None,
	creator: create_trig_sin,
};

pub const TRIG_COS: NodeType = NodeType {
	id: NodeTypeId(0x0012a23e),
	name: "trig_cos",
	class: NodeClass::Depend,
	matrix_id: None,
	creator: create_trig_cos,
};

pub const STATIC_HRC: NodeType = NodeType {
	id: NodeTypeId(0x0012a23b),
	name: "static_hrc",
	class: NodeClass::Transform,
	matrix_id: Some(NodeTypeId(0x0012a23d)),
	creator: create_static_hrc,
};

pub const AIM_TRANSFORM: NodeType = NodeType {
	id: NodeTypeId(0x0012a23a),
	name: "aim_transform",
	class: NodeClass::Transform,
	matrix_id: Some(NodeTypeId(0x0012a23c)),
	creator: create_aim_transform,
};

/// Types registered by `initialize_plugin`, in registration order.
pub const PLUGIN_NODE_TYPES: [NodeType; 4] = [TRIG_SIN, TRIG_COS, STATIC_HRC, AIM_TRANSFORM];

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("Node type id {0:#x} is already registered")]
	DuplicateId(u32),
	#[error("Node type name {0:?} is already registered")]
	DuplicateName(&'static str),
	#[error("Node type id {0:#x} is not registered")]
	UnknownId(u32),
	#[error("Node type {0:?} belongs to the host and cannot be deregistered")]
	Builtin(&'static str),
}

pub struct NodeRegistry {
	types: BTreeMap<NodeTypeId, NodeType>,
}

impl NodeRegistry {
	/// A registry holding only the host's builtin `transform` type.
	pub fn new() -> Self {
		let mut types = BTreeMap::new();
		types.insert(TRANSFORM.id, TRANSFORM);
		Self { types }
	}

	pub fn register(&mut self, ty: NodeType) -> RegistryResult<()> {
		if self.types.contains_key(&ty.id) {
			return Err(RegistryError::DuplicateId(ty.id.0));
		}
		if self.by_name(ty.name).is_some() {
			return Err(RegistryError::DuplicateName(ty.name));
		}

		debug!("Registering node type {:?} ({:#x})", ty.name, ty.id.0);
		self.types.insert(ty.id, ty);
		Ok(())
	}

	pub fn deregister(&mut self, id: NodeTypeId) -> RegistryResult<NodeType> {
		if id == TRANSFORM.id {
			return Err(RegistryError::Builtin(TRANSFORM.name));
		}

		let ty = self.types.remove(&id).ok_or(RegistryError::UnknownId(id.0))?;
		debug!("Deregistered node type {:?} ({:#x})", ty.name, ty.id.0);
		Ok(ty)
	}

	pub fn by_id(&self, id: NodeTypeId) -> Option<&NodeType> {
		self.types.get(&id)
	}

	pub fn by_name(&self, name: &str) -> Option<&NodeType> {
		self.types.values().find(|ty| ty.name == name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &NodeType> {
		self.types.values()
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

impl Default for NodeRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Register every node type of the plugin. Nothing stays registered on failure.
pub fn initialize_plugin(registry: &mut NodeRegistry) -> RegistryResult<()> {
	for (i, ty) in PLUGIN_NODE_TYPES.iter().enumerate() {
		if let Err(e) = registry.register(*ty) {
			for registered in &PLUGIN_NODE_TYPES[..i] {
				if let Err(rollback) = registry.deregister(registered.id) {
					warn!("Could not roll back node type {:?}: {rollback}", registered.name);
				}
			}
			return Err(e);
		}
	}

	debug!("Loaded plugin {PLUGIN_NAME}");
	Ok(())
}

/// Deregister every node type of the plugin. Keeps going past missing types and
/// reports the first one.
pub fn uninitialize_plugin(registry: &mut NodeRegistry) -> RegistryResult<()> {
	let mut result = Ok(());
	for ty in &PLUGIN_NODE_TYPES {
		if let Err(e) = registry.deregister(ty.id) {
			if result.is_ok() {
				result = Err(e);
			}
		}
	}

	debug!("Unloaded plugin {PLUGIN_NAME}");
	result
}

#[cfg(test)]
mod tests {
	use glam::DMat4;

	use super::*;
	use crate::xform::EvaluateMatrix;

	#[test]
	fn load_and_unload() {
		let mut registry = NodeRegistry::new();
		assert_eq!(registry.len(), 1);

		initialize_plugin(&mut registry).unwrap();
		assert_eq!(registry.len(), 5);
		assert_eq!(registry.by_name("aim_transform").unwrap().id, NodeTypeId(0x0012a23a));
		assert_eq!(registry.by_id(NodeTypeId(0x0012a23f)).unwrap().name, "trig_sin");

		uninitialize_plugin(&mut registry).unwrap();
		assert_eq!(registry.len(), 1);
		assert!(registry.by_name("transform").is_some());
	}

	#[test]
	fn double_load_is_rejected_and_rolled_back() {
		let mut registry = NodeRegistry::new();
		registry.register(STATIC_HRC).unwrap();

		assert_eq!(
			initialize_plugin(&mut registry),
			Err(RegistryError::DuplicateId(STATIC_HRC.id.0))
		);
		// trig types registered before the failure are removed again
		assert!(registry.by_id(TRIG_SIN.id).is_none());
		assert!(registry.by_id(TRIG_COS.id).is_none());
		assert!(registry.by_id(STATIC_HRC.id).is_some());
	}

	#[test]
	fn duplicate_names_are_rejected() {
		let mut registry = NodeRegistry::new();
		let impostor = NodeType {
			id: NodeTypeId(42),
			..TRANSFORM
		};
		assert_eq!(registry.register(impostor), Err(RegistryError::DuplicateName("transform")));
	}

	#[test]
	fn deregistration_errors() {
		let mut registry = NodeRegistry::new();
		assert_eq!(registry.deregister(TRANSFORM.id).unwrap_err(), RegistryError::Builtin("transform"));
		assert_eq!(
			registry.deregister(AIM_TRANSFORM.id).unwrap_err(),
			RegistryError::UnknownId(0x0012a23a)
		);
		assert_eq!(uninitialize_plugin(&mut registry), Err(RegistryError::UnknownId(TRIG_SIN.id.0)));
	}

	#[test]
	fn creators_match_classes() {
		let mut registry = NodeRegistry::new();
		initialize_plugin(&mut registry).unwrap();

		for ty in registry.iter() {
			match (ty.class, ty.create()) {
				(NodeClass::Depend, NodeInstance::Depend(_)) => {}
				(NodeClass::Transform, NodeInstance::Transform(_)) => {}
				(class, _) => panic!("{} creates the wrong kind of node for {class:?}", ty.name),
			}
		}

		match TRIG_COS.create() {
			NodeInstance::Depend(node) => assert_eq!(node.compute(), 1.0),
			_ => unreachable!(),
		}
		match STATIC_HRC.create() {
			NodeInstance::Transform(kind) => assert_eq!(kind.local_matrix(), DMat4::IDENTITY),
			_ => unreachable!(),
		}
		match AIM_TRANSFORM.create() {
			NodeInstance::Transform(RigNodeKind::Provided(provider)) => {
				assert!(provider.as_aim().is_some());
				assert!(provider.evaluate_matrix().is_finite());
			}
			_ => unreachable!(),
		}
	}
}
