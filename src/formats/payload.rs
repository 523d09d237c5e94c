use glam::{Mat4, Vec3};
use json::JsonValue;
use tracing::{debug, warn};

use super::json::{as_f32s, as_list, as_object, JsonError, JsonObject};
use crate::math::transform::TransformOffset;
use crate::node::{ParentSpace, RigNode, RigNodeKind, RigNodeUuid};
use crate::plugin::NodeRegistry;
use crate::rig::{Rig, RigError};
use crate::xform::{AimAttribute, ParseAimAttributeError};

pub type RigParseResult<T> = Result<T, RigParseError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RigParseError {
	#[error("Invalid JSON\n  - {0}")]
	InvalidJson(String),
	#[error(transparent)]
	JsonError(#[from] JsonError),
	#[error("Unknown node type {0:?}")]
	UnknownNodeType(String),
	#[error(transparent)]
	UnknownAttribute(#[from] ParseAimAttributeError),
	#[error("Expected 3 or 16 floats for attribute {key:?}, got {len}")]
	InvalidAttributeValue { key: String, len: usize },
	#[error(transparent)]
	Rig(#[from] RigError),
}

impl RigParseError {
	pub fn nested(self, key: &str) -> Self {
		match self {
			RigParseError::JsonError(err) => RigParseError::JsonError(err.nested(key)),
			_ => self,
		}
	}
}

fn vals<T>(key: &str, res: RigParseResult<T>) -> RigParseResult<T> {
	res.map_err(|e| e.nested(key))
}

/// Build a rig from its JSON description. Node types are looked up by name in `registry`.
pub fn parse_rig(text: &str, registry: &NodeRegistry) -> RigParseResult<Rig> {
	let payload = json::parse(text).map_err(|e| RigParseError::InvalidJson(e.to_string()))?;
	let obj = as_object("(rig)", &payload)?;

	let name = obj.get_str("name")?;
	let root = vals("root", deserialize_node(obj.get_object("root")?, registry))?;
	let ParsedNode { node, children } = root;
	let root_id = node.uuid;

	let mut rig = Rig::new(name, node);
	load_children_rec(&mut rig, root_id, children, registry)?;

	debug!("Loaded rig {:?} with {} nodes", rig.name, rig.nodes().len());
	Ok(rig)
}

struct ParsedNode<'file> {
	node: RigNode,
	children: &'file [JsonValue],
}

fn deserialize_node<'file>(obj: JsonObject<'file>, registry: &NodeRegistry) -> RigParseResult<ParsedNode<'file>> {
	let uuid = RigNodeUuid(obj.get_u32("uuid")?);
	let name = obj.get_str("name")?;
	let type_name = obj.get_str("type")?;
	let ty = registry
		.by_name(type_name)
		.ok_or_else(|| RigParseError::UnknownNodeType(type_name.to_owned()))?;

	let mut node = RigNode::from_type(uuid, name, ty)?;

	if let Some(transform) = obj.get_optional_object("transform")? {
		match &mut node.kind {
			RigNodeKind::Transform(offset) => *offset = vals("transform", deserialize_transform(transform))?,
			RigNodeKind::Provided(_) => warn!(
				"Node {:?} of type {:?} computes its own matrix, ignoring its transform",
				name, type_name
			),
		}
	}

	if let Some(attributes) = obj.get_optional_object("attributes")? {
		vals("attributes", deserialize_attributes(&mut node, attributes))?;
	}

	Ok(ParsedNode {
		node,
		children: obj.get_optional_list("children")?,
	})
}

fn deserialize_transform(obj: JsonObject) -> RigParseResult<TransformOffset> {
	Ok(TransformOffset {
		translation: obj.get_vec3("trans")?,
		rotation: obj.get_vec3("rot")?,
		scale: obj.get_vec3("scale")?,
	})
}

fn deserialize_attributes(node: &mut RigNode, obj: JsonObject) -> RigParseResult<()> {
	let uuid = node.uuid;
	for (key, value) in obj.iter() {
		let attr: AimAttribute = key.parse()?;
		let matrix = vals(key, deserialize_attribute_value(key, value))?;

		node.aim_mut()
			.ok_or(RigError::NotAnAimTransform(uuid))?
			.set_value(attr, matrix);
		if attr == AimAttribute::InverseParentSpace {
			node.parent_space = ParentSpace::Fixed;
		}
	}

	Ok(())
}

/// Either a translation, or a whole matrix listed row by row as row-vector hosts store it.
/// The latter is exactly glam's column-major array.
fn deserialize_attribute_value(key: &str, value: &JsonValue) -> RigParseResult<Mat4> {
	let floats = as_f32s(key, as_list(key, value)?)?;
	match floats.len() {
		3 => Ok(Mat4::from_translation(Vec3::from_slice(&floats))),
		16 => Ok(Mat4::from_cols_slice(&floats)),
		len => Err(RigParseError::InvalidAttributeValue {
			key: key.to_owned(),
			len,
		}),
	}
}

fn load_children_rec(
	rig: &mut Rig,
	id: RigNodeUuid,
	children: &[JsonValue],
	registry: &NodeRegistry,
) -> RigParseResult<()> {
	for (i, child) in children.iter().enumerate() {
		let msg = &format!("children[{}]", i);

		let child = as_object("child", child).map_err(|e| RigParseError::from(e).nested(msg))?;
		let ParsedNode { node, children } = deserialize_node(child, registry).map_err(|e| e.nested(msg))?;
		let child_id = node.uuid;

		rig.add_node(id, node)?;
		if !children.is_empty() {
			load_children_rec(rig, child_id, children, registry).map_err(|e| e.nested(msg))?;
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use glam::{vec3, DMat4, DVec3, Vec3};

	use super::*;
	use crate::plugin::initialize_plugin;

	const ARM: &str = r#"{
		"name": "arm",
		"root": {
			"uuid": 1, "name": "world", "type": "static_hrc",
			"children": [
				{
					"uuid": 2, "name": "shoulder", "type": "transform",
					"transform": { "trans": [0, 1, 0], "rot": [0, 1.5707964, 0], "scale": [1, 1, 1] },
					"children": [
						{
							"uuid": 3, "name": "elbow_aim", "type": "aim_transform",
							"attributes": {
								"driver_world_position": [0, 1, 0],
								"driver_world_at": [0, 1, 4],
								"driver_world_up": [0, 3, 0]
							}
						}
					]
				},
				{
					"uuid": 4, "name": "pinned", "type": "aim_transform",
					"attributes": {
						"inverse_parent_world_space": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, -1, -2, -3, 1],
						"driver_world_at": [1, 0, 0],
						"driver_world_up": [0, 1, 0]
					}
				}
			]
		}
	}"#;

	fn registry() -> NodeRegistry {
		let mut registry = NodeRegistry::new();
		initialize_plugin(&mut registry).unwrap();
		registry
	}

	#[test]
	fn parse_arm() {
		let mut rig = parse_rig(ARM, &registry()).unwrap();
		assert_eq!(rig.name, "arm");
		assert_eq!(rig.nodes().len(), 4);
		assert_eq!(rig.nodes().root().type_name, "static_hrc");

		let aim = rig.node(RigNodeUuid(3)).unwrap();
		assert_eq!(aim.parent_space, ParentSpace::Connected);
		assert_eq!(aim.aim().unwrap().drivers().aim_target, vec3(0.0, 1.0, 4.0));

		rig.update();
		let world = rig.world_matrix(RigNodeUuid(3)).unwrap();
		assert!(world.x_axis.truncate().abs_diff_eq(DVec3::Z, 1e-6), "{world}");
		assert!(world.y_axis.truncate().abs_diff_eq(DVec3::Y, 1e-6), "{world}");
		assert!(world.w_axis.truncate().abs_diff_eq(DVec3::Y, 1e-6), "{world}");
	}

	#[test]
	fn full_matrix_attributes_are_row_major() {
		let rig = parse_rig(ARM, &registry()).unwrap();
		let pinned = rig.node(RigNodeUuid(4)).unwrap();

		assert_eq!(pinned.parent_space, ParentSpace::Fixed);
		assert_eq!(
			pinned.aim().unwrap().drivers().inverse_parent_space,
			Mat4::from_translation(vec3(-1.0, -2.0, -3.0))
		);
		assert_eq!(pinned.aim().unwrap().drivers().position, Vec3::ZERO);
		assert_eq!(
			rig.local_matrix(RigNodeUuid(4)),
			Some(DMat4::from_translation(DVec3::new(-1.0, -2.0, -3.0)))
		);
	}

	#[test]
	fn optional_fields_default() {
		let rig = parse_rig(
			r#"{ "name": "bare", "root": { "uuid": 9, "name": "grp", "type": "transform" } }"#,
			&registry(),
		)
		.unwrap();
		assert_eq!(rig.local_matrix(RigNodeUuid(9)), Some(DMat4::IDENTITY));
		assert_eq!(rig.nodes().len(), 1);
	}

	#[test]
	fn unknown_types_without_plugin() {
		let err = parse_rig(ARM, &NodeRegistry::new()).err();
		assert_eq!(err, Some(RigParseError::UnknownNodeType("static_hrc".to_owned())));
	}

	#[test]
	fn errors() {
		let registry = registry();
		let parse = |text: &str| parse_rig(text, &registry).err().map(|e| e.to_string());

		assert!(matches!(
			parse_rig("{ nope", &registry),
			Err(RigParseError::InvalidJson(_))
		));
		assert_eq!(
			parse(r#"{ "name": "r", "root": { "uuid": 1, "name": "s", "type": "trig_cos" } }"#),
			Some("Node type \"trig_cos\" cannot be placed in a rig hierarchy".to_owned())
		);
		assert_eq!(
			parse(
				r#"{ "name": "r", "root": { "uuid": 1, "name": "s", "type": "transform", "children": [
					{ "uuid": 2, "name": "t", "type": "transform", "transform": { "trans": [0, 0, 0], "rot": [0, 0, 0] } }
				] } }"#
			),
			Some(
				"Error in object at \"children[0]\"\n  - Error in object at \"transform\"\n  - Key \"scale\" does not exist"
					.to_owned()
			)
		);
		assert_eq!(
			parse(r#"{ "name": "r", "root": { "uuid": 1, "name": "s", "type": "transform", "attributes": { "driver_world_at": [0, 0, 1] } } }"#),
			Some("Rig node RigNodeUuid(1) is not an aim transform".to_owned())
		);
		assert_eq!(
			parse(r#"{ "name": "r", "root": { "uuid": 1, "name": "s", "type": "aim_transform", "attributes": { "driver_world_at": [0, 1] } } }"#),
			Some("Expected 3 or 16 floats for attribute \"driver_world_at\", got 2".to_owned())
		);
		assert_eq!(
			parse(r#"{ "name": "r", "root": { "uuid": 1, "name": "s", "type": "aim_transform", "attributes": { "aim": [0, 1, 0] } } }"#),
			Some("Unknown aim attribute \"aim\"".to_owned())
		);
		assert_eq!(
			parse(
				r#"{ "name": "r", "root": { "uuid": 1, "name": "s", "type": "transform", "children": [
					{ "uuid": 1, "name": "t", "type": "transform" }
				] } }"#
			),
			Some("Rig node RigNodeUuid(1) already exists".to_owned())
		);
	}
}
