use std::collections::HashMap;
use std::fmt::Display;

use indextree::{Arena, NodeId};

use super::{RigError, RigResult};
use crate::node::{RigNode, RigNodeUuid};

pub struct RigNodeTree {
	root_id: NodeId,
	arena: Arena<RigNode>,
	node_ids: HashMap<RigNodeUuid, NodeId>,
}

impl RigNodeTree {
	pub fn new_with_root(node: RigNode) -> Self {
		let id = node.uuid;
		let mut node_ids = HashMap::new();
		let mut arena = Arena::new();

		let root_id = arena.new_node(node);
		node_ids.insert(id, root_id);

		Self {
			root_id,
			arena,
			node_ids,
		}
	}

	pub fn add(&mut self, parent: RigNodeUuid, node: RigNode) -> RigResult<()> {
		let parent_id = *self.node_ids.get(&parent).ok_or(RigError::UnknownNode(parent))?;
		if self.node_ids.contains_key(&node.uuid) {
			return Err(RigError::DuplicateNode(node.uuid));
		}

		let uuid = node.uuid;
		let node_id = self.arena.new_node(node);
		parent_id.append(node_id, &mut self.arena);
		self.node_ids.insert(uuid, node_id);

		Ok(())
	}

	fn get_internal_node(&self, id: RigNodeUuid) -> Option<&indextree::Node<RigNode>> {
		self.arena.get(*self.node_ids.get(&id)?)
	}

	fn get_internal_node_mut(&mut self, id: RigNodeUuid) -> Option<&mut indextree::Node<RigNode>> {
		self.arena.get_mut(*self.node_ids.get(&id)?)
	}

	pub fn root(&self) -> &RigNode {
		self.arena[self.root_id].get()
	}

	pub fn get_node(&self, id: RigNodeUuid) -> Option<&RigNode> {
		Some(self.get_internal_node(id)?.get())
	}

	pub fn get_node_mut(&mut self, id: RigNodeUuid) -> Option<&mut RigNode> {
		Some(self.get_internal_node_mut(id)?.get_mut())
	}

	/// `None` for the root and for unknown ids.
	pub fn get_parent(&self, id: RigNodeUuid) -> Option<&RigNode> {
		let node = self.get_internal_node(id)?;
		Some(self.arena.get(node.parent()?)?.get())
	}

	pub fn children(&self, id: RigNodeUuid) -> impl Iterator<Item = &RigNode> {
		self.node_ids
			.get(&id)
			.into_iter()
			.flat_map(|node_id| node_id.children(&self.arena))
			.map(|node_id| self.arena[node_id].get())
	}

	/// Parents always come before their children.
	pub fn pre_order_iter(&self) -> impl Iterator<Item = &RigNode> {
		self.root_id
			.descendants(&self.arena)
			.map(|node_id| self.arena[node_id].get())
	}

	pub fn len(&self) -> usize {
		self.node_ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.node_ids.is_empty()
	}
}

fn rec_fmt(
	indent: usize,
	f: &mut std::fmt::Formatter<'_>,
	node_id: NodeId,
	arena: &Arena<RigNode>,
) -> std::fmt::Result {
	let Some(node) = arena.get(node_id) else {
		return Ok(());
	};

	let node = node.get();

	let type_name = node.type_name;
	#[cfg(feature = "owo")]
	let type_name = {
		use owo_colors::OwoColorize;
		type_name.magenta()
	};

	writeln!(f, "{}- [{}] {}", "  ".repeat(indent), type_name, node.name)?;
	for child in node_id.children(arena) {
		rec_fmt(indent + 1, f, child, arena)?;
	}

	Ok(())
}

impl Display for RigNodeTree {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		rec_fmt(0, f, self.root_id, &self.arena)
	}
}
