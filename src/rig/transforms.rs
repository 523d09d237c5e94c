use glam::{DMat4, Mat4};
use tracing::warn;

use super::Rig;
use crate::node::{ParentSpace, RigNodeUuid};

impl Rig {
	/// Update every node's world matrix by combining each local matrix with its
	/// parent's world matrix, in a pre-order traversal.
	///
	/// Aim nodes with a connected parent space are first told the inverse of their
	/// parent's freshly computed world matrix.
	pub fn update(&mut self) {
		self.worlds.clear();

		// Pre-order traversal, just the order to ensure that parents are accessed earlier than children
		let order: Vec<RigNodeUuid> = self.nodes.pre_order_iter().map(|node| node.uuid).collect();

		for uuid in order {
			let parent_world = self
				.nodes
				.get_parent(uuid)
				.and_then(|parent| self.worlds.get(&parent.uuid))
				.copied()
				.unwrap_or(DMat4::IDENTITY);

			let Some(node) = self.nodes.get_node_mut(uuid) else {
				continue;
			};

			if node.parent_space == ParentSpace::Connected {
				let name = &node.name;
				let inverse_parent = inverse_parent_space(name, parent_world);
				if let Some(aim) = node.aim_mut() {
					aim.set_inverse_parent_space(inverse_parent);
				}
			}

			let world = parent_world * node.kind.local_matrix();
			self.worlds.insert(uuid, world);
		}
	}
}

fn inverse_parent_space(node_name: &str, parent_world: DMat4) -> Mat4 {
	// only exact singularity counts, tiny parent scales still invert
	let det = parent_world.determinant();
	let inverse = parent_world.inverse().as_mat4();
	if det != 0.0 && inverse.is_finite() {
		inverse
	} else {
		warn!("Parent of {node_name:?} has a singular world matrix, using identity parent space");
		Mat4::IDENTITY
	}
}
