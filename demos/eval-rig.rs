use std::fs;
use std::path::PathBuf;

use aimrig::formats::parse_rig;
use aimrig::node::RigNodeUuid;
use aimrig::plugin::{initialize_plugin, NodeRegistry};
use aimrig::xform::AimAttribute;
use clap::Parser;
use glam::{Mat4, Vec3};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	#[arg(help = "Path to the rig .json file")]
	rig_path: PathBuf,
	#[arg(long, help = "Aim node to drive with --at")]
	node: Option<u32>,
	#[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], help = "World position to aim the node at")]
	at: Option<Vec<f32>>,
}

fn main() {
	tracing_subscriber::fmt::init();

	let cli = Cli::parse();

	let mut registry = NodeRegistry::new();
	initialize_plugin(&mut registry).unwrap();

	let text = fs::read_to_string(&cli.rig_path).unwrap();
	let mut rig = match parse_rig(&text, &registry) {
		Ok(rig) => rig,
		Err(e) => {
			eprintln!("Could not load {}:\n  - {e}", cli.rig_path.display());
			std::process::exit(1);
		}
	};
	info!("Loaded rig {:?}", rig.name);

	if let (Some(node), Some(at)) = (cli.node, cli.at) {
		let target = Mat4::from_translation(Vec3::from_slice(&at));
		if let Err(e) = rig.set_value(RigNodeUuid(node), AimAttribute::AimTarget, target) {
			eprintln!("{e}");
			std::process::exit(1);
		}
	}

	rig.update();

	println!("== Nodes ==\n{}", rig.nodes());
	println!("== World matrices ==");
	for node in rig.nodes().pre_order_iter() {
		if let Some(world) = rig.world_matrix(node.uuid) {
			println!("{} ({}): {}", node.name, node.uuid.0, world);
		}
	}
}
