pub mod dg;
pub mod formats;
pub mod math;
pub mod node;
pub mod plugin;
pub mod rig;
pub mod xform;
