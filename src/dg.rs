/*!
Dependency graph nodes: pure value computations with no spatial transform.
*/

pub mod trig;

pub use trig::{Angle, TrigNode, TrigOp};
