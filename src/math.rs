pub mod aim;
pub mod transform;
