/// Angle attribute value, stored in radians.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
	pub const ZERO: Angle = Angle(0.0);

	pub fn from_radians(radians: f64) -> Self {
		Self(radians)
	}

	pub fn from_degrees(degrees: f64) -> Self {
		Self(degrees.to_radians())
	}

	pub fn as_radians(self) -> f64 {
		self.0
	}

	pub fn as_degrees(self) -> f64 {
		self.0.to_degrees()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigOp {
	Sin,
	Cos,
}

impl TrigOp {
	pub fn apply(self, angle: Angle) -> f64 {
		match self {
			TrigOp::Sin => angle.as_radians().sin(),
			TrigOp::Cos => angle.as_radians().cos(),
		}
	}
}

/// `result = op(operand)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrigNode {
	pub op: TrigOp,
	pub operand: Angle,
}

impl TrigNode {
	pub fn new(op: TrigOp) -> Self {
		Self {
			op,
			operand: Angle::ZERO,
		}
	}

	pub fn set_operand(&mut self, operand: Angle) {
		self.operand = operand;
	}

	pub fn compute(&self) -> f64 {
		self.op.apply(self.operand)
	}
}
