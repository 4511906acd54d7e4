use serde::{Deserialize, Serialize};

/// A logical slice of the vector index. Organization content ranks ahead of
/// personal content when fused scores tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
	Organization,
	Personal,
}
impl Partition {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Organization => "organization",
			Self::Personal => "personal",
		}
	}

	/// Lower sorts first on score ties.
	pub fn priority(self) -> u8 {
		match self {
			Self::Organization => 0,
			Self::Personal => 1,
		}
	}
}
