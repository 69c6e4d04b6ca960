use core::{fmt::Debug, hash::Hash};

/// Identifies one attribute kind of a component, like `color` or `selectedColor`.
///
/// Usually implemented by a fieldless `enum` per component family,
/// but plain `&'static str` names work as well.
pub trait AttributeKey: Copy + Eq + Hash + Debug + 'static {
	/// A stable human-readable name, used in log output.
	fn name(self) -> &'static str;
}

impl AttributeKey for &'static str {
	fn name(self) -> &'static str {
		self
	}
}
