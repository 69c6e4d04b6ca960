use crate::AttributeKey;
use thiserror::Error;

/// Defects in the attribute glue that drives a [`Component`](`crate::Component`).
///
/// Invalid attribute *values* are never reported through this type.
/// They are downgraded to resets instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error<K: AttributeKey> {
	#[error("attribute {0:?} is bound more than once")]
	DuplicateBinding(K),
	#[error("attribute {0:?} is not supported by this component")]
	UnsupportedAttribute(K),
}
