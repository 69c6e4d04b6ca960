use crate::{AttributeKey, Error};
use core::fmt::{self, Debug, Formatter};
use indexmap::{map::Entry, IndexMap};

type ApplyFn<P, V> = Box<dyn Fn(&mut P, &V)>;
type ResetFn<P> = Box<dyn Fn(&mut P)>;
type CheckFn<V> = Box<dyn Fn(&V) -> bool>;

/// The native operations bound to one attribute kind.
pub struct Binding<P, V> {
	apply: ApplyFn<P, V>,
	reset: ResetFn<P>,
	is_valid: Option<CheckFn<V>>,
}
impl<P, V> Binding<P, V> {
	pub(crate) fn apply(&self, peer: &mut P, value: &V) {
		(self.apply)(peer, value)
	}

	pub(crate) fn reset(&self, peer: &mut P) {
		(self.reset)(peer)
	}

	#[must_use]
	pub fn accepts(&self, value: &V) -> bool {
		self.is_valid.as_ref().map_or(true, |is_valid| is_valid(value))
	}
}
impl<P, V> Debug for Binding<P, V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding").field("checked", &self.is_valid.is_some()).finish_non_exhaustive()
	}
}

/// The capability set of one component kind: which attributes it supports and how each is applied to and reset on its native peer `P`.
///
/// A table is built once per component kind and shared by all of its [`Component`](`crate::Component`)s.
pub struct AttributeTable<K: AttributeKey, P, V> {
	bindings: IndexMap<K, Binding<P, V>>,
}
impl<K: AttributeKey, P, V> AttributeTable<K, P, V> {
	#[must_use]
	pub fn builder() -> AttributeTableBuilder<K, P, V> {
		AttributeTableBuilder {
			bindings: IndexMap::new(),
			duplicate: None,
		}
	}

	#[must_use]
	pub fn get(&self, key: K) -> Option<&Binding<P, V>> {
		self.bindings.get(&key)
	}

	#[must_use]
	pub fn supports(&self, key: K) -> bool {
		self.bindings.contains_key(&key)
	}

	pub fn keys(&self) -> impl '_ + Iterator<Item = K> {
		self.bindings.keys().copied()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}
impl<K: AttributeKey, P, V> Debug for AttributeTable<K, P, V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.bindings.iter().map(|(k, b)| (k.name(), b))).finish()
	}
}

/// Collects [`Binding`]s for an [`AttributeTable`].
///
/// The first duplicate identity is remembered and reported by [`.build()`](`AttributeTableBuilder::build`),
/// so that binding calls can be chained.
pub struct AttributeTableBuilder<K: AttributeKey, P, V> {
	bindings: IndexMap<K, Binding<P, V>>,
	duplicate: Option<K>,
}
impl<K: AttributeKey, P, V> AttributeTableBuilder<K, P, V> {
	/// Binds `key` to an unconditional `apply` and its `reset`.
	#[must_use]
	pub fn bind(self, key: K, apply: impl 'static + Fn(&mut P, &V), reset: impl 'static + Fn(&mut P)) -> Self {
		self.insert(
			key,
			Binding {
				apply: Box::new(apply),
				reset: Box::new(reset),
				is_valid: None,
			},
		)
	}

	/// Like [`.bind(…)`](`AttributeTableBuilder::bind`), but values rejected by `is_valid` are staged as resets.
	#[must_use]
	pub fn bind_checked(
		self,
		key: K,
		apply: impl 'static + Fn(&mut P, &V),
		reset: impl 'static + Fn(&mut P),
		is_valid: impl 'static + Fn(&V) -> bool,
	) -> Self {
		self.insert(
			key,
			Binding {
				apply: Box::new(apply),
				reset: Box::new(reset),
				is_valid: Some(Box::new(is_valid)),
			},
		)
	}

	fn insert(mut self, key: K, binding: Binding<P, V>) -> Self {
		match self.bindings.entry(key) {
			Entry::Vacant(vacant) => {
				vacant.insert(binding);
			}
			Entry::Occupied(_) => {
				self.duplicate.get_or_insert(key);
			}
		}
		self
	}

	/// # Errors
	///
	/// Iff any attribute was bound more than once.
	pub fn build(self) -> Result<AttributeTable<K, P, V>, Error<K>> {
		match self.duplicate {
			Some(key) => Err(Error::DuplicateBinding(key)),
			None => Ok(AttributeTable { bindings: self.bindings }),
		}
	}
}
