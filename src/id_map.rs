use core::hash::{BuildHasher, Hash};
use hashbrown::{hash_map::DefaultHashBuilder, HashMap};

/// A one-to-one association between keys, queryable from either side.
pub struct BiMap<K, S = DefaultHashBuilder>
where
	K: Copy + Hash + Eq,
	S: BuildHasher,
{
	forward: HashMap<K, K, S>,
	reverse: HashMap<K, K, S>,
}
impl<K, S> Default for BiMap<K, S>
where
	K: Copy + Hash + Eq,
	S: Default + BuildHasher,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<K, S> BiMap<K, S>
where
	K: Copy + Hash + Eq,
	S: BuildHasher,
{
	#[must_use]
	pub fn new() -> Self
	where
		S: Default,
	{
		Self {
			forward: HashMap::with_hasher(S::default()),
			reverse: HashMap::with_hasher(S::default()),
		}
	}

	/// Associates `a` with `b`, dropping any previous association of either.
	pub fn insert(&mut self, a: K, b: K) {
		self.remove(a);
		self.remove(b);
		self.forward.insert(a, b);
		self.reverse.insert(b, a);
	}

	/// Removes the association `k` takes part in, on either side. Returns its counterpart.
	pub fn remove(&mut self, k: K) -> Option<K> {
		if let Some(b) = self.forward.remove(&k) {
			self.reverse.remove(&b);
			Some(b)
		} else if let Some(a) = self.reverse.remove(&k) {
			self.forward.remove(&a);
			Some(a)
		} else {
			None
		}
	}

	/// The counterpart of `k`, looking at the forward side first.
	#[must_use]
	pub fn get(&self, k: K) -> Option<K> {
		self.forward.get(&k).or_else(|| self.reverse.get(&k)).copied()
	}

	#[cfg(test)]
	#[must_use]
	pub fn len(&self) -> usize {
		self.forward.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.forward.is_empty()
	}

	pub fn clear(&mut self) {
		self.forward.clear();
		self.reverse.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::BiMap;

	#[test]
	fn lookup_from_both_sides() {
		let mut map = BiMap::<u32>::new();
		map.insert(1, 10);
		assert_eq!(map.get(1), Some(10));
		assert_eq!(map.get(10), Some(1));
		assert_eq!(map.get(2), None);
		assert_eq!(map.len(), 1);
	}

	#[test]
	fn reinsert_replaces_both_sides() {
		let mut map = BiMap::<u32>::new();
		map.insert(1, 10);
		map.insert(1, 11);
		assert_eq!(map.get(1), Some(11));
		assert_eq!(map.get(10), None);
		assert_eq!(map.get(11), Some(1));
		assert_eq!(map.len(), 1);

		assert_eq!(map.remove(11), Some(1));
		assert!(map.is_empty());
		assert_eq!(map.get(1), None);
	}
}
