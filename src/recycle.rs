use crate::{
	id_map::BiMap,
	options::{in_scope, RecycleOptions},
};
use hashbrown::HashMap;
use std::{cell::RefCell, rc::Rc};
use tracing::{debug, error, info, instrument, level_filters::STATIC_MAX_LEVEL, trace, warn, Level};

/// Identifies a rendered element on the native side.
pub type ElementId = u64;

/// A retained view that can sit in a [`RecycleCache`].
pub trait Recyclable {
	/// Severs the view's recycle-specific back-references, so that it can be dropped without being reused.
	///
	/// Returns `false` iff the view could not be reached, in which case its back-references are still in place.
	fn invalidate(&mut self) -> bool;
}
impl<T: Recyclable + ?Sized> Recyclable for Box<T> {
	fn invalidate(&mut self) -> bool {
		(**self).invalidate()
	}
}
impl<T: Recyclable + ?Sized> Recyclable for Rc<RefCell<T>> {
	fn invalidate(&mut self) -> bool {
		match self.try_borrow_mut() {
			Ok(mut view) => view.invalidate(),
			Err(_) => {
				warn!("Could not invalidate a cached view that is currently borrowed.");
				false
			}
		}
	}
}

/// Stacks of detached retained views, by name, for reuse across re-renders of repeated content.
///
/// Reuse is by name only. Whether a popped view can stand in for a new one is up to the caller.
///
/// # Correct Use
///
/// Push only views that are fully detached, and reinitialise popped views before attaching them.
/// Call [`.purge_all()`](`RecycleCache::purge_all`) when the owning parent view is torn down.
/// Dropping the cache purges it as well.
pub struct RecycleCache<N: Recyclable> {
	buckets: HashMap<Box<str>, Vec<N>>,
	ids: BiMap<ElementId>,
	options: RecycleOptions,
}
impl<N: Recyclable> Default for RecycleCache<N> {
	fn default() -> Self {
		Self::new()
	}
}
impl<N: Recyclable> RecycleCache<N> {
	#[must_use]
	pub fn new() -> Self {
		Self::with_options(RecycleOptions::default())
	}

	#[must_use]
	pub fn with_options(options: RecycleOptions) -> Self {
		Self {
			buckets: HashMap::new(),
			ids: BiMap::new(),
			options,
		}
	}

	/// Puts `node` on top of the stack for `name`.
	///
	/// `name` must not be empty.
	pub fn push(&mut self, name: &str, node: N) {
		let dispatch = self.options.dispatch.clone();
		in_scope(dispatch.as_ref(), || self.push_unscoped(name, node));
	}

	#[instrument(skip(self, node))]
	fn push_unscoped(&mut self, name: &str, node: N) {
		debug_assert!(!name.is_empty(), "Recycled views must be pushed under a non-empty name.");
		if name.is_empty() {
			warn!("Caching a view under an empty name.");
		}

		let len = match self.buckets.get_mut(name) {
			Some(bucket) => {
				bucket.push(node);
				bucket.len()
			}
			None => {
				self.buckets.insert(name.into(), vec![node]);
				1
			}
		};
		trace!("Cached view; bucket length is now {}.", len);
		if STATIC_MAX_LEVEL >= Level::WARN && len == self.options.warn_bucket_len {
			warn!(
				"The recycle bucket {:?} holds {} views.\n\
				This may point to views being cached under a name that is never requested.",
				name, len
			);
		}
	}

	/// Takes the most recently pushed view for `name`, if any.
	pub fn pop(&mut self, name: &str) -> Option<N> {
		let dispatch = self.options.dispatch.clone();
		in_scope(dispatch.as_ref(), || self.pop_unscoped(name))
	}

	#[instrument(skip(self))]
	fn pop_unscoped(&mut self, name: &str) -> Option<N> {
		let node = self.buckets.get_mut(name).and_then(Vec::pop);
		if node.is_some() {
			trace!("Reusing cached view.");
		} else {
			trace!("No cached view.");
		}
		node
	}

	/// Records that the view rendered as `old` is now rendered as `new`.
	pub fn update_node_id(&mut self, old: ElementId, new: ElementId) {
		in_scope(self.options.dispatch.as_ref(), || trace!(old, new, "Updating recycled element id."));
		self.ids.insert(old, new);
	}

	/// Maps an element id across the latest [`.update_node_id(…)`](`RecycleCache::update_node_id`) it took part in.
	///
	/// Ids that were never updated map to themselves.
	#[must_use]
	pub fn proxy_node_id(&self, id: ElementId) -> ElementId {
		self.ids.get(id).unwrap_or(id)
	}

	/// The total number of cached views.
	#[must_use]
	pub fn len(&self) -> usize {
		self.buckets.values().map(Vec::len).sum()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.buckets.values().all(Vec::is_empty)
	}

	#[must_use]
	pub fn bucket_len(&self, name: &str) -> usize {
		self.buckets.get(name).map_or(0, Vec::len)
	}

	/// Whether [`.pop(name)`](`RecycleCache::pop`) would find a view.
	#[must_use]
	pub fn contains(&self, name: &str) -> bool {
		self.bucket_len(name) > 0
	}

	/// Invalidates and drops every cached view, and forgets all element id updates.
	///
	/// Returns the number of views that were invalidated successfully.
	/// Views whose invalidation failed are dropped from the cache all the same, and logged as an error.
	pub fn purge_all(mut self) -> usize {
		let dispatch = self.options.dispatch.clone();
		in_scope(dispatch.as_ref(), || self.purge())
	}

	#[instrument(skip(self))]
	fn purge(&mut self) -> usize {
		let bucket_count = self.buckets.len();
		let mut purged = 0;
		let mut failed = 0;
		for (name, bucket) in self.buckets.drain() {
			trace!("Invalidating {} view(s) cached as {:?}.", bucket.len(), name);
			for mut node in bucket {
				if node.invalidate() {
					purged += 1;
				} else {
					failed += 1;
				}
			}
		}
		self.ids.clear();
		if failed > 0 {
			error!(
				"Could not invalidate {} cached view(s) during purge.\n\
				They keep their recycle back-references and may leak.",
				failed
			);
		}
		info!("Purged {} cached view(s) from {} bucket(s).", purged, bucket_count);
		purged
	}
}
impl<N: Recyclable> Drop for RecycleCache<N> {
	fn drop(&mut self) {
		if self.is_empty() && self.ids.is_empty() {
			return;
		}
		let dispatch = self.options.dispatch.clone();
		in_scope(dispatch.as_ref(), || {
			debug!("Recycle cache dropped without purge.");
			self.purge();
		});
	}
}
