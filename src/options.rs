//! Runtime configuration of [`Component`](`crate::Component`)s and [`RecycleCache`](`crate::RecycleCache`)s.
//!
//! Both accept an optional [`Dispatch`], which replaces the ambient default subscriber for everything they log.
//! This lets a host route bridge diagnostics to its own sink without installing a global subscriber.

use tracing::{dispatcher, Dispatch};

/// Configures how a [`Component`](`crate::Component`) applies its patches.
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
	pub(crate) skip_unchanged: bool,
	pub(crate) dispatch: Option<Dispatch>,
}
impl PatchOptions {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// When enabled, a slot staged with a value equal to the one already applied does not cause a native call.
	///
	/// Off by default: every touched slot then issues exactly one native call per pass.
	#[must_use]
	pub fn skip_unchanged(mut self, skip_unchanged: bool) -> Self {
		self.skip_unchanged = skip_unchanged;
		self
	}

	#[must_use]
	pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
		self.dispatch = Some(dispatch);
		self
	}
}

/// The default [`RecycleOptions::warn_bucket_len`].
pub const DEFAULT_WARN_BUCKET_LEN: usize = 64;

/// Configures a [`RecycleCache`](`crate::RecycleCache`).
#[derive(Debug, Clone)]
pub struct RecycleOptions {
	pub(crate) warn_bucket_len: usize,
	pub(crate) dispatch: Option<Dispatch>,
}
impl Default for RecycleOptions {
	fn default() -> Self {
		Self {
			warn_bucket_len: DEFAULT_WARN_BUCKET_LEN,
			dispatch: None,
		}
	}
}
impl RecycleOptions {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// A warning is logged whenever a push makes a bucket reach this length.
	///
	/// Large buckets usually mean views are pushed for reuse but requested under a different name.
	#[must_use]
	pub fn warn_bucket_len(mut self, warn_bucket_len: usize) -> Self {
		self.warn_bucket_len = warn_bucket_len;
		self
	}

	#[must_use]
	pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
		self.dispatch = Some(dispatch);
		self
	}
}

/// Runs `f` with `dispatch` as default subscriber, if any.
///
/// Spans have to be created inside `f` to be recorded by it.
pub(crate) fn in_scope<R>(dispatch: Option<&Dispatch>, f: impl FnOnce() -> R) -> R {
	match dispatch {
		Some(dispatch) => dispatcher::with_default(dispatch, f),
		None => f(),
	}
}
