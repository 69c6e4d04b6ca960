use crate::{
	options::{in_scope, PatchOptions},
	value::RawValue,
	AttributeKey, AttributeTable, Error,
};
use core::fmt::Debug;
use indexmap::IndexMap;
use std::rc::Rc;
use tracing::{debug, error, instrument, level_filters::STATIC_MAX_LEVEL, trace, warn, Level};

/// What the current render pass declared for a slot.
#[derive(Debug)]
enum Staged<V> {
	Untouched,
	Set(V),
	Reset,
}

#[derive(Debug)]
struct Slot<V> {
	/// The value last applied to the native peer, if any.
	live: Option<V>,
	staged: Staged<V>,
}

/// Native call counts of one [`Component::apply_patch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchStats {
	pub applied: usize,
	pub reset: usize,
	/// Applies left out because the staged value equalled the live one. Only nonzero with [`PatchOptions::skip_unchanged`].
	pub skipped: usize,
}
impl PatchStats {
	/// The number of native calls issued.
	#[must_use]
	pub fn native_calls(&self) -> usize {
		self.applied + self.reset
	}
}

/// Attached to one retained view node, a [`Component`] makes its native peer `P` carry exactly the attributes declared in the latest render pass.
///
/// # Correct Use
///
/// Per render pass, always call [`.begin_pass()`](`Component::begin_pass`) first, even if the pass declares nothing, then [`.set_slot(…)`](`Component::set_slot`) for each declared attribute,
/// then [`.apply_patch()`](`Component::apply_patch`) exactly once.
///
/// Attributes live on the peer but not declared in a pass are reset at the end of it.
/// Attributes must not depend on each other's application order on the native side.
pub struct Component<K: AttributeKey, V, P> {
	table: Rc<AttributeTable<K, P, V>>,
	peer: P,
	slots: IndexMap<K, Slot<V>>,
	pass_open: bool,
	options: PatchOptions,
}
impl<K: AttributeKey, V: Debug + PartialEq, P> Component<K, V, P> {
	#[must_use]
	pub fn new(table: Rc<AttributeTable<K, P, V>>, peer: P) -> Self {
		Self::with_options(table, peer, PatchOptions::default())
	}

	#[must_use]
	pub fn with_options(table: Rc<AttributeTable<K, P, V>>, peer: P, options: PatchOptions) -> Self {
		Self {
			table,
			peer,
			slots: IndexMap::new(),
			pass_open: false,
			options,
		}
	}

	/// Opens a render pass.
	///
	/// Anything staged by an earlier pass that never reached [`.apply_patch()`](`Component::apply_patch`) is discarded.
	pub fn begin_pass(&mut self) {
		let dispatch = self.options.dispatch.clone();
		in_scope(dispatch.as_ref(), || self.begin_pass_unscoped());
	}

	#[instrument(skip(self))]
	fn begin_pass_unscoped(&mut self) {
		if self.pass_open {
			debug!("Previous render pass was abandoned; discarding its staged slots.");
		}
		self.slots.retain(|_, slot| {
			slot.staged = Staged::Untouched;
			slot.live.is_some()
		});
		self.pass_open = true;
	}

	/// Stages `value` for `key` in the current pass. [`None`] stages a reset to the native default.
	///
	/// Values the attribute's binding rejects are staged as reset as well.
	/// No native call happens before [`.apply_patch()`](`Component::apply_patch`).
	///
	/// A pass must have been opened with [`.begin_pass()`](`Component::begin_pass`).
	/// Without debug assertions, a missing pass is logged as a warning and opened here, but any pass that declares
	/// nothing would then be skipped entirely and leave stale attributes on the peer.
	///
	/// # Panics
	///
	/// With debug assertions, iff no pass is open and `key` is supported.
	///
	/// # Errors
	///
	/// Iff this component's [`AttributeTable`] does not support `key`. Nothing is staged in that case.
	pub fn set_slot(&mut self, key: K, value: Option<V>) -> Result<(), Error<K>> {
		let dispatch = self.options.dispatch.clone();
		in_scope(dispatch.as_ref(), || self.set_slot_unscoped(key, value))
	}

	#[instrument(skip(self, value), fields(attribute = key.name()))]
	fn set_slot_unscoped(&mut self, key: K, value: Option<V>) -> Result<(), Error<K>> {
		let table = Rc::clone(&self.table);
		let binding = match table.get(key) {
			Some(binding) => binding,
			None => {
				warn!("Attribute {:?} is not bound for this component.", key.name());
				return Err(Error::UnsupportedAttribute(key));
			}
		};

		if !self.pass_open {
			warn!("Attribute {:?} declared outside of a render pass; call `begin_pass` first.", key.name());
			debug_assert!(self.pass_open, "`Component::set_slot` called without `Component::begin_pass`.");
			self.begin_pass_unscoped();
		}

		let staged = match value {
			Some(value) if binding.accepts(&value) => Staged::Set(value),
			Some(rejected) => {
				#[cfg(feature = "dangerous-logging")]
				debug!("Invalid value {:?} for {:?}; staging a reset instead.", rejected, key.name());
				#[cfg(not(feature = "dangerous-logging"))]
				debug!("Invalid value for {:?}; staging a reset instead.", key.name());
				drop(rejected);
				Staged::Reset
			}
			None => Staged::Reset,
		};

		self.slots
			.entry(key)
			.or_insert(Slot {
				live: None,
				staged: Staged::Untouched,
			})
			.staged = staged;
		Ok(())
	}

	/// Resolves `raw` through `resolve` and stages the result like [`.set_slot(…)`](`Component::set_slot`).
	///
	/// # Panics
	///
	/// Like [`.set_slot(…)`](`Component::set_slot`), with debug assertions, if no pass is open.
	///
	/// # Errors
	///
	/// Iff this component's [`AttributeTable`] does not support `key`.
	pub fn set_resolved(&mut self, key: K, raw: &RawValue, resolve: impl FnOnce(&RawValue) -> Option<V>) -> Result<(), Error<K>> {
		self.set_slot(key, resolve(raw))
	}

	/// Applies the current pass to the native peer and closes it.
	///
	/// Issues one `apply` per slot staged with a value and one `reset` per slot staged as reset or live but left untouched,
	/// in first-declaration order. Calling this again without a new pass does nothing.
	pub fn apply_patch(&mut self) -> PatchStats {
		let dispatch = self.options.dispatch.clone();
		in_scope(dispatch.as_ref(), || self.apply_patch_unscoped())
	}

	#[instrument(skip(self))]
	fn apply_patch_unscoped(&mut self) -> PatchStats {
		let mut stats = PatchStats::default();
		if !self.pass_open {
			trace!("No open render pass; nothing to apply.");
			return stats;
		}

		let Self {
			table,
			peer,
			slots,
			options,
			..
		} = self;
		slots.retain(|&key, slot| {
			let binding = match table.get(key) {
				Some(binding) => binding,
				None => {
					error!("Slot {:?} has no binding; dropping it without native call.", key.name());
					return false;
				}
			};

			match core::mem::replace(&mut slot.staged, Staged::Untouched) {
				Staged::Set(value) => {
					if options.skip_unchanged && slot.live.as_ref() == Some(&value) {
						trace!("Skipping unchanged {:?}.", key.name());
						stats.skipped += 1;
					} else {
						#[cfg(feature = "dangerous-logging")]
						trace!("Applying {:?} = {:?}.", key.name(), value);
						#[cfg(not(feature = "dangerous-logging"))]
						trace!("Applying {:?}.", key.name());
						binding.apply(peer, &value);
						stats.applied += 1;
						slot.live = Some(value);
					}
					true
				}
				Staged::Reset => {
					trace!("Resetting {:?}.", key.name());
					binding.reset(peer);
					stats.reset += 1;
					false
				}
				Staged::Untouched => {
					if slot.live.is_some() {
						trace!("Resetting undeclared {:?}.", key.name());
						binding.reset(peer);
						stats.reset += 1;
					}
					false
				}
			}
		});
		self.pass_open = false;

		if STATIC_MAX_LEVEL >= Level::DEBUG {
			let live = self.live_len();
			debug!(applied = stats.applied, reset = stats.reset, skipped = stats.skipped, live, "Applied patch.");
		}
		stats
	}

	/// Resets every live attribute on the native peer and forgets all slots, closing any open pass.
	///
	/// Use this when the view is detached for recycling, so that its next owner starts from native defaults.
	pub fn reset_all(&mut self) -> usize {
		let dispatch = self.options.dispatch.clone();
		in_scope(dispatch.as_ref(), || self.reset_all_unscoped())
	}

	#[instrument(skip(self))]
	fn reset_all_unscoped(&mut self) -> usize {
		let mut reset = 0;
		for (key, slot) in self.slots.drain(..) {
			if slot.live.is_none() {
				continue;
			}
			match self.table.get(key) {
				Some(binding) => {
					trace!("Resetting {:?}.", key.name());
					binding.reset(&mut self.peer);
					reset += 1;
				}
				None => error!("Slot {:?} has no binding; dropping it without native call.", key.name()),
			}
		}
		self.pass_open = false;
		reset
	}

	/// The value last applied for `key`, if it is live.
	#[must_use]
	pub fn live_value(&self, key: K) -> Option<&V> {
		self.slots.get(&key).and_then(|slot| slot.live.as_ref())
	}

	#[must_use]
	pub fn is_live(&self, key: K) -> bool {
		self.live_value(key).is_some()
	}

	/// The number of attributes currently applied to the native peer.
	#[must_use]
	pub fn live_len(&self) -> usize {
		self.slots.values().filter(|slot| slot.live.is_some()).count()
	}

	#[must_use]
	pub fn is_pass_open(&self) -> bool {
		self.pass_open
	}

	#[must_use]
	pub fn table(&self) -> &Rc<AttributeTable<K, P, V>> {
		&self.table
	}

	#[must_use]
	pub fn peer(&self) -> &P {
		&self.peer
	}

	pub fn peer_mut(&mut self) -> &mut P {
		&mut self.peer
	}

	/// Releases the native peer. Live attributes stay applied.
	#[must_use]
	pub fn into_peer(self) -> P {
		self.peer
	}
}
