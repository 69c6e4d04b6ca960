use modifier_patch::{Recyclable, RecycleCache, RecycleOptions};
use std::{cell::RefCell, rc::Rc};

use recording_peer_::init_logging;

/// A retained view with a back-reference to the container that cached it.
#[derive(Debug)]
struct View {
	label: &'static str,
	recycle_owner: Option<Rc<()>>,
	invalidations: usize,
}
impl View {
	fn new(label: &'static str, owner: &Rc<()>) -> Rc<RefCell<Self>> {
		Rc::new(RefCell::new(Self {
			label,
			recycle_owner: Some(Rc::clone(owner)),
			invalidations: 0,
		}))
	}
}
impl Recyclable for View {
	fn invalidate(&mut self) -> bool {
		self.recycle_owner = None;
		self.invalidations += 1;
		true
	}
}

fn label(view: Option<Rc<RefCell<View>>>) -> Option<&'static str> {
	view.map(|view| view.borrow().label)
}

#[test]
fn pop_is_lifo_per_name() {
	init_logging();
	let owner = Rc::new(());
	let mut cache = RecycleCache::new();

	cache.push("ListItem", View::new("a", &owner));
	cache.push("ListItem", View::new("b", &owner));
	cache.push("Header", View::new("h", &owner));

	assert_eq!(label(cache.pop("ListItem")), Some("b"));
	assert_eq!(label(cache.pop("ListItem")), Some("a"));
	assert_eq!(label(cache.pop("ListItem")), None);
	assert_eq!(label(cache.pop("Footer")), None);
	assert_eq!(label(cache.pop("Header")), Some("h"));
	assert!(cache.is_empty());
}

#[test]
fn counts() {
	init_logging();
	let owner = Rc::new(());
	let mut cache = RecycleCache::new();
	assert!(cache.is_empty());

	cache.push("ListItem", View::new("a", &owner));
	cache.push("ListItem", View::new("b", &owner));
	cache.push("Header", View::new("h", &owner));
	assert_eq!(cache.len(), 3);
	assert_eq!(cache.bucket_len("ListItem"), 2);
	assert!(cache.contains("Header"));
	assert!(!cache.contains("Footer"));

	cache.pop("Header");
	assert!(!cache.contains("Header"));
	assert_eq!(cache.len(), 2);
}

#[test]
fn purge_all_invalidates_every_cached_view() {
	init_logging();
	let owner = Rc::new(());
	let views = [View::new("a", &owner), View::new("b", &owner), View::new("h", &owner)];
	let mut cache = RecycleCache::new();

	cache.push("ListItem", Rc::clone(&views[0]));
	cache.push("ListItem", Rc::clone(&views[1]));
	cache.push("Header", Rc::clone(&views[2]));
	let popped = cache.pop("Header");
	assert_eq!(Rc::strong_count(&owner), 4);

	assert_eq!(cache.purge_all(), 2);
	assert_eq!(views[0].borrow().invalidations, 1);
	assert_eq!(views[1].borrow().invalidations, 1);
	assert_eq!(views[2].borrow().invalidations, 0);
	assert!(popped.is_some());
	assert_eq!(Rc::strong_count(&owner), 2);
}

#[test]
fn purge_all_leaves_out_borrowed_views() {
	init_logging();
	let owner = Rc::new(());
	let held = View::new("held", &owner);
	let free = View::new("free", &owner);
	let mut cache = RecycleCache::new();
	cache.push("ListItem", Rc::clone(&held));
	cache.push("ListItem", Rc::clone(&free));

	let guard = held.borrow();
	assert_eq!(cache.purge_all(), 1);
	drop(guard);

	assert_eq!(held.borrow().invalidations, 0);
	assert!(held.borrow().recycle_owner.is_some());
	assert_eq!(free.borrow().invalidations, 1);
	assert_eq!(Rc::strong_count(&owner), 2);
}

#[test]
fn dropping_purges() {
	init_logging();
	let owner = Rc::new(());
	let view = View::new("a", &owner);
	{
		let mut cache = RecycleCache::new();
		cache.push("ListItem", Rc::clone(&view));
	}
	assert_eq!(view.borrow().invalidations, 1);
	assert!(view.borrow().recycle_owner.is_none());
}

#[test]
fn unrelated_views_share_a_name() {
	struct Spacer(Rc<RefCell<usize>>);
	impl Recyclable for Spacer {
		fn invalidate(&mut self) -> bool {
			*self.0.borrow_mut() += 1;
			true
		}
	}

	init_logging();
	let owner = Rc::new(());
	let spacer_invalidations = Rc::new(RefCell::new(0));
	let mut cache = RecycleCache::<Box<dyn Recyclable>>::with_options(RecycleOptions::new().warn_bucket_len(2));

	cache.push("Cell", Box::new(Spacer(Rc::clone(&spacer_invalidations))));
	cache.push("Cell", Box::new(View::new("a", &owner)));
	cache.push("Cell", Box::new(Spacer(Rc::clone(&spacer_invalidations))));
	assert_eq!(cache.bucket_len("Cell"), 3);

	assert_eq!(Rc::strong_count(&owner), 2);

	assert_eq!(cache.purge_all(), 3);
	assert_eq!(*spacer_invalidations.borrow(), 2);
	assert_eq!(Rc::strong_count(&owner), 1);
}

#[test]
fn proxy_node_id_follows_updates() {
	init_logging();
	let owner = Rc::new(());
	let mut cache = RecycleCache::new();
	cache.push("ListItem", View::new("a", &owner));

	assert_eq!(cache.proxy_node_id(7), 7);
	cache.update_node_id(7, 12);
	assert_eq!(cache.proxy_node_id(7), 12);
	assert_eq!(cache.proxy_node_id(12), 7);

	cache.update_node_id(7, 15);
	assert_eq!(cache.proxy_node_id(7), 15);
	assert_eq!(cache.proxy_node_id(12), 12);

	assert_eq!(cache.purge_all(), 1);
}
