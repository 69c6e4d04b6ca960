#![doc(html_root_url = "https://docs.rs/modifier-patch/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! An attribute patch engine and view recycling cache for declarative UI bridges.
//!
//! A [`Component`] keeps one slot per attribute of one native view and, at the end of each render pass,
//! applies exactly the attributes declared in that pass to its native peer. Attributes that went undeclared,
//! or were declared with an invalid value, are reset to their native defaults.
//!
//! A [`RecycleCache`] keeps detached retained views by name, so that repeated content can reuse them.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod binding;
mod component;
mod error;
mod id_map;
mod key;
pub mod options;
mod recycle;
pub mod value;

pub use binding::{AttributeTable, AttributeTableBuilder, Binding};
pub use component::{Component, PatchStats};
pub use error::Error;
pub use key::AttributeKey;
pub use options::{PatchOptions, RecycleOptions};
pub use recycle::{ElementId, Recyclable, RecycleCache};
