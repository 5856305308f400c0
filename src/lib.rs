//! Insertion-ordered bidirectional map.
//!
//! [`OrderedBiMap`] keeps a one-to-one association between keys and values,
//! with hash lookup in both directions and a stable storage order that
//! survives removals.

pub mod bimap;
mod error;

pub use bimap::{Iter, OrderedBiMap};
pub use error::BiMapError;
