#![deny(missing_docs)]

//! This crate implements an in-memory ordered map, [BTree], on a B-tree whose degree is chosen at run time.
//!
//! Nodes live in an arena and refer to their children by handle. Insert splits full nodes on the
//! way back up, remove repairs underfull nodes by merging with or borrowing from a sibling, so every
//! node other than the root holds between `degree - 1` and `2 * degree - 1` items.
//!
//! Keys are ordered by a [Comparator]. The default, [NaturalOrder], uses [PartialOrd], and a pair
//! of keys it cannot order ( such as a NaN float ) is reported as [Error::IncomparableKey] rather
//! than being silently misplaced.
//!
//! # Example
//!
//! ```
//!     use arena_btree::BTree;
//!     let mut mymap = BTree::with_degree(3);
//!     mymap.insert("England", "London").unwrap();
//!     mymap.insert("France", "Paris").unwrap();
//!     assert_eq!(mymap.get(&"France"), Ok(Some(&"Paris")));
//!     assert_eq!(mymap.remove(&"England"), Ok(Some("London")));
//! ```
//!
//! # Degree
//!
//! [BTree::with_degree] coerces a degree <= 0 to [DEFAULT_DEGREE] and a degree of 1 to 2.
//! [BTree::try_with_degree] rejects them with [Error::InvalidDegree] instead.

mod arena;
mod compare;
mod config;
mod error;
mod iter;
mod node;
mod tree;

pub use compare::{Comparator, FnComparator, NaturalOrder};
pub use config::{DEFAULT_DEGREE, MIN_DEGREE};
pub use error::{Error, Result};
pub use iter::{Iter, Keys, Values};
pub use tree::BTree;

// Tests.

/* mimalloc cannot be used with miri */
#[cfg(all(test, not(miri)))]
use mimalloc::MiMalloc;

#[cfg(all(test, not(miri)))]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[cfg(test)]
mod mytests;
