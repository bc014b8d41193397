#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;

/// A HashMap implementation on top of the fixed-capacity table.
///
/// This module provides a `HashMap` that wraps the `HashTable`, ordering and
/// hashing entries by key with a configurable hasher.
pub mod hash_map;

pub mod hash_table;

/// A hash set implementation on top of the fixed-capacity table.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

/// Comparison primitives used to place and find elements.
pub mod ops;

pub use error::Error;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use hash_table::Slot;
pub use ops::FnOps;
pub use ops::KeyOps;
pub use ops::OrdOps;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`HashSet`] and [`HashMap`] unless
        /// another one is given.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`HashSet`] and [`HashMap`] unless
        /// another one is given.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder when neither `std` nor `foldhash` is enabled; supply a
        /// hasher builder explicitly.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}
