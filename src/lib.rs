//! An in-memory associative container using *hopscotch hashing*: lookups
//! are bounded to a small constant neighborhood around each key's home
//! slot even under load.
//!
//! The hard part — and the entire subject of this crate — is the
//! hopscotch table engine in [`table`]: its bucket/neighborhood data
//! model, its displacement algorithm on insert, its invariants across
//! removal and resize, and the rehash fallback that tolerates geometric
//! capacity growth until every entry fits its neighborhood.
//!
//! ```
//! use hopscotch_map::HopscotchMap;
//!
//! let mut map: HopscotchMap<String, i32> = HopscotchMap::new();
//! map.put("answer".to_string(), 42);
//! assert_eq!(map.get(&"answer".to_string()), Some(&42));
//! ```

mod bitmap;
mod bucket;
mod policy;
mod table;

pub use bucket::Bucket;
pub use policy::{FnPolicy, KeyPolicy, StdPolicy};
pub use table::HopscotchMap;

/// Width of a neighborhood window, in slots. Fixed: every invariant in
/// this crate refers to it, and the hop-info bitmap is sized to match.
pub const H: usize = 32;

/// Bucket count a freshly constructed table starts with. Equal to `H`
/// since a smaller array couldn't host a full neighborhood at all.
pub const INITIAL_CAPACITY: usize = H;

/// Upper bound on how many times the resize driver will double capacity
/// while chasing a dead-end reinsertion before giving up. Exists purely
/// to guarantee termination against a pathological [`KeyPolicy`]; ordinary
/// hash functions never come close to binding it.
pub const MAX_RESIZE_ATTEMPTS: u32 = 32;
