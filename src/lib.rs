//! QuadMap: an open-addressing hash table with quadratic probing.
//!
//! All entries live in one backing array of tagged slots. Collisions are
//! resolved by walking `home, home + 1², home + 1² + 2², …` (mod capacity), and
//! the array is replaced by one of `capacity * 2 + 1` slots whenever an insert
//! would take occupancy past 0.75.
//!
//! Key-taking operations accept `Option` keys so a missing key is rejected with
//! [`MapError::InvalidArgument`] instead of being silently treated as absent:
//!
//! ```
//! use quadmap_rs::{HashTable, MapError};
//!
//! let mut table: HashTable<&str, i32> = HashTable::new();
//! table.put("a", 1).unwrap();
//! assert_eq!(table.get(&"a").unwrap(), Some(&1));
//! assert_eq!(table.put(None::<&str>, 2), Err(MapError::InvalidArgument));
//! assert_eq!(table.replace("b", 3), Err(MapError::NotFound));
//! ```
//!
//! The table is single-threaded and makes no iteration-order promises beyond
//! "physical slot order".

mod config;
mod error;
mod table;

pub use config::{RemovalPolicy, TableConfig, DEFAULT_CAPACITY, MIN_CAPACITY};
pub use error::{MapError, Result};
pub use table::{HashTable, Iter, Keys, Values};
