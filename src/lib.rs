//! One-to-one maps with constant-time lookup in both directions.
//!
//! A [`BiMap`] keeps keys unique and values unique. Its value→key direction,
//! [`Inverse`], is the same storage seen from the other side: every change made
//! through one direction is immediately visible through the other, and a
//! change that would break uniqueness on either side is refused before
//! anything is written.
//!
//! ```
//! use bidimap::{BiMap, Error};
//!
//! let mut ports = BiMap::new();
//! ports.insert("http", 80).unwrap();
//! ports.insert("https", 443).unwrap();
//!
//! assert_eq!(ports.inverse().get(&443), Some(&"https"));
//! assert_eq!(ports.set("web", 80), Err(Error::DuplicateValue));
//!
//! ports.set("http", 8080).unwrap();
//! assert!(!ports.contains_value(&80));
//! ```

mod bijection;
mod bimap;
mod comparer;
mod doublemap;
mod error;
pub mod iter;
mod readonly;
mod serde;

pub use bijection::{Bijection, BijectionMut, Paired};
pub use bimap::{BiMap, Inverse};
pub use comparer::{Comparer, DefaultComparer};
pub use error::Error;
pub use readonly::ReadOnly;
