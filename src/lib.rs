#![warn(missing_docs)]
//! A list that wraps an iterator, evaluates it lazily and caches every item
//! it produces, so the source is only ever walked once and only as far as
//! actually needed.
//!
//! All the usual list questions are answered on demand; indexing, range
//! access, iteration, emptiness, length and containment each advance the
//! source exactly as far as the answer requires and no further.
//!
//! ```
//! use lazy_list::LazyList;
//!
//! let list = LazyList::new(0..100);
//! assert_eq!(list.cached_len(), 0);
//! assert_eq!(list.get(42), Some(42));
//! assert_eq!(list.cached_len(), 43);
//! assert!(list.contains(&55));
//! assert_eq!(list.cached_len(), 56);
//! ```

mod iter;
mod lazy_list;

pub use iter::Iter;
pub use lazy_list::LazyList;
