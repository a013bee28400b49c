use std::cell::RefCell;
use std::fmt;
use std::ops::{Bound, RangeBounds};

use crate::iter::Iter;

/// Signal that the source ran out before the demanded position was reached.
/// Consumed by branching at every call site, it never crosses the crate
/// boundary; scalar access reports `None` instead and range access truncates.
struct Exhausted;

struct Inner<I: Iterator> {
  cache: Vec<I::Item>,
  source: Option<I>,
}

/// Wraps an iterator and presents it as a random-access list, pulling items
/// only when they are demanded and keeping every item ever pulled, so no part
/// of the source is evaluated twice.
///
/// Indexing, range access, iteration, emptiness, length and containment are
/// all supported, and each advances the source exactly as far as the answer
/// requires. [LazyList::len] and an unbounded [LazyList::slice] consume the
/// whole source; [LazyList::is_empty] settles for a single item.
///
/// The source may be infinite. Operations that only need a bounded prefix
/// remain safe on such a list, while the draining ones will simply never
/// return.
///
/// ```
/// use lazy_list::LazyList;
///
/// let list = LazyList::new(0..10);
/// assert_eq!(list.get(5), Some(5));
/// assert_eq!(list.cached_len(), 6);
/// assert_eq!(list.slice(5..8), vec![5, 6, 7]);
/// assert_eq!(list.cached_len(), 8);
/// ```
///
/// Any number of cursors from [LazyList::iter] may be live at once; they
/// share the cache and the source position but not their own position, so
/// interleaving them never re-pulls an item. This is single-threaded
/// sharing; the list cannot be accessed from multiple threads.
pub struct LazyList<I: Iterator> {
  inner: RefCell<Inner<I>>,
}

impl<I: Iterator> LazyList<I> {
  /// Wrap an iterable. Nothing is pulled until something demands it.
  pub fn new(source: impl IntoIterator<IntoIter = I, Item = I::Item>) -> Self {
    Self {
      inner: RefCell::new(Inner {
        cache: Vec::new(),
        source: Some(source.into_iter()),
      }),
    }
  }

  /// Number of items realized so far. Never touches the source.
  pub fn cached_len(&self) -> usize { self.inner.borrow().cache.len() }

  /// Whether the source has run out. Never touches the source.
  pub fn is_exhausted(&self) -> bool { self.inner.borrow().source.is_none() }

  /// Pull from the source until the cache covers `target`. Every other
  /// operation reduces to a call to this followed by a cache read, so the
  /// cache is always a contiguous prefix of the full sequence. A no-op if
  /// the cache already reaches past `target`.
  fn expand_to_index(&self, target: usize) -> Result<(), Exhausted> {
    let mut inner = self.inner.borrow_mut();
    while inner.cache.len() <= target {
      let Inner { cache, source } = &mut *inner;
      let live = source.as_mut().ok_or(Exhausted)?;
      match live.next() {
        Some(item) => cache.push(item),
        None => {
          *source = None;
          return Err(Exhausted);
        },
      }
    }
    Ok(())
  }

  /// Pull from the source until the cache covers the end of `range`.
  /// Running out mid-way is not an error here, a range is allowed to come
  /// up short.
  fn expand_to_range(&self, range: &impl RangeBounds<usize>) {
    let last = match range.end_bound() {
      Bound::Included(&end) => end,
      Bound::Excluded(&end) => match end.checked_sub(1) {
        Some(last) => last,
        None => return,
      },
      Bound::Unbounded => return self.expand_fully(),
    };
    let _ = self.expand_to_index(last);
  }

  fn expand_fully(&self) {
    let mut inner = self.inner.borrow_mut();
    let Inner { cache, source } = &mut *inner;
    if let Some(live) = source.take() {
      cache.extend(live);
    }
  }

  /// Total number of items, realizing all of them. On a finite source the
  /// cache ends up fully populated; on an infinite source this never
  /// returns. Use [LazyList::cached_len] to observe without evaluating.
  pub fn len(&self) -> usize {
    self.expand_fully();
    self.inner.borrow().cache.len()
  }

  /// Whether the list has no items at all. Realizes at most one item, so it
  /// is safe on an infinite source.
  ///
  /// ```
  /// use lazy_list::LazyList;
  ///
  /// let naturals = LazyList::new(0..);
  /// assert!(!naturals.is_empty());
  /// assert_eq!(naturals.cached_len(), 1);
  /// ```
  pub fn is_empty(&self) -> bool { self.expand_to_index(0).is_err() }

  /// Whether `value` occurs in the list, realizing items one at a time
  /// until it is found. If the source is infinite and the value never
  /// occurs this loops forever; a lazy containment check cannot know when
  /// to give up.
  pub fn contains(&self, value: &I::Item) -> bool
  where I::Item: PartialEq {
    let mut index = 0;
    while self.expand_to_index(index).is_ok() {
      if self.inner.borrow().cache[index] == *value {
        return true;
      }
      index += 1;
    }
    false
  }
}

impl<I: Iterator> LazyList<I>
where I::Item: Clone
{
  /// The item at `index`, or `None` if the list turns out to be shorter.
  /// Realizes items up to and including `index`; a repeat visit is a plain
  /// cache read.
  pub fn get(&self, index: usize) -> Option<I::Item> {
    self.expand_to_index(index).ok()?;
    Some(self.inner.borrow().cache[index].clone())
  }

  /// The items within `range`. Accepts every range form; an open end means
  /// the whole rest of the list and drains the source. Unlike [LazyList::get]
  /// this never fails, a range over a too-short list yields whatever prefix
  /// exists.
  ///
  /// ```
  /// use lazy_list::LazyList;
  ///
  /// let list = LazyList::new(0..5);
  /// assert_eq!(list.slice(2..9), vec![2, 3, 4]);
  /// assert_eq!(list.slice(7..), vec![]);
  /// ```
  pub fn slice(&self, range: impl RangeBounds<usize>) -> Vec<I::Item> {
    self.expand_to_range(&range);
    let inner = self.inner.borrow();
    let len = inner.cache.len();
    let start = match range.start_bound() {
      Bound::Included(&s) => s,
      Bound::Excluded(&s) => s.saturating_add(1),
      Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
      Bound::Included(&e) => e.saturating_add(1).min(len),
      Bound::Excluded(&e) => e.min(len),
      Bound::Unbounded => len,
    };
    if end <= start {
      return Vec::new();
    }
    inner.cache[start..end].to_vec()
  }

  /// A fresh cursor over the list from the first item. Cursors created at
  /// different times read through the same cache, so none of them causes an
  /// item to be pulled that another already saw.
  pub fn iter(&self) -> Iter<'_, I> { Iter::new(self) }
}

impl<I: Iterator> LazyList<I> {
  /// Size information for cursors; the wrapped source's own hint, or an
  /// exact zero once it ran out.
  pub(crate) fn source_hint(&self) -> (usize, Option<usize>) {
    match &self.inner.borrow().source {
      None => (0, Some(0)),
      Some(live) => live.size_hint(),
    }
  }
}

impl<I: Iterator> fmt::Debug for LazyList<I>
where I::Item: fmt::Debug
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let inner = self.inner.borrow();
    f.debug_struct("LazyList")
      .field("cached", &inner.cache)
      .field("exhausted", &inner.source.is_none())
      .finish()
  }
}

#[cfg(test)]
mod test {
  use std::cell::Cell;
  use std::rc::Rc;

  use itertools::Itertools;

  use super::*;

  /// Source that counts how many items were ever pulled out of it
  fn counted(
    range: std::ops::Range<usize>,
  ) -> (Rc<Cell<usize>>, impl Iterator<Item = usize>) {
    let pulls = Rc::new(Cell::new(0));
    let counter = pulls.clone();
    (pulls, range.inspect(move |_| counter.set(counter.get() + 1)))
  }

  #[test]
  fn construction_pulls_nothing() {
    let (pulls, src) = counted(0..100);
    let list = LazyList::new(src);
    assert_eq!(list.cached_len(), 0);
    assert!(!list.is_exhausted());
    assert_eq!(pulls.get(), 0);
  }

  #[test]
  fn indexing_expands_minimally() {
    let (pulls, src) = counted(0..100);
    let list = LazyList::new(src);
    assert_eq!(list.get(42), Some(42));
    assert_eq!(list.cached_len(), 43);
    assert_eq!(pulls.get(), 43);
  }

  #[test]
  fn repeat_access_hits_cache() {
    let (pulls, src) = counted(0..10);
    let list = LazyList::new(src);
    assert_eq!(list.get(5), Some(5));
    assert_eq!(list.get(5), Some(5));
    assert_eq!(list.get(3), Some(3));
    assert_eq!(pulls.get(), 6);
  }

  #[test]
  fn cache_is_a_contiguous_prefix() {
    let list = LazyList::new(0..10);
    assert_eq!(list.slice(2..4), vec![2, 3]);
    assert_eq!(list.cached_len(), 4);
    assert_eq!(list.slice(..list.cached_len()), vec![0, 1, 2, 3]);
  }

  #[test]
  fn out_of_range_is_none_and_terminal() {
    let list = LazyList::new(0..5);
    assert_eq!(list.get(5), None);
    assert!(list.is_exhausted());
    assert_eq!(list.get(4), Some(4));
    assert_eq!(list.get(9), None);
    assert_eq!(list.cached_len(), 5);
  }

  #[test]
  fn slice_truncates_instead_of_failing() {
    let list = LazyList::new(0..5);
    assert_eq!(list.slice(2..9), vec![2, 3, 4]);
    assert!(list.is_exhausted());
    assert_eq!(list.slice(7..9), vec![]);
  }

  #[test]
  fn slice_bound_forms() {
    let list = LazyList::new(0..10);
    assert_eq!(list.slice(..3), vec![0, 1, 2]);
    assert_eq!(list.cached_len(), 3);
    assert_eq!(list.slice(4..=6), vec![4, 5, 6]);
    assert_eq!(list.cached_len(), 7);
    assert_eq!(list.slice(8..), vec![8, 9]);
    assert_eq!(list.slice(..), (0..10).collect_vec());
  }

  #[test]
  fn empty_range_pulls_nothing() {
    let (pulls, src) = counted(0..10);
    let list = LazyList::new(src);
    assert_eq!(list.slice(0..0), vec![]);
    assert_eq!(pulls.get(), 0);
  }

  #[test]
  fn emptiness_realizes_at_most_one() {
    let naturals = LazyList::new(0..);
    assert!(!naturals.is_empty());
    assert_eq!(naturals.cached_len(), 1);
    assert!(!naturals.is_empty());
    assert_eq!(naturals.cached_len(), 1);
  }

  #[test]
  fn emptiness_of_empty_source() {
    let list = LazyList::new(0..0);
    assert!(list.is_empty());
    assert!(list.is_exhausted());
  }

  #[test]
  fn len_drains_the_source() {
    let list = LazyList::new(0..10);
    assert_eq!(list.len(), 10);
    assert!(list.is_exhausted());
    assert_eq!(list.slice(..), (0..10).collect_vec());
  }

  #[test]
  fn contains_short_circuits() {
    let (pulls, src) = counted(0..100);
    let list = LazyList::new(src);
    assert!(list.contains(&5));
    assert_eq!(list.cached_len(), 6);
    assert_eq!(pulls.get(), 6);
  }

  #[test]
  fn contains_misses_on_finite_source() {
    let list = LazyList::new(0..5);
    assert!(!list.contains(&9));
    assert!(list.is_exhausted());
  }

  #[test]
  fn debug_does_not_evaluate() {
    let list = LazyList::new(0..10);
    let _ = list.get(1);
    let repr = format!("{list:?}");
    assert!(repr.contains("[0, 1]"), "shows the realized prefix: {repr}");
    assert_eq!(list.cached_len(), 2);
  }
}
