use std::{cell::RefCell, iter::FusedIterator, rc::Rc};

use log::debug;

use crate::error::SequenceError;

type Source<'a, T> = Box<dyn Iterator<Item = Result<T, SequenceError>> + 'a>;

struct Live<'a, T> {
    source: Source<'a, T>,
    fault: Option<SequenceError>,
    complete: bool,
}

/// Lazily grown cache over a single live traversal.
///
/// Every element is produced at most once, on first demand, and then served
/// from the cache to every cursor created by [`CachedSequence::iter`].
pub struct CachedSequence<'a, T> {
    elems: Rc<RefCell<Vec<T>>>,
    live: Rc<RefCell<Live<'a, T>>>,
}

impl<'a, T> Clone for CachedSequence<'a, T> {
    fn clone(&self) -> Self {
        Self {
            elems: self.elems.clone(),
            live: self.live.clone(),
        }
    }
}

impl<'a, T: Clone> CachedSequence<'a, T> {
    pub(crate) fn new(source: Source<'a, T>) -> Self {
        Self {
            elems: Rc::new(RefCell::new(Vec::new())),
            live: Rc::new(RefCell::new(Live {
                source,
                fault: None,
                complete: false,
            })),
        }
    }

    pub fn iter(&self) -> CachedIter<'a, T> {
        CachedIter {
            seq: self.clone(),
            next_idx: 0,
            finished: false,
        }
    }

    /// Number of elements produced so far.
    pub fn cached_len(&self) -> usize {
        self.elems.borrow().len()
    }

    pub fn is_complete(&self) -> bool {
        self.live.try_borrow().map_or(false, |live| live.complete)
    }

    fn get(&self, idx: usize) -> Option<Result<T, SequenceError>> {
        if let Some(elem) = self.elems.borrow().get(idx) {
            return Some(Ok(elem.clone()));
        }
        let mut live = match self.live.try_borrow_mut() {
            Ok(live) => live,
            Err(_) => return Some(Err(SequenceError::Reentrancy)),
        };
        if let Some(fault) = &live.fault {
            return Some(Err(fault.clone()));
        }
        if live.complete {
            return None;
        }
        while self.elems.borrow().len() <= idx {
            match live.source.next() {
                Some(Ok(elem)) => {
                    let mut elems = self.elems.borrow_mut();
                    elems.push(elem);
                    debug!("cache grew to {} elements", elems.len());
                }
                Some(Err(err)) => {
                    live.fault = Some(err.clone());
                    return Some(Err(err));
                }
                None => {
                    live.complete = true;
                    return None;
                }
            }
        }
        Some(Ok(self.elems.borrow()[idx].clone()))
    }
}

pub struct CachedIter<'a, T> {
    seq: CachedSequence<'a, T>,
    next_idx: usize,
    finished: bool,
}

impl<'a, T: Clone> Iterator for CachedIter<'a, T> {
    type Item = Result<T, SequenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.seq.get(self.next_idx) {
            Some(Ok(elem)) => {
                self.next_idx += 1;
                Some(Ok(elem))
            }
            res => {
                self.finished = true;
                res
            }
        }
    }
}

impl<'a, T: Clone> FusedIterator for CachedIter<'a, T> {}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        lazy_sequence::{LazySequence, Producer, Step},
        observer::{EventLog, Observer},
    };

    fn counted(produced: &Rc<Cell<usize>>) -> LazySequence<impl Producer<Item = String>> {
        let produced = produced.clone();
        LazySequence::new(
            || 0usize,
            move |y: usize| {
                if y == 3 {
                    return Step::Done;
                }
                produced.set(produced.get() + 1);
                Step::Yield(format!("X.{}", y), y + 1)
            },
        )
    }

    #[test]
    fn produces_on_demand_and_replays() {
        let produced = Rc::new(Cell::new(0));
        let cache = counted(&produced).cached();
        assert_eq!(produced.get(), 0);

        let head = cache.iter().take(2).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(head, vec!["X.0", "X.1"]);
        assert_eq!(produced.get(), 2);
        assert_eq!(cache.cached_len(), 2);
        assert!(!cache.is_complete());

        for _ in 0..2 {
            let all = cache.iter().collect::<Result<Vec<_>, _>>().unwrap();
            assert_eq!(all, vec!["X.0", "X.1", "X.2"]);
        }
        assert_eq!(produced.get(), 3);
        assert!(cache.is_complete());
    }

    #[test]
    fn interleaved_cursors_share_production() {
        let produced = Rc::new(Cell::new(0));
        let cache = counted(&produced).cached();
        let mut a = cache.iter();
        let mut b = cache.iter();
        assert_eq!(a.next(), Some(Ok("X.0".to_string())));
        assert_eq!(a.next(), Some(Ok("X.1".to_string())));
        assert_eq!(b.next(), Some(Ok("X.0".to_string())));
        assert_eq!(b.next(), Some(Ok("X.1".to_string())));
        assert_eq!(b.next(), Some(Ok("X.2".to_string())));
        assert_eq!(a.next(), Some(Ok("X.2".to_string())));
        assert_eq!(a.next(), None);
        assert_eq!(produced.get(), 3);
    }

    #[test]
    fn fault_is_remembered_past_the_prefix() {
        let seq = LazySequence::new(
            || 0u32,
            |n: u32| match n {
                0 => Step::Yield(n, 1),
                _ => Step::Fault("no more".to_string()),
            },
        );
        let cache = seq.cached();
        let mut first = cache.iter();
        assert_eq!(first.next(), Some(Ok(0)));
        assert_eq!(first.next(), Some(Err(SequenceError::fault("no more"))));
        assert_eq!(first.next(), None);

        let mut second = cache.iter();
        assert_eq!(second.next(), Some(Ok(0)));
        assert_eq!(second.next(), Some(Err(SequenceError::fault("no more"))));

        // The source itself is untouched.
        assert_eq!(seq.traverse().next(), Some(Ok(0)));
    }

    #[test]
    fn reentrant_pull_is_reported() {
        let slot: Rc<RefCell<Option<CachedSequence<'static, u32>>>> = Rc::new(RefCell::new(None));
        let log = EventLog::new();

        let inner = slot.clone();
        let inner_log = log.clone();
        let seq = LazySequence::new(
            || 0u32,
            move |n: u32| {
                if n == 3 {
                    return Step::Done;
                }
                if n == 1 {
                    let cache = inner.borrow().clone();
                    if let Some(cache) = cache {
                        for elem in cache.iter() {
                            match elem {
                                Ok(value) => inner_log.record(&format!("saw {}", value)),
                                Err(err) => inner_log.record(&err.to_string()),
                            }
                        }
                    }
                }
                Step::Yield(n, n + 1)
            },
        );
        let cache = seq.cached();
        *slot.borrow_mut() = Some(cache.clone());

        let all = cache.iter().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(all, vec![0, 1, 2]);
        assert_eq!(
            log.entries(),
            vec![
                "saw 0".to_string(),
                SequenceError::Reentrancy.to_string()
            ]
        );
        slot.borrow_mut().take();
    }
}
