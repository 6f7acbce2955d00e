use std::{fmt, iter::FusedIterator, mem, rc::Rc};

use log::{debug, trace};

use crate::{cached::CachedSequence, error::SequenceError, materialized::MaterializedSequence};

/// Outcome of a single production step.
pub enum Step<T, S> {
    Yield(T, S),
    Done,
    Fault(String),
}

/// Deferred computation behind a [`LazySequence`].
///
/// `start` builds the resume state of a fresh traversal; `resume` consumes it
/// and hands back the next value together with the state to resume from.
pub trait Producer {
    type Item;
    type State;

    fn start(&self) -> Self::State;

    fn resume(&self, state: Self::State) -> Step<Self::Item, Self::State>;
}

pub struct FnProducer<I, R> {
    start: I,
    resume: R,
}

impl<S, T, I, R> Producer for FnProducer<I, R>
where
    I: Fn() -> S,
    R: Fn(S) -> Step<T, S>,
{
    type Item = T;
    type State = S;

    fn start(&self) -> S {
        (self.start)()
    }

    fn resume(&self, state: S) -> Step<T, S> {
        (self.resume)(state)
    }
}

/// Producer backed by a factory that builds a fresh iterator per traversal.
pub struct IterProducer<F> {
    factory: F,
}

impl<F, It> Producer for IterProducer<F>
where
    F: Fn() -> It,
    It: Iterator,
{
    type Item = It::Item;
    type State = It;

    fn start(&self) -> It {
        (self.factory)()
    }

    fn resume(&self, mut iter: It) -> Step<It::Item, It> {
        match iter.next() {
            Some(elem) => Step::Yield(elem, iter),
            None => Step::Done,
        }
    }
}

pub struct LazySequence<P> {
    producer: Rc<P>,
}

impl<I, R> LazySequence<FnProducer<I, R>> {
    pub fn new<S, T>(start: I, resume: R) -> Self
    where
        I: Fn() -> S,
        R: Fn(S) -> Step<T, S>,
    {
        Self::from_producer(FnProducer { start, resume })
    }
}

impl<F> LazySequence<IterProducer<F>> {
    pub fn from_iter_fn<It>(factory: F) -> Self
    where
        F: Fn() -> It,
        It: Iterator,
    {
        Self::from_producer(IterProducer { factory })
    }
}

impl<P: Producer> LazySequence<P> {
    pub fn from_producer(producer: P) -> Self {
        Self {
            producer: Rc::new(producer),
        }
    }

    /// Starts an independent run. Nothing is produced until the first `next`.
    pub fn traverse(&self) -> Traversal<P> {
        Traversal {
            producer: self.producer.clone(),
            cursor: Cursor::NotStarted,
        }
    }

    pub fn materialize(&self) -> Result<MaterializedSequence<P::Item>, SequenceError> {
        let values = self.traverse().collect::<Result<Vec<_>, _>>()?;
        debug!("materialized {} elements", values.len());
        Ok(MaterializedSequence::from(values))
    }

    /// Runs the producer to completion and throws the values away. A later
    /// traversal pays for every step again.
    pub fn count(&self) -> Result<usize, SequenceError> {
        let count = self
            .traverse()
            .try_fold(0, |count, elem| elem.map(|_| count + 1))?;
        debug!("counted {} elements by full traversal", count);
        Ok(count)
    }

    pub fn cached<'a>(&self) -> CachedSequence<'a, P::Item>
    where
        P: 'a,
        P::Item: Clone,
    {
        CachedSequence::new(Box::new(self.traverse()))
    }
}

impl<P> Clone for LazySequence<P> {
    fn clone(&self) -> Self {
        Self {
            producer: self.producer.clone(),
        }
    }
}

impl<P> fmt::Debug for LazySequence<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LazySequence").finish_non_exhaustive()
    }
}

impl<'a, P: Producer> IntoIterator for &'a LazySequence<P> {
    type Item = Result<P::Item, SequenceError>;
    type IntoIter = Traversal<P>;

    fn into_iter(self) -> Traversal<P> {
        self.traverse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    NotStarted,
    Producing,
    Yielded,
    Exhausted,
    Faulted,
}

enum Cursor<S> {
    NotStarted,
    Producing,
    Suspended(S),
    Exhausted,
    Faulted,
}

pub struct Traversal<P: Producer> {
    producer: Rc<P>,
    cursor: Cursor<P::State>,
}

impl<P: Producer> Traversal<P> {
    pub fn state(&self) -> TraversalState {
        match self.cursor {
            Cursor::NotStarted => TraversalState::NotStarted,
            Cursor::Producing => TraversalState::Producing,
            Cursor::Suspended(_) => TraversalState::Yielded,
            Cursor::Exhausted => TraversalState::Exhausted,
            Cursor::Faulted => TraversalState::Faulted,
        }
    }
}

impl<P: Producer> Iterator for Traversal<P> {
    type Item = Result<P::Item, SequenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = match mem::replace(&mut self.cursor, Cursor::Producing) {
            Cursor::NotStarted => {
                trace!("traversal: NotStarted -> Producing");
                self.producer.start()
            }
            Cursor::Suspended(state) => {
                trace!("traversal: Yielded -> Producing");
                state
            }
            Cursor::Exhausted => {
                self.cursor = Cursor::Exhausted;
                return None;
            }
            Cursor::Faulted => {
                self.cursor = Cursor::Faulted;
                return None;
            }
            // Only reachable when a previous step unwound out of the producer.
            Cursor::Producing => {
                self.cursor = Cursor::Faulted;
                return Some(Err(SequenceError::fault(
                    "traversal resumed after an interrupted step",
                )));
            }
        };
        match self.producer.resume(state) {
            Step::Yield(elem, state) => {
                trace!("traversal: Producing -> Yielded");
                self.cursor = Cursor::Suspended(state);
                Some(Ok(elem))
            }
            Step::Done => {
                trace!("traversal: Producing -> Exhausted");
                self.cursor = Cursor::Exhausted;
                None
            }
            Step::Fault(reason) => {
                debug!("traversal: Producing -> Faulted ({})", reason);
                self.cursor = Cursor::Faulted;
                Some(Err(SequenceError::Fault(reason)))
            }
        }
    }
}

impl<P: Producer> FusedIterator for Traversal<P> {}
