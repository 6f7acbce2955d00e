//! Side-by-side scenarios contrasting eager collections with lazy sequences.
//!
//! Each scenario writes what a consumer sees to an [`Observer`]. Where it
//! matters, a value is followed by the number of production steps that had
//! run at the moment it was observed.

use std::{cell::Cell, rc::Rc, thread, time::Duration};

use itertools::Itertools;
use log::info;

use crate::{
    config::{Config, ALL},
    error::{ConfigError, Error, SequenceError},
    lazy_sequence::{LazySequence, Producer, Step},
    observer::Observer,
};

type Demo = fn(&dyn Observer, &Config) -> Result<(), SequenceError>;

const DEMOS: &[(&str, Demo)] = &[
    ("the_basics", the_basics),
    ("concrete_types", concrete_types),
    ("fun_with_generators", fun_with_generators),
    ("wonders_of_materialize", wonders_of_materialize),
    ("lazy_early_exit", lazy_early_exit),
    ("materialized_early_exit", materialized_early_exit),
    ("count_then_traverse", count_then_traverse),
    ("materialize_then_count", materialize_then_count),
    ("cached_replay", cached_replay),
];

const STEPS: usize = 3;

static LIST_VALUES: [&str; 3] = ["List.A", "List.B", "List.C"];
static LAZY_VALUES: [&str; 3] = ["Lazy.A", "Lazy.B", "Lazy.C"];

pub fn names() -> impl Iterator<Item = &'static str> {
    DEMOS.iter().map(|(name, _)| *name)
}

pub fn run(name: &str, observer: &dyn Observer, config: &Config) -> Result<(), Error> {
    if name == ALL {
        for (name, demo) in DEMOS {
            announce(name, observer);
            demo(observer, config)?;
        }
        return Ok(());
    }
    let (name, demo) = DEMOS
        .iter()
        .find(|(known, _)| *known == name)
        .ok_or_else(|| ConfigError::UnknownDemo {
            name: name.to_string(),
            known: names().join(", "),
        })?;
    announce(name, observer);
    demo(observer, config)?;
    Ok(())
}

fn announce(name: &str, observer: &dyn Observer) {
    info!("running demo {}", name);
    observer.record(&format!("== {} ==", name));
}

/// Yields "<prefix>.0" .. "<prefix>.2", bumping `produced` on every step.
/// Numbering restarts with each traversal; repeated work shows in `produced`.
fn generate(
    prefix: &'static str,
    produced: &Rc<Cell<usize>>,
    delay: Duration,
) -> LazySequence<impl Producer<Item = String>> {
    let produced = produced.clone();
    LazySequence::new(
        || 0usize,
        move |y: usize| {
            if y == STEPS {
                return Step::Done;
            }
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            produced.set(produced.get() + 1);
            Step::Yield(format!("{}.{}", prefix, y), y + 1)
        },
    )
}

fn show(observer: &dyn Observer, value: &str, produced: &Cell<usize>) {
    observer.record(value);
    observer.record(&produced.get().to_string());
}

/// A list and a lazy sequence look the same to a `for` loop.
pub fn the_basics(observer: &dyn Observer, _config: &Config) -> Result<(), SequenceError> {
    let list = LIST_VALUES.to_vec();
    let lazy = LazySequence::from_iter_fn(|| LAZY_VALUES.iter().copied());

    for value in &list {
        observer.record(value);
    }
    for value in &lazy {
        observer.record(value?);
    }
    Ok(())
}

/// Lists iterate first in, first out; stacks last in, first out.
pub fn concrete_types(observer: &dyn Observer, _config: &Config) -> Result<(), SequenceError> {
    let list = vec!["List.A", "List.B", "List.C"];
    let mut stack = Vec::new();
    stack.push("Stack.A");
    stack.push("Stack.B");
    stack.push("Stack.C");

    for value in &list {
        observer.record(value);
    }
    for value in stack.iter().rev() {
        observer.record(value);
    }
    Ok(())
}

pub fn fun_with_generators(observer: &dyn Observer, config: &Config) -> Result<(), SequenceError> {
    let list_steps = Cell::new(0);
    let list = (0..STEPS)
        .map(|x| {
            list_steps.set(list_steps.get() + 1);
            format!("List.{}", x)
        })
        .collect::<Vec<_>>();

    let lazy_steps = Rc::new(Cell::new(0));
    let lazy = generate("Lazy", &lazy_steps, config.delay);

    for value in &list {
        show(observer, value, &list_steps);
    }
    for value in &lazy {
        show(observer, &value?, &lazy_steps);
    }
    Ok(())
}

pub fn wonders_of_materialize(
    observer: &dyn Observer,
    config: &Config,
) -> Result<(), SequenceError> {
    let produced = Rc::new(Cell::new(0));
    let snapshot = generate("Lazy", &produced, config.delay).materialize()?;

    for value in &snapshot {
        show(observer, value, &produced);
    }
    Ok(())
}

/// Stopping early means the remaining steps never run.
pub fn lazy_early_exit(observer: &dyn Observer, config: &Config) -> Result<(), SequenceError> {
    let produced = Rc::new(Cell::new(0));
    let lazy = generate("Lazy", &produced, config.delay);

    for value in &lazy {
        let value = value?;
        show(observer, &value, &produced);
        if value.contains('0') {
            return Ok(());
        }
    }
    Ok(())
}

/// Same exit, but materializing already paid for every step.
pub fn materialized_early_exit(
    observer: &dyn Observer,
    config: &Config,
) -> Result<(), SequenceError> {
    let produced = Rc::new(Cell::new(0));
    let snapshot = generate("Lazy", &produced, config.delay).materialize()?;

    for value in &snapshot {
        show(observer, value, &produced);
        if value.contains('0') {
            return Ok(());
        }
    }
    Ok(())
}

/// Counting a lazy sequence runs it, and the following loop runs it again.
pub fn count_then_traverse(observer: &dyn Observer, config: &Config) -> Result<(), SequenceError> {
    let produced = Rc::new(Cell::new(0));
    let lazy = generate("Lazy", &produced, config.delay);

    observer.record(&format!("count: {}", lazy.count()?));
    for value in &lazy {
        observer.record(&value?);
    }
    observer.record(&format!("productions: {}", produced.get()));
    Ok(())
}

pub fn materialize_then_count(
    observer: &dyn Observer,
    config: &Config,
) -> Result<(), SequenceError> {
    let produced = Rc::new(Cell::new(0));
    let snapshot = generate("Lazy", &produced, config.delay).materialize()?;

    observer.record(&format!("count: {}", snapshot.count()));
    for value in &snapshot {
        observer.record(value);
    }
    observer.record(&format!("productions: {}", produced.get()));
    Ok(())
}

/// A partial pass fills the cache; the full pass only produces what is missing.
pub fn cached_replay(observer: &dyn Observer, config: &Config) -> Result<(), SequenceError> {
    let produced = Rc::new(Cell::new(0));
    let cache = generate("Lazy", &produced, config.delay).cached();

    for value in cache.iter().take(2) {
        show(observer, &value?, &produced);
    }
    for value in cache.iter() {
        show(observer, &value?, &produced);
    }
    observer.record(&format!("productions: {}", produced.get()));
    Ok(())
}
