use std::{cell::RefCell, rc::Rc};

use log::trace;

/// Write-only sink for values a consumer wants to show. Nothing flows back
/// into production.
pub trait Observer {
    fn record(&self, line: &str);
}

/// Keeps every recorded line in order. Clones share the same log.
#[derive(Clone, Default, Debug)]
pub struct EventLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Observer for EventLog {
    fn record(&self, line: &str) {
        trace!("event log: {}", line);
        self.entries.borrow_mut().push(line.to_string());
    }
}

#[derive(Clone, Copy, Default, Debug)]
pub struct ConsoleSink;

impl Observer for ConsoleSink {
    fn record(&self, line: &str) {
        println!("{}", line);
    }
}
