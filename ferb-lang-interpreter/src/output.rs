use std::cell::RefCell;
use std::rc::Rc;

use crate::object::Value;

/// Destination of `rintperb`.
pub trait Output {
    fn print(&mut self, value: &Value);
}

pub struct Stdout;

impl Output for Stdout {
    fn print(&mut self, value: &Value) {
        println!("{}", value);
    }
}

/// Collects printed lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Rc<RefCell<Vec<String>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Output for Transcript {
    fn print(&mut self, value: &Value) {
        self.lines.borrow_mut().push(value.to_string());
    }
}
