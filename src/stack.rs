//! Bounded LIFO stack used by the shunting-yard parser.
//!
//! The stack optionally enforces a maximum depth, supplied by the caller at
//! construction time. A push beyond that depth fails and hands the value
//! back, leaving the stack untouched.
//!
//! An optional destructor callback is invoked on every element still on the
//! stack when it is dropped (or [cleared][Stack::clear]). Elements that leave
//! the stack through [`pop`][Stack::pop] are owned by the caller and are not
//! passed to the callback.

use std::fmt::{Debug, Formatter};

/// Callback invoked on every element discarded by the stack.
pub type Dtor<T> = fn(T);

pub struct Stack<T> {
    items: Vec<T>,
    max_depth: Option<usize>,
    dtor: Option<Dtor<T>>,
}

impl<T> Stack<T> {
    /// Create an unbounded stack.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            max_depth: None,
            dtor: None,
        }
    }

    /// Create a stack holding at most `max_depth` elements.
    pub fn bounded(max_depth: usize) -> Self {
        Self {
            items: Vec::with_capacity(max_depth.min(64)),
            max_depth: Some(max_depth),
            dtor: None,
        }
    }

    /// Set the callback invoked on elements discarded by `clear` or drop.
    pub fn with_dtor(mut self, dtor: Dtor<T>) -> Self {
        self.dtor = Some(dtor);
        self
    }

    /// Maximum depth, if any.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Push a value onto the stack.
    ///
    /// Returns the value back as `Err` if the stack is already at its
    /// maximum depth.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        if let Some(max) = self.max_depth {
            if self.items.len() >= max {
                return Err(value);
            }
        }
        self.items.push(value);
        Ok(())
    }

    /// Remove and return the top value, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Peek at the top value without removing it.
    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    /// Discard all elements, passing each one (top first) to the destructor.
    pub fn clear(&mut self) {
        while let Some(value) = self.items.pop() {
            if let Some(dtor) = self.dtor {
                dtor(value);
            }
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Debug> Debug for Stack<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack")
            .field("items", &self.items)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
