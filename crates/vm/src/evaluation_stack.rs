//! Evaluation stack module for the Neo Virtual Machine.

use crate::error::{VmError, VmResult};
use crate::stack_item::StackItem;

/// Represents the evaluation stack in the VM. Index 0 of `peek` is the top.
#[derive(Debug, Clone, Default)]
pub struct EvaluationStack {
    stack: Vec<StackItem>,
}

impl EvaluationStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Pushes an item onto the stack.
    #[inline]
    pub fn push(&mut self, item: StackItem) {
        self.stack.push(item);
    }

    /// Pops an item from the stack.
    pub fn pop(&mut self) -> VmResult<StackItem> {
        self.stack.pop().ok_or(VmError::underflow(1, 0))
    }

    /// Returns the `n`-th item from the top without removing it.
    pub fn peek(&self, n: usize) -> VmResult<&StackItem> {
        if n >= self.stack.len() {
            return Err(VmError::underflow(n + 1, self.stack.len()));
        }
        Ok(&self.stack[self.stack.len() - 1 - n])
    }

    /// Pops `n` items; the result is ordered top first.
    pub fn pop_many(&mut self, n: usize) -> VmResult<Vec<StackItem>> {
        self.require(n)?;
        let mut items = self.stack.split_off(self.stack.len() - n);
        items.reverse();
        Ok(items)
    }

    /// Removes the `n`-th item from the top.
    pub fn remove(&mut self, n: usize) -> VmResult<StackItem> {
        self.require(n + 1)?;
        let index = self.stack.len() - 1 - n;
        Ok(self.stack.remove(index))
    }

    /// Inserts an item so that it ends up `n` positions from the top.
    pub fn insert(&mut self, n: usize, item: StackItem) -> VmResult<()> {
        self.require(n)?;
        let index = self.stack.len() - n;
        self.stack.insert(index, item);
        Ok(())
    }

    /// Reverses the order of the top `n` items.
    pub fn reverse(&mut self, n: usize) -> VmResult<()> {
        self.require(n)?;
        if n <= 1 {
            return Ok(());
        }
        let start = self.stack.len() - n;
        self.stack[start..].reverse();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Items from bottom to top.
    pub fn items(&self) -> &[StackItem] {
        &self.stack
    }

    #[inline]
    fn require(&self, n: usize) -> VmResult<()> {
        if n > self.stack.len() {
            Err(VmError::underflow(n, self.stack.len()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(values: &[i64]) -> EvaluationStack {
        let mut stack = EvaluationStack::new();
        for v in values {
            stack.push(StackItem::from(*v));
        }
        stack
    }

    #[test]
    fn reverse_top_items() {
        let mut stack = stack_of(&[1, 2, 3, 4]);
        stack.reverse(3).unwrap();
        assert_eq!(stack.items(), stack_of(&[1, 4, 3, 2]).items());
        assert!(stack.reverse(5).is_err());
    }

    #[test]
    fn pop_many_returns_top_first() {
        let mut stack = stack_of(&[1, 2, 3]);
        let popped = stack.pop_many(2).unwrap();
        assert_eq!(popped, vec![StackItem::from(3i64), StackItem::from(2i64)]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop_many(2), Err(VmError::underflow(2, 1)));
    }

    #[test]
    fn remove_and_insert_by_depth() {
        let mut stack = stack_of(&[1, 2, 3]);
        assert_eq!(stack.remove(1).unwrap(), StackItem::from(2i64));
        stack.insert(2, StackItem::from(9i64)).unwrap();
        assert_eq!(stack.items(), stack_of(&[9, 1, 3]).items());
    }
}
