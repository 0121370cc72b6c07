//! Fixed-size variable slots for arguments and locals.

use crate::error::{VmError, VmResult};
use crate::stack_item::StackItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    kind: &'static str,
    items: Vec<StackItem>,
}

impl Slot {
    /// Creates a slot of `count` `null` items.
    pub fn new(kind: &'static str, count: usize) -> Self {
        Self {
            kind,
            items: vec![StackItem::Null; count],
        }
    }

    /// Creates a slot holding `items` in order.
    pub fn with_items(kind: &'static str, items: Vec<StackItem>) -> Self {
        Self { kind, items }
    }

    pub fn get(&self, index: usize) -> VmResult<&StackItem> {
        self.items.get(index).ok_or(VmError::SlotIndexOutOfRange {
            slot: self.kind,
            index,
            size: self.items.len(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
