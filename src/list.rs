//! Singly-linked sequence used as the primary task store.
//!
//! Nodes live in an arena and link to each other by slot index, so the
//! list keeps a tail link for O(1) appends without any unsafe code.
//! Slots freed by `remove` are recycled by later inserts.

use crate::store::StoreError;
use std::fmt;

#[derive(Clone)]
struct Node<T> {
    value: T,
    next: Option<usize>,
}

/// Ordered, position-addressable singly-linked list.
#[derive(Clone)]
pub struct SeqList<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> SeqList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append to the end of the list.
    pub fn push(&mut self, value: T) {
        let slot = self.alloc(value, None);
        match self.tail {
            Some(tail) => {
                if let Some(node) = self.nodes[tail].as_mut() {
                    node.next = Some(slot);
                }
            }
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
    }

    /// Insert so that the value ends up at `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), StoreError> {
        if index > self.len {
            return Err(self.out_of_range(index));
        }
        if index == self.len {
            self.push(value);
            return Ok(());
        }

        if index == 0 {
            let slot = self.alloc(value, self.head);
            self.head = Some(slot);
        } else {
            let prev = self.slot_at(index - 1).ok_or_else(|| self.out_of_range(index))?;
            let next = self.next_of(prev);
            let slot = self.alloc(value, next);
            if let Some(node) = self.nodes[prev].as_mut() {
                node.next = Some(slot);
            }
        }
        self.len += 1;
        Ok(())
    }

    /// Borrow the element at `index`.
    pub fn get(&self, index: usize) -> Result<&T, StoreError> {
        if index >= self.len {
            return Err(self.out_of_range(index));
        }
        self.slot_at(index)
            .and_then(|slot| self.nodes[slot].as_ref())
            .map(|node| &node.value)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Unlink and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T, StoreError> {
        if index >= self.len {
            return Err(self.out_of_range(index));
        }

        let (prev, target) = if index == 0 {
            (None, self.head)
        } else {
            let prev = self.slot_at(index - 1);
            (prev, prev.and_then(|p| self.next_of(p)))
        };
        let target = target.ok_or_else(|| self.out_of_range(index))?;
        let node = self.nodes[target].take().ok_or_else(|| self.out_of_range(index))?;

        match prev {
            Some(p) => {
                if let Some(prev_node) = self.nodes[p].as_mut() {
                    prev_node.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        if self.tail == Some(target) {
            self.tail = prev;
        }

        self.free.push(target);
        self.len -= 1;
        Ok(node.value)
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Index of the first element matching `pred`.
    pub fn position<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(pred)
    }

    /// Index of the last element matching `pred`.
    pub fn rposition<P>(&self, mut pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter()
            .enumerate()
            .filter(|(_, value)| pred(value))
            .map(|(i, _)| i)
            .last()
    }

    fn alloc(&mut self, value: T, next: Option<usize>) -> usize {
        let node = Node { value, next };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn next_of(&self, slot: usize) -> Option<usize> {
        self.nodes.get(slot).and_then(Option::as_ref).and_then(|node| node.next)
    }

    fn slot_at(&self, index: usize) -> Option<usize> {
        let mut cursor = self.head;
        for _ in 0..index {
            cursor = cursor.and_then(|slot| self.next_of(slot));
        }
        cursor
    }

    fn out_of_range(&self, index: usize) -> StoreError {
        StoreError::OutOfRange { index, len: self.len }
    }
}

impl<T> Default for SeqList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SeqList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for SeqList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> FromIterator<T> for SeqList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for SeqList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

/// Borrowing iterator over a [`SeqList`].
pub struct Iter<'a, T> {
    list: &'a SeqList<T>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.list.nodes.get(slot)?.as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> IntoIterator for &'a SeqList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(list: &SeqList<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_push_and_get() {
        let mut list = SeqList::new();
        list.push(10);
        list.push(20);
        list.push(30);

        assert_eq!(list.len(), 3);
        assert_eq!(*list.get(0).unwrap(), 10);
        assert_eq!(*list.get(2).unwrap(), 30);
    }

    #[test]
    fn test_get_out_of_range() {
        let list: SeqList<i32> = [1, 2].into_iter().collect();
        let err = list.get(2).unwrap_err();
        assert!(matches!(err, StoreError::OutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_remove_head_middle_tail() {
        let mut list: SeqList<i32> = (1..=5).collect();

        assert_eq!(list.remove(0).unwrap(), 1);
        assert_eq!(collect(&list), vec![2, 3, 4, 5]);

        assert_eq!(list.remove(1).unwrap(), 3);
        assert_eq!(collect(&list), vec![2, 4, 5]);

        assert_eq!(list.remove(2).unwrap(), 5);
        assert_eq!(collect(&list), vec![2, 4]);

        // Tail must be relinked so appends still land at the end
        list.push(6);
        assert_eq!(collect(&list), vec![2, 4, 6]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut list: SeqList<i32> = SeqList::new();
        assert!(list.remove(0).is_err());
    }

    #[test]
    fn test_remove_last_remaining_element() {
        let mut list: SeqList<i32> = [7].into_iter().collect();
        assert_eq!(list.remove(0).unwrap(), 7);
        assert!(list.is_empty());

        list.push(8);
        assert_eq!(collect(&list), vec![8]);
    }

    #[test]
    fn test_insert_positions() {
        let mut list: SeqList<i32> = [2, 4].into_iter().collect();

        list.insert(0, 1).unwrap();
        list.insert(2, 3).unwrap();
        list.insert(4, 5).unwrap();

        assert_eq!(collect(&list), vec![1, 2, 3, 4, 5]);
        assert!(list.insert(7, 9).is_err());
    }

    #[test]
    fn test_slots_are_recycled() {
        let mut list: SeqList<i32> = (0..4).collect();
        list.remove(1).unwrap();
        list.remove(1).unwrap();
        list.push(10);
        list.push(11);

        assert_eq!(collect(&list), vec![0, 3, 10, 11]);
        assert_eq!(list.nodes.len(), 4);
    }

    #[test]
    fn test_position_and_rposition() {
        let list: SeqList<i32> = [1, 2, 1, 3].into_iter().collect();
        assert_eq!(list.position(|v| *v == 1), Some(0));
        assert_eq!(list.rposition(|v| *v == 1), Some(2));
        assert_eq!(list.position(|v| *v == 9), None);
    }

    #[test]
    fn test_clear() {
        let mut list: SeqList<i32> = (0..3).collect();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
    }
}
