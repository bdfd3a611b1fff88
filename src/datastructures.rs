use bitvec::prelude::*;
use core::mem;
use fxhash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::Index;

/// Fixed-size set of small integers, used for the candidate and excluded sets of
/// the clique search where vertices are addressed by their position.
#[derive(Clone, Default, PartialEq)]
pub struct BitSet {
    cardinality: usize,
    bit_vec: BitVec,
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let values: Vec<_> = self.iter().map(|i| i.to_string()).collect();
        write!(
            f,
            "BitSet {{ cardinality: {}, bit_vec: [{}]}}",
            self.cardinality,
            values.join(", "),
        )
    }
}

const fn block_size() -> usize {
    mem::size_of::<usize>() * 8
}

impl BitSet {
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            cardinality: 0,
            bit_vec: bitvec![0; size],
        }
    }

    #[inline]
    pub fn new_all_set(size: usize) -> Self {
        let mut bit_set = Self::new(size);
        for i in 0..size {
            bit_set.set_bit(i);
        }
        bit_set
    }

    #[inline]
    pub fn empty(&self) -> bool {
        self.cardinality == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        self.bit_vec.as_slice()
    }

    /// Returns whether the bit was already set.
    #[inline]
    pub fn set_bit(&mut self, idx: usize) -> bool {
        if !self.bit_vec[idx] {
            self.bit_vec.set(idx, true);
            self.cardinality += 1;
            false
        } else {
            true
        }
    }

    /// Returns whether the bit was set before.
    #[inline]
    pub fn unset_bit(&mut self, idx: usize) -> bool {
        if self.bit_vec[idx] {
            self.bit_vec.set(idx, false);
            self.cardinality -= 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    #[inline]
    pub fn or(&mut self, other: &BitSet) {
        for (x, y) in self
            .bit_vec
            .as_mut_slice()
            .iter_mut()
            .zip(other.as_slice().iter())
        {
            *x |= y;
        }
        self.cardinality = self.bit_vec.count_ones();
    }

    #[inline]
    pub fn and(&mut self, other: &BitSet) {
        for (x, y) in self
            .bit_vec
            .as_mut_slice()
            .iter_mut()
            .zip(other.as_slice().iter())
        {
            *x &= y;
        }
        self.cardinality = self.bit_vec.count_ones();
    }

    #[inline]
    pub fn and_not(&mut self, other: &BitSet) {
        for (x, y) in self
            .bit_vec
            .as_mut_slice()
            .iter_mut()
            .zip(other.as_slice().iter())
        {
            *x &= !y;
        }
        self.cardinality = self.bit_vec.count_ones();
    }

    #[inline]
    pub fn get_next_set(&self, idx: usize) -> Option<usize> {
        if idx >= self.bit_vec.len() {
            return None;
        }
        let mut block_idx = idx / block_size();
        let word_idx = idx % block_size();
        let mut block = self.bit_vec.as_slice()[block_idx];
        let max = self.bit_vec.as_slice().len();
        block &= usize::MAX << word_idx;
        while block == 0usize {
            block_idx += 1;
            if block_idx >= max {
                return None;
            }
            block = self.bit_vec.as_slice()[block_idx];
        }
        let v = block_idx * block_size() + block.trailing_zeros() as usize;
        if v >= self.bit_vec.len() {
            None
        } else {
            Some(v)
        }
    }

    #[inline]
    pub fn iter(&self) -> BitSetIterator {
        BitSetIterator {
            bit_set: self,
            next: 0,
        }
    }
}

pub struct BitSetIterator<'a> {
    bit_set: &'a BitSet,
    next: usize,
}

impl<'a> Iterator for BitSetIterator<'a> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.bit_set.get_next_set(self.next)?;
        self.next = current + 1;
        Some(current)
    }
}

impl Index<usize> for BitSet {
    type Output = bool;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.bit_vec.index(index)
    }
}

/// Addressable binary min-heap. Inserting an element that is already queued
/// updates its priority in place.
pub struct BinaryQueue {
    heap: Vec<usize>,
    values: FxHashMap<usize, i64>,
    indices: FxHashMap<usize, usize>,
}

enum ChildType {
    First,
    Second,
}

impl BinaryQueue {
    pub fn new() -> Self {
        Self {
            heap: Vec::default(),
            values: FxHashMap::default(),
            indices: FxHashMap::default(),
        }
    }

    pub fn contains(&self, element: usize) -> bool {
        self.values.contains_key(&element)
    }

    pub fn insert(&mut self, element: usize, priority: i64) {
        match self.values.entry(element) {
            Entry::Occupied(_) => self.update(element, priority),
            Entry::Vacant(entry) => {
                entry.insert(priority);
                self.indices.insert(element, self.heap.len());
                self.heap.push(element);
                if self.heap.len() > 1 {
                    self.up(self.heap.len() - 1);
                }
            }
        }
    }

    fn update(&mut self, k: usize, v: i64) {
        self.values.insert(k, v);
        if let Some(idx) = self.indices.get(&k).copied() {
            self.up(idx);
        }
        if let Some(idx) = self.indices.get(&k).copied() {
            self.down(idx);
        }
    }

    pub fn pop_min(&mut self) -> Option<(usize, i64)> {
        let last = self.heap.pop()?;
        let k = if self.heap.is_empty() {
            last
        } else {
            let k = self.heap[0];
            self.heap[0] = last;
            self.indices.insert(last, 0);
            k
        };
        self.indices.remove(&k);
        let v = self.values.remove(&k)?;
        if self.heap.len() > 1 {
            self.down(0);
        }
        Some((k, v))
    }

    fn up(&mut self, mut idx: usize) {
        let x = self.heap[idx];
        while let Some(p) = self.parent(idx) {
            if self.values.get(&x) < self.values.get(&self.heap[p]) {
                self.heap[idx] = self.heap[p];
                self.indices.insert(self.heap[p], idx);
                idx = p;
            } else {
                break;
            }
        }
        self.heap[idx] = x;
        self.indices.insert(x, idx);
    }

    fn down(&mut self, idx: usize) {
        let mut current = idx;
        let value = self.heap[current];

        while let Some(mut first) = self.child(current, ChildType::First) {
            if let Some(second) = self.child(current, ChildType::Second) {
                if self.values.get(&self.heap[second]) < self.values.get(&self.heap[first]) {
                    first = second;
                }
            }
            if self.values.get(&self.heap[first]) < self.values.get(&value) {
                self.heap[current] = self.heap[first];
                self.indices.insert(self.heap[current], current);
                current = first
            } else {
                break;
            }
        }
        self.heap[current] = value;
        self.indices.insert(value, current);
    }

    fn parent(&self, idx: usize) -> Option<usize> {
        if idx == 0 {
            None
        } else {
            Some((idx - 1) / 2)
        }
    }

    fn child(&self, idx: usize, child_type: ChildType) -> Option<usize> {
        let off = match child_type {
            ChildType::First => 1,
            ChildType::Second => 2,
        };
        let idx = idx * 2 + off;
        if idx >= self.heap.len() {
            None
        } else {
            Some(idx)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::datastructures::{BinaryQueue, BitSet};

    #[test]
    fn iter() {
        let mut bs = BitSet::new(256);

        let a: Vec<usize> = (0..256).filter(|i| i % 3 == 0).collect();
        for i in &a {
            bs.set_bit(*i);
        }

        let b: Vec<usize> = bs.iter().collect();
        assert_eq!(a, b);
        assert_eq!(bs.cardinality(), a.len());
    }

    #[test]
    fn and_not() {
        let mut p = BitSet::new_all_set(70);
        let mut neighbors = BitSet::new(70);
        neighbors.set_bit(1);
        neighbors.set_bit(65);

        let mut q = p.clone();
        q.and(&neighbors);
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![1, 65]);

        p.and_not(&neighbors);
        assert_eq!(p.cardinality(), 68);
        assert!(!p[1]);
        assert!(!p[65]);
        assert!(p[64]);
    }

    #[test]
    fn pq_pop_min() {
        let mut pq = BinaryQueue::new();

        pq.insert(0, 10);
        pq.insert(16, 1);
        pq.insert(1, 15);

        assert_eq!(pq.pop_min(), Some((16, 1)));
        assert_eq!(pq.pop_min(), Some((0, 10)));
        assert_eq!(pq.pop_min(), Some((1, 15)));
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn pq_update() {
        let mut pq = BinaryQueue::new();

        pq.insert(0, 10);
        pq.insert(16, 1);
        pq.insert(1, 15);
        pq.insert(16, 11);

        assert_eq!(pq.pop_min(), Some((0, 10)));
        assert_eq!(pq.pop_min(), Some((16, 11)));
        assert_eq!(pq.pop_min(), Some((1, 15)));
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn pq_reinsert_after_pop() {
        let mut pq = BinaryQueue::new();

        pq.insert(3, 2);
        pq.insert(4, 5);
        assert_eq!(pq.pop_min(), Some((3, 2)));
        assert!(!pq.contains(3));

        pq.insert(3, 7);
        pq.insert(4, 1);
        assert!(pq.contains(3));
        assert_eq!(pq.pop_min(), Some((4, 1)));
        assert_eq!(pq.pop_min(), Some((3, 7)));
    }
}
