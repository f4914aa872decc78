/*
\file  pqueue.rs
\brief Indexed min-priority queue

Items are dense indices in `[0, maxnodes)`. After inserting an (index, key) pair, the item can
be found, re-keyed and removed through its index in constant time plus a heap walk.
*/

use crate::defs::Gnum;

pub type GnumQueue = IndexedPriorityQueue<Gnum>;

#[derive(Default, Clone, Copy)]
struct Node<K: PartialOrd + Copy + Default> {
    key: K,
    val: usize,
}

/// Priority queue augmented with indices. After inserting a (key, index) pair, it can be quickly
/// accessed and/or removed using the index. The top is the item with the smallest key.
pub struct IndexedPriorityQueue<K: PartialOrd + Copy + Default> {
    nnodes: usize,
    locator: Box<[isize]>,
    heap: Box<[Node<K>]>,
}

impl<K: PartialOrd + Copy + Default> IndexedPriorityQueue<K> {
    pub fn new(maxnodes: usize) -> Self {
        Self {
            nnodes: 0,
            heap: vec![Node::default(); maxnodes].into_boxed_slice(),
            locator: vec![-1; maxnodes].into_boxed_slice(),
        }
    }

    /// clear the queue
    pub fn reset(&mut self) {
        for i in (0..self.nnodes).rev() {
            self.locator[self.heap[i].val] = -1;
        }
        self.nnodes = 0;
    }

    pub fn len(&self) -> usize {
        self.nnodes
    }

    pub fn is_empty(&self) -> bool {
        self.nnodes == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        self.locator[index] != -1
    }

    /// insert an item
    pub fn insert(&mut self, index: usize, key: K) {
        debug_assert!(self.locator[index] == -1);

        let i = self.nnodes;
        self.nnodes += 1;
        self.sift_up(i, Node { key, val: index });

        debug_assert!(self.check_heap());
    }

    /// insert an item, or change its key if it is already queued
    pub fn upsert(&mut self, index: usize, key: K) {
        if self.contains(index) {
            self.update(index, key);
        } else {
            self.insert(index, key);
        }
    }

    /// delete an item
    pub fn delete(&mut self, index: usize) {
        debug_assert!(self.locator[index] != -1);
        debug_assert!(self.heap[self.locator[index] as usize].val == index);

        let i = self.locator[index] as usize;
        self.locator[index] = -1;

        self.nnodes -= 1;
        if self.nnodes > 0 && self.heap[self.nnodes].val != index {
            let last = self.heap[self.nnodes];
            if last.key < self.heap[i].key {
                self.sift_up(i, last);
            } else {
                self.sift_down(i, last);
            }
        }

        debug_assert!(self.check_heap());
    }

    /// remove an item if it is queued
    pub fn remove(&mut self, index: usize) {
        if self.contains(index) {
            self.delete(index);
        }
    }

    /// change the key of a queued item
    pub fn update(&mut self, index: usize, newkey: K) {
        debug_assert!(self.locator[index] != -1);
        let i = self.locator[index] as usize;
        let oldkey = self.heap[i].key;
        if (newkey >= oldkey) && (oldkey >= newkey) {
            return;
        }

        let node = Node { key: newkey, val: index };
        if newkey < oldkey {
            self.sift_up(i, node);
        } else {
            self.sift_down(i, node);
        }

        debug_assert!(self.check_heap());
    }

    /// remove and return the item at the top of the queue
    pub fn get_top(&mut self) -> Option<usize> {
        if self.nnodes == 0 {
            return None;
        }

        self.nnodes -= 1;
        let vtx = self.heap[0].val;
        self.locator[vtx] = -1;

        if self.nnodes > 0 {
            let last = self.heap[self.nnodes];
            self.sift_down(0, last);
        }

        debug_assert!(self.check_heap());
        Some(vtx)
    }

    pub fn see_top_val(&self) -> Option<usize> {
        (self.nnodes > 0).then(|| self.heap[0].val)
    }

    pub fn see_top_key(&self) -> Option<K> {
        (self.nnodes > 0).then(|| self.heap[0].key)
    }

    /// key of a queued item
    pub fn see_key(&self, index: usize) -> K {
        self.heap[self.locator[index] as usize].key
    }

    /* Filter-up from position `i` and store `node` where it stops */
    fn sift_up(&mut self, mut i: usize, node: Node<K>) {
        while i > 0 {
            let j = (i - 1) >> 1;
            if node.key < self.heap[j].key {
                self.heap[i] = self.heap[j];
                self.locator[self.heap[i].val] = i as isize;
                i = j;
            } else {
                break;
            }
        }
        self.heap[i] = node;
        self.locator[node.val] = i as isize;
    }

    /* Filter-down from position `i` and store `node` where it stops */
    fn sift_down(&mut self, mut i: usize, node: Node<K>) {
        let nnodes = self.nnodes;
        loop {
            let mut j = (i << 1) + 1;
            if j >= nnodes {
                break;
            }
            if self.heap[j].key < node.key {
                if j + 1 < nnodes && self.heap[j + 1].key < self.heap[j].key {
                    j += 1;
                }
            } else if j + 1 < nnodes && self.heap[j + 1].key < node.key {
                j += 1;
            } else {
                break;
            }
            self.heap[i] = self.heap[j];
            self.locator[self.heap[i].val] = i as isize;
            i = j;
        }
        self.heap[i] = node;
        self.locator[node.val] = i as isize;
    }

    /// check the consistency of the heap
    pub fn check_heap(&self) -> bool {
        let heap = &self.heap;
        let locator = &self.locator;
        let nnodes = self.nnodes;

        if nnodes == 0 {
            return true;
        }

        assert!(locator[heap[0].val] == 0);
        for i in 1..nnodes {
            assert!(locator[heap[i].val] == i as isize);
            assert!(heap[i].key >= heap[(i - 1) / 2].key);
        }

        let j = locator.iter().filter(|&&l| l != -1).count();
        assert!(j == nnodes, "{} {}", j, nnodes);

        true
    }
}
