//! # Header Window
//!
//! Capacity-bounded, height-ordered buffer of the most recent block headers.
//!
//! ## Invariant
//!
//! Heights are contiguous: for every adjacent pair `b.height == a.height + 1`,
//! so `last.height - first.height == len - 1` whenever the window is
//! non-empty. A header may only extend the top (`last + 1`) or the bottom
//! (`first - 1`); anything else is a caller bug reported as
//! [`WindowError::InvalidHeight`].

use crate::error::WindowError;
use shared_types::BlockHeader;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct HeaderWindow {
    headers: VecDeque<BlockHeader>,
    capacity: usize,
}

impl HeaderWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            headers: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert a header at whichever end it extends.
    ///
    /// Appending past capacity evicts the lowest header; prepending past
    /// capacity evicts the highest one.
    pub fn add(&mut self, header: BlockHeader) -> Result<&mut Self, WindowError> {
        let bounds = self.first().zip(self.last()).map(|(f, l)| (f.height, l.height));

        match bounds {
            None => self.headers.push_back(header),
            Some((_, last)) if last.checked_add(1) == Some(header.height) => {
                self.headers.push_back(header);
                if self.headers.len() > self.capacity {
                    self.headers.pop_front();
                }
            }
            Some((first, _)) if first.checked_sub(1) == Some(header.height) => {
                self.headers.push_front(header);
                if self.headers.len() > self.capacity {
                    self.headers.pop_back();
                }
            }
            Some((first, last)) => {
                return Err(WindowError::InvalidHeight {
                    height: header.height,
                    first,
                    last,
                });
            }
        }

        Ok(self)
    }

    /// Remove every header above `height` (default: `last.height - 1`).
    ///
    /// A cut below the first height empties the window. Removed headers are
    /// returned in ascending height order.
    pub fn remove_above(&mut self, height: Option<u64>) -> Vec<BlockHeader> {
        let (first, last) = match self.first().zip(self.last()) {
            Some((f, l)) => (f.height, l.height),
            None => return Vec::new(),
        };
        let cut = height.unwrap_or_else(|| last.saturating_sub(1));

        if cut < first {
            return self.clear();
        }
        if cut >= last {
            return Vec::new();
        }

        let keep = (cut - first + 1) as usize;
        self.headers.split_off(keep).into()
    }

    /// Drop all headers, returning them in ascending height order.
    pub fn clear(&mut self) -> Vec<BlockHeader> {
        self.headers.drain(..).collect()
    }

    /// Resize the window. Shrinking drops the lowest heights first.
    pub fn set_capacity(&mut self, capacity: usize) {
        while self.headers.len() > capacity {
            self.headers.pop_front();
        }
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn first(&self) -> Option<&BlockHeader> {
        self.headers.front()
    }

    pub fn last(&self) -> Option<&BlockHeader> {
        self.headers.back()
    }

    /// Header at `height`, if it is inside the window.
    pub fn get(&self, height: u64) -> Option<&BlockHeader> {
        let first = self.first()?.height;
        let offset = height.checked_sub(first)?;
        self.headers.get(usize::try_from(offset).ok()?)
    }

    /// The `n` highest headers, newest first.
    pub fn top(&self, n: usize) -> impl Iterator<Item = &BlockHeader> {
        self.headers.iter().rev().take(n)
    }

    /// All headers in ascending height order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockHeader> {
        self.headers.iter()
    }
}
