//! Vector: contiguous owned sequence with a load-factor driven capacity.
//!
//! The logical `capacity` follows `VectorConfig`: a push that would take the
//! load factor above `max_load_factor` multiplies it by `growth_factor`, and a
//! removal that would take it below `min_load_factor` divides it. Both checks
//! look one element ahead, before the length changes. The backing buffer is
//! reserved fallibly, so running out of memory surfaces as `Error::Alloc`
//! with the vector unchanged.

use crate::config::VectorConfig;
use crate::error::{Error, Result};
use tracing::trace;

#[derive(Clone, Debug)]
pub struct Vector<T> {
    data: Vec<T>,
    capacity: usize,
    config: VectorConfig,
}

impl<T> Vector<T> {
    pub fn new() -> Self {
        Self::from_valid_config(VectorConfig::DEFAULT)
    }

    pub fn with_config(config: VectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// The backing buffer is reserved lazily on the first push.
    pub(crate) fn from_valid_config(config: VectorConfig) -> Self {
        Self {
            data: Vec::new(),
            capacity: config.initial_capacity,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn config(&self) -> &VectorConfig {
        &self.config
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity as f64
    }

    pub fn at(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// Lowest index whose element satisfies `pred`.
    pub fn find_by<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.data.iter().position(pred)
    }

    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.find_by(|e| e == value)
    }

    pub fn push_back(&mut self, value: T) -> Result<()> {
        let target = self.config.grown_capacity(self.len(), self.capacity);
        self.data.try_reserve_exact(target - self.len())?;
        if target != self.capacity {
            trace!(from = self.capacity, to = target, len = self.len(), "vector grow");
            self.capacity = target;
        }
        self.data.push(value);
        Ok(())
    }

    /// Push a copy of `value`; the caller keeps the original.
    pub fn push_back_cloned(&mut self, value: &T) -> Result<()>
    where
        T: Clone,
    {
        self.push_back(value.clone())
    }

    /// Remove the element at `index`, shifting later elements left.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        let target = self.config.shrunk_capacity(len, self.capacity);
        if target != self.capacity {
            trace!(from = self.capacity, to = target, len, "vector shrink");
            self.capacity = target;
        }
        let removed = self.data.remove(index);
        self.data.shrink_to(self.capacity);
        Ok(removed)
    }

    /// Drop every element front to back. The capacity ends where erasing
    /// index 0 until empty would have left it.
    pub fn clear(&mut self) {
        let mut cap = self.capacity;
        for len in (1..=self.len()).rev() {
            cap = self.config.shrunk_capacity(len, cap);
        }
        self.data.clear();
        if cap != self.capacity {
            trace!(from = self.capacity, to = cap, "vector clear");
            self.capacity = cap;
        }
        self.data.shrink_to(cap);
    }

    /// Grow (by the usual policy) until `additional` more elements fit
    /// without another grow, and reserve the backing buffer for them.
    pub(crate) fn reserve_for(&mut self, additional: usize) -> Result<()> {
        let want = self.len() + additional;
        let target = if want == 0 {
            self.capacity
        } else {
            self.config.grown_capacity(want - 1, self.capacity)
        };
        self.data.try_reserve_exact(target - self.len())?;
        self.capacity = target;
        Ok(())
    }

    /// Push into space secured by `reserve_for`; never reallocates.
    pub(crate) fn push_reserved(&mut self, value: T) {
        debug_assert_eq!(
            self.config.grown_capacity(self.len(), self.capacity),
            self.capacity,
            "push_reserved past the reserved capacity"
        );
        debug_assert!(self.data.len() < self.data.capacity());
        self.data.push(value);
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for Vector<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
