//! Growth and shrink policy for `Vector` and `ChainedHashMap`.
//!
//! Both containers decide on a capacity change by looking one element ahead:
//! before a push the load factor is computed as `(len + 1) / capacity`, before
//! a removal as `(len - 1) / capacity`. Crossing `max_load_factor` multiplies
//! the capacity by `growth_factor`; crossing `min_load_factor` divides it.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capacity policy for a `Vector`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VectorConfig {
    pub initial_capacity: usize,
    pub growth_factor: usize,
    pub min_load_factor: f64,
    pub max_load_factor: f64,
}

impl VectorConfig {
    pub const DEFAULT: Self = Self {
        initial_capacity: 2,
        growth_factor: 2,
        min_load_factor: 0.25,
        max_load_factor: 0.75,
    };

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor;
        self
    }

    pub fn with_load_factors(mut self, min: f64, max: f64) -> Self {
        self.min_load_factor = min;
        self.max_load_factor = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidConfig("vector initial_capacity must be at least 1"));
        }
        if self.growth_factor < 2 {
            return Err(Error::InvalidConfig("vector growth_factor must be at least 2"));
        }
        if self.max_load_factor > 1.0 {
            return Err(Error::InvalidConfig("vector max_load_factor must not exceed 1"));
        }
        validate_load_factors(self.min_load_factor, self.max_load_factor, self.growth_factor)
    }

    /// Capacity after a push that brings the length to `len + 1`.
    pub(crate) fn grown_capacity(&self, len: usize, capacity: usize) -> usize {
        let mut cap = capacity;
        while cap < usize::MAX && exceeds(len + 1, cap, self.max_load_factor) {
            cap = cap.saturating_mul(self.growth_factor);
        }
        cap
    }

    /// Capacity after a removal that brings the length to `len - 1`.
    pub(crate) fn shrunk_capacity(&self, len: usize, capacity: usize) -> usize {
        if len > 0 && below(len - 1, capacity, self.min_load_factor) {
            (capacity / self.growth_factor).max(1)
        } else {
            capacity
        }
    }
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Capacity policy for a `ChainedHashMap` and the buckets it creates.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    /// Number of buckets a fresh (or cleared) table starts with. Power of two.
    pub initial_capacity: usize,
    /// Shrinking never goes below this many buckets. Power of two.
    pub min_capacity: usize,
    /// Power of two, so that capacities stay powers of two.
    pub growth_factor: usize,
    pub min_load_factor: f64,
    pub max_load_factor: f64,
    /// Policy for every bucket vector.
    pub bucket: VectorConfig,
}

impl TableConfig {
    pub const DEFAULT: Self = Self {
        initial_capacity: 16,
        min_capacity: 1,
        growth_factor: 2,
        min_load_factor: 0.25,
        max_load_factor: 0.75,
        bucket: VectorConfig::DEFAULT,
    };

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_min_capacity(mut self, capacity: usize) -> Self {
        self.min_capacity = capacity;
        self
    }

    pub fn with_growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor;
        self
    }

    pub fn with_load_factors(mut self, min: f64, max: f64) -> Self {
        self.min_load_factor = min;
        self.max_load_factor = max;
        self
    }

    pub fn with_bucket_config(mut self, bucket: VectorConfig) -> Self {
        self.bucket = bucket;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.initial_capacity.is_power_of_two() {
            return Err(Error::InvalidConfig("table initial_capacity must be a power of two"));
        }
        if !self.min_capacity.is_power_of_two() {
            return Err(Error::InvalidConfig("table min_capacity must be a power of two"));
        }
        if self.min_capacity > self.initial_capacity {
            return Err(Error::InvalidConfig(
                "table min_capacity must not exceed initial_capacity",
            ));
        }
        if self.growth_factor < 2 || !self.growth_factor.is_power_of_two() {
            return Err(Error::InvalidConfig(
                "table growth_factor must be a power of two and at least 2",
            ));
        }
        validate_load_factors(self.min_load_factor, self.max_load_factor, self.growth_factor)?;
        self.bucket.validate()
    }

    /// Bucket count needed before the table holds `len + 1` entries, or
    /// `None` if that count does not fit in a `usize`.
    pub(crate) fn grown_capacity(&self, len: usize, capacity: usize) -> Option<usize> {
        let mut cap = capacity;
        while exceeds(len + 1, cap, self.max_load_factor) {
            cap = cap.checked_mul(self.growth_factor)?;
        }
        Some(cap)
    }

    pub(crate) fn should_shrink(&self, len: usize, capacity: usize) -> bool {
        len > 0 && capacity > self.min_capacity && below(len - 1, capacity, self.min_load_factor)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn validate_load_factors(min: f64, max: f64, growth_factor: usize) -> Result<()> {
    if !(max > 0.0 && max.is_finite()) {
        return Err(Error::InvalidConfig("max_load_factor must be positive and finite"));
    }
    if !(min >= 0.0 && min < max) {
        return Err(Error::InvalidConfig(
            "min_load_factor must be non-negative and below max_load_factor",
        ));
    }
    if min * growth_factor as f64 >= max {
        return Err(Error::InvalidConfig(
            "min_load_factor * growth_factor must stay below max_load_factor",
        ));
    }
    Ok(())
}

#[inline]
fn exceeds(len: usize, capacity: usize, max: f64) -> bool {
    len as f64 / capacity as f64 > max
}

#[inline]
fn below(len: usize, capacity: usize, min: f64) -> bool {
    (len as f64 / capacity as f64) < min
}
