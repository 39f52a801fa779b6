//! ChainedHashMap: separate chaining over `Vector` buckets.
//!
//! A table of `capacity` slots (always a power of two), each either empty or
//! owning a `Vector` of entries whose stored hash maps to that slot via
//! `hash & (capacity - 1)`. Entries remember the hash computed at insertion,
//! so a rehash only moves entries and never calls back into `K: Hash`.

use crate::config::TableConfig;
use crate::error::{Error, Result};
use crate::pair::Pair;
use crate::vector::Vector;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use tracing::debug;

#[derive(Clone, Debug)]
struct Entry<K, V> {
    pair: Pair<K, V>,
    hash: u64,
}

type Bucket<K, V> = Vector<Entry<K, V>>;

#[derive(Clone)]
pub struct ChainedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Vec<Option<Bucket<K, V>>>,
    len: usize,
    config: TableConfig,
}

#[inline]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash as usize) & (capacity - 1)
}

fn empty_slots<K, V>(capacity: usize) -> Result<Vec<Option<Bucket<K, V>>>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, Default::default())
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Drop every entry and return to the initial capacity.
    pub fn clear(&mut self) {
        let initial = self.config.initial_capacity;
        self.buckets.clear();
        self.buckets.resize_with(initial, || None);
        self.buckets.shrink_to(initial);
        self.len = 0;
    }

    /// Mutate in place every value whose key satisfies `pred`, in bucket
    /// order. Returns how many values were passed to `mutate`.
    pub fn apply_if<P, F>(&mut self, mut pred: P, mut mutate: F) -> usize
    where
        P: FnMut(&K) -> bool,
        F: FnMut(&mut V),
    {
        let mut count = 0;
        for entry in self.buckets.iter_mut().flatten().flat_map(Vector::iter_mut) {
            let (key, value) = entry.pair.split_mut();
            if pred(key) {
                mutate(value);
                count += 1;
            }
        }
        count
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: Default::default(),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            buckets: self.buckets.iter_mut(),
            current: Default::default(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.iter_mut().map(|(_, v)| v)
    }

    /// Sizes of the occupied buckets, in slot order.
    pub fn bucket_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().flatten().map(Vector::len)
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        let config = TableConfig::DEFAULT;
        Self {
            hasher,
            buckets: (0..config.initial_capacity).map(|_| None).collect(),
            len: 0,
            config,
        }
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            hasher,
            buckets: empty_slots(config.initial_capacity)?,
            len: 0,
            config,
        })
    }

    /// Build a table from `(key, value)` pairs; fails on the first duplicate.
    pub fn try_from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        S: Default,
    {
        let mut map = Self::with_hasher(S::default());
        for (k, v) in iter {
            map.insert(k, v)?;
        }
        Ok(map)
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// (slot, position in bucket) of the entry for `q`.
    fn locate<Q>(&self, hash: u64, q: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let slot = bucket_index(hash, self.capacity());
        let bucket = self.buckets[slot].as_ref()?;
        let pos = bucket.find_by(|e| e.hash == hash && e.pair.key().borrow() == q)?;
        Some((slot, pos))
    }

    fn entry<Q>(&self, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (slot, pos) = self.locate(self.make_hash(q), q)?;
        self.buckets[slot].as_ref()?.at(pos)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entry(q).is_some()
    }

    /// The stored value for `q`, by reference.
    pub fn at<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entry(q).map(|e| e.pair.value())
    }

    pub fn at_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (slot, pos) = self.locate(self.make_hash(q), q)?;
        self.buckets[slot]
            .as_mut()?
            .at_mut(pos)
            .map(|e| e.pair.value_mut())
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entry(q).map(|e| (e.pair.key(), e.pair.value()))
    }

    /// Insert a new entry. An existing equal key is an error, never an
    /// overwrite. May grow the table first; on any failure the entry is not
    /// stored and `len` is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let hash = self.make_hash(&key);
        if self.locate(hash, &key).is_some() {
            return Err(Error::DuplicateKey);
        }
        let target = self
            .config
            .grown_capacity(self.len, self.capacity())
            .ok_or(Error::CapacityOverflow)?;
        if target != self.capacity() {
            self.rehash(target)?;
        }

        let bucket_config = self.config.bucket;
        let index = bucket_index(hash, self.capacity());
        let slot = &mut self.buckets[index];
        let created = slot.is_none();
        let bucket = slot.get_or_insert_with(|| Vector::from_valid_config(bucket_config));
        let entry = Entry {
            pair: Pair::new(key, value),
            hash,
        };
        if let Err(e) = bucket.push_back(entry) {
            if created {
                *slot = None;
            }
            return Err(e);
        }
        self.len += 1;
        Ok(())
    }

    /// Insert a copy of `pair`; the caller keeps the original.
    pub fn insert_pair(&mut self, pair: &Pair<K, V>) -> Result<()>
    where
        K: Clone,
        V: Clone,
    {
        let (key, value) = pair.clone().into_parts();
        self.insert(key, value)
    }

    /// Remove the entry for `q` and hand back its key and value. May shrink
    /// the table first; a failed shrink leaves the entry in place.
    pub fn erase<Q>(&mut self, q: &Q) -> Result<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        if self.locate(hash, q).is_none() {
            return Err(Error::NotFound);
        }
        if self.config.should_shrink(self.len, self.capacity()) {
            let target =
                (self.capacity() / self.config.growth_factor).max(self.config.min_capacity);
            self.rehash(target)?;
        }

        let (slot, pos) = self.locate(hash, q).ok_or(Error::NotFound)?;
        let bucket = self.buckets[slot].as_mut().ok_or(Error::NotFound)?;
        let entry = bucket.erase(pos)?;
        if bucket.is_empty() {
            self.buckets[slot] = None;
        }
        self.len -= 1;
        Ok(entry.pair.into_parts())
    }

    /// Redistribute every entry into `new_capacity` fresh buckets.
    ///
    /// All allocation happens before the first entry moves: the destination
    /// buckets are sized from a count of stored hashes. If any allocation
    /// fails the partially built table is dropped and `self` is untouched.
    fn rehash(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity.is_power_of_two());
        let mut slots = empty_slots::<K, V>(new_capacity)?;

        let mut counts: Vec<usize> = Vec::new();
        counts.try_reserve_exact(new_capacity)?;
        counts.resize(new_capacity, 0);
        for entry in self.buckets.iter().flatten().flat_map(Vector::iter) {
            counts[bucket_index(entry.hash, new_capacity)] += 1;
        }
        for (slot, &n) in slots.iter_mut().zip(&counts) {
            if n > 0 {
                let mut bucket = Vector::from_valid_config(self.config.bucket);
                bucket.reserve_for(n)?;
                *slot = Some(bucket);
            }
        }

        // Infallible from here on.
        let from = self.capacity();
        let old = core::mem::replace(&mut self.buckets, slots);
        for entry in old.into_iter().flatten().flatten() {
            let slot = &mut self.buckets[bucket_index(entry.hash, new_capacity)];
            debug_assert!(slot.is_some(), "destination bucket not reserved");
            if let Some(bucket) = slot {
                bucket.push_reserved(entry);
            }
        }
        debug!(from, to = new_capacity, len = self.len, "rehash");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(self.capacity().is_power_of_two());
        let mut total = 0;
        for (slot, bucket) in self.buckets.iter().enumerate() {
            if let Some(bucket) = bucket {
                assert!(!bucket.is_empty(), "empty bucket left in slot {}", slot);
                for e in bucket {
                    assert_eq!(bucket_index(e.hash, self.capacity()), slot);
                    assert_eq!(e.hash, self.make_hash(e.pair.key()));
                }
                total += bucket.len();
            }
        }
        assert_eq!(total, self.len);
    }
}

impl<K, V, S> core::fmt::Debug for ChainedHashMap<K, V, S>
where
    K: core::fmt::Debug,
    V: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(&K, &V)` in bucket order.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Option<Bucket<K, V>>>,
    current: core::slice::Iter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.next() {
                self.remaining -= 1;
                return Some((e.pair.key(), e.pair.value()));
            }
            if let Some(bucket) = self.buckets.next()? {
                self.current = bucket.iter();
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)` in bucket order.
pub struct IterMut<'a, K, V> {
    buckets: core::slice::IterMut<'a, Option<Bucket<K, V>>>,
    current: core::slice::IterMut<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.next() {
                self.remaining -= 1;
                let (k, v) = e.pair.split_mut();
                return Some((k, v));
            }
            if let Some(bucket) = self.buckets.next()? {
                self.current = bucket.iter_mut();
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
