use dashmap::DashMap;
use std::hash::Hash;
use tracing::instrument;

/// Memoization store. Entries are never evicted: a key always maps to the
/// first value computed for it for the lifetime of the store.
pub trait Cache<K, V> {
	fn get(&self, key: &K) -> Option<V>;

	fn insert(&self, key: K, value: V);

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the cached value for `key`, computing and storing it on a miss.
	/// Errors from `f` are returned as is and leave the store untouched.
	#[inline]
	fn get_or_try_insert_with<E, F>(&self, key: &K, f: F) -> Result<V, E>
	where
		K: Clone,
		V: Clone,
		F: FnOnce() -> Result<V, E>,
	{
		if let Some(value) = self.get(key) {
			return Ok(value);
		}

		let value = f()?;
		self.insert(key.clone(), value.clone());
		Ok(value)
	}

	#[inline]
	fn get_or_insert_with<F>(&self, key: &K, f: F) -> V
	where
		K: Clone,
		V: Clone,
		F: FnOnce() -> V,
	{
		match self.get_or_try_insert_with::<std::convert::Infallible, _>(key, || Ok(f())) {
			Ok(value) => value,
			Err(never) => match never {},
		}
	}
}

#[derive(Clone, Debug)]
pub struct InMemoryStore<K: Hash + Eq, V> {
	store: DashMap<K, V>,
}

impl<K: Hash + Eq, V> Default for InMemoryStore<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K: Hash + Eq, V> InMemoryStore<K, V> {
	pub fn new() -> Self {
		Self {
			store: DashMap::new(),
		}
	}
}

impl<K, V> Cache<K, V> for InMemoryStore<K, V>
where
	K: Hash + Eq + Clone + std::fmt::Debug,
	V: Clone,
{
	#[instrument(level = "trace", skip(self))]
	#[inline]
	fn get(&self, key: &K) -> Option<V> {
		self.store.get(key).map(|e| e.value().clone())
	}

	#[instrument(level = "trace", skip(self, value))]
	#[inline]
	fn insert(&self, key: K, value: V) {
		self.store.insert(key, value);
	}

	#[inline]
	fn len(&self) -> usize {
		self.store.len()
	}
}
