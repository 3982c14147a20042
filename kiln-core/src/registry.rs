use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::creator::{Construct, Creator, HandleFrom};
use crate::error::RegistryError;

/// Keyed mapping from identifier to constructor.
///
/// `H` is the handle type every creator produces (e.g. `Box<dyn Shape>`),
/// `A` the fixed argument tuple creators consume, and `K` the key type.
/// Two registries with different parameters are distinct types; a key
/// registered in one is invisible to the other.
///
/// A `Registry` is a plain owned value with no internal synchronization:
/// writes take `&mut self`, reads take `&self`. To share one across threads,
/// wrap it in a lock (it is `Send + Sync` whenever `K` is), or declare a
/// process-wide instance with `define_registry!`.
pub struct Registry<H: 'static, A: 'static = (), K = String> {
    creators: HashMap<K, Creator<H, A>>,
}

/// Registry keyed by string, producing exclusively owned `Box<dyn Base>`
/// handles. The default parameterization.
pub type BoxRegistry<B, A = ()> = Registry<Box<B>, A, String>;

/// Registry keyed by string, producing shared `Arc<dyn Base>` handles.
pub type ArcRegistry<B, A = ()> = Registry<std::sync::Arc<B>, A, String>;

impl<H: 'static, A: 'static, K: Eq + Hash> Registry<H, A, K> {
    pub fn new() -> Self {
        Self {
            creators: HashMap::new(),
        }
    }

    /// Inserts a creator under `key` if the key is free.
    ///
    /// First registration wins: if the key is already taken, nothing changes
    /// and `false` is returned.
    pub fn register<F>(&mut self, key: impl Into<K>, creator: F) -> bool
    where
        F: Fn(A) -> H + Send + Sync + 'static,
    {
        match self.creators.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Box::new(creator));
                true
            }
        }
    }

    /// Same policy as [`register`](Self::register), but a rejected duplicate
    /// is reported as an error instead of a silent `false`.
    pub fn try_register<F>(&mut self, key: impl Into<K>, creator: F) -> Result<(), RegistryError>
    where
        F: Fn(A) -> H + Send + Sync + 'static,
        K: fmt::Display,
    {
        match self.creators.entry(key.into()) {
            Entry::Occupied(slot) => Err(RegistryError::DuplicateKey(slot.key().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Box::new(creator));
                Ok(())
            }
        }
    }

    /// Registers `C` with an auto-generated creator that constructs it from
    /// the registry's argument tuple and wraps it in the handle type.
    pub fn register_type<C>(&mut self, key: impl Into<K>) -> bool
    where
        C: Construct<A> + 'static,
        H: HandleFrom<C>,
    {
        self.register(key, |args| H::handle_from(C::construct(args)))
    }

    /// Removes the creator for `key`, returning whether one was present.
    ///
    /// Instances already created from the removed entry are unaffected; they
    /// are independently owned by their callers.
    pub fn unregister<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.creators.remove(key).is_some()
    }

    /// Looks up `key` and invokes its creator with `args`.
    ///
    /// Ownership of the produced instance passes entirely to the caller.
    /// `None` is the only miss signal; callers must check for it.
    pub fn create<Q>(&self, key: &Q, args: A) -> Option<H>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.creators.get(key).map(|creator| creator(args))
    }

    /// Like [`create`](Self::create), but a miss carries the offending key.
    pub fn try_create<Q>(&self, key: &Q, args: A) -> Result<H, RegistryError>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Display + ?Sized,
    {
        match self.creators.get(key) {
            Some(creator) => Ok(creator(args)),
            None => Err(RegistryError::UnknownKey(key.to_string())),
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.creators.contains_key(key)
    }

    /// Iterates over the registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.creators.keys()
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }

    /// Removes every entry. Mainly for isolating tests that share a registry.
    pub fn clear(&mut self) {
        self.creators.clear();
    }
}

impl<H: 'static, K: Eq + Hash> Registry<H, (), K> {
    /// Registers `C` with a creator that calls `C::default()`.
    pub fn register_default<C>(&mut self, key: impl Into<K>) -> bool
    where
        C: Default + 'static,
        H: HandleFrom<C>,
    {
        self.register(key, |_: ()| H::handle_from(C::default()))
    }
}

impl<H: 'static, A: 'static, K: Eq + Hash> Default for Registry<H, A, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: 'static, A: 'static, K: Eq + Hash + fmt::Debug> fmt::Debug for Registry<H, A, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.creators.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
