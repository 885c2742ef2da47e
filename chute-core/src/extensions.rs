//! Typed per-request storage for data attached by middleware.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
};

type AnyMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// A map holding at most one value per type.
///
/// The backing map is only allocated on the first insert, so requests that
/// never touch extensions pay nothing for them.
#[derive(Default)]
pub struct Extensions {
    map: Option<Box<AnyMap>>,
}

impl Extensions {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .get_or_insert_with(Box::default)
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|prev| prev.downcast().ok().map(|boxed| *boxed))
    }

    /// Borrow the value of type `T`.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .as_ref()
            .and_then(|map| map.get(&TypeId::of::<T>()))
            .and_then(|boxed| boxed.downcast_ref())
    }

    /// Mutably borrow the value of type `T`.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.map
            .as_mut()
            .and_then(|map| map.get_mut(&TypeId::of::<T>()))
            .and_then(|boxed| boxed.downcast_mut())
    }

    /// Remove and return the value of type `T`.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.map
            .as_mut()
            .and_then(|map| map.remove(&TypeId::of::<T>()))
            .and_then(|boxed| boxed.downcast().ok().map(|boxed| *boxed))
    }

    /// Returns true if a value of type `T` is present.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, |map| map.len())
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        if let Some(map) = &mut self.map {
            map.clear();
        }
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct UserId(u64);

    #[test]
    fn test_insert_get_remove() {
        let mut ext = Extensions::new();
        assert!(ext.is_empty());
        assert!(ext.map.is_none());

        assert_eq!(ext.insert(UserId(1)), None);
        assert_eq!(ext.insert("tag"), None);
        assert_eq!(ext.len(), 2);
        assert_eq!(ext.get::<UserId>(), Some(&UserId(1)));
        assert_eq!(ext.get::<&str>(), Some(&"tag"));

        assert_eq!(ext.insert(UserId(2)), Some(UserId(1)));
        ext.get_mut::<UserId>().unwrap().0 += 1;
        assert_eq!(ext.remove::<UserId>(), Some(UserId(3)));
        assert!(!ext.contains::<UserId>());
        assert_eq!(ext.get::<u8>(), None);

        ext.clear();
        assert!(ext.is_empty());
    }
}
