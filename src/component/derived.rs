use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A function of the props value
pub type PropsFn<T> = Arc<dyn Fn(&Value) -> T + Send + Sync>;

/// A value that is either fixed or computed from the props of a mark.
///
/// Configuration files can only express `Static`.
pub enum Derived<T> {
    Static(T),
    Computed(PropsFn<T>),
}

impl<T: Clone + Send + Sync + 'static> Derived<T> {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Value) -> T + Send + Sync + 'static,
    {
        Derived::Computed(Arc::new(f))
    }

    /// Turn this into a plain function of the props
    pub fn resolve(&self) -> PropsFn<T> {
        match self {
            Derived::Static(value) => {
                let value = value.clone();
                Arc::new(move |_| value.clone())
            }
            Derived::Computed(f) => f.clone(),
        }
    }
}

impl<T: Default> Default for Derived<T> {
    fn default() -> Self {
        Derived::Static(T::default())
    }
}

impl<T: Clone> Clone for Derived<T> {
    fn clone(&self) -> Self {
        match self {
            Derived::Static(value) => Derived::Static(value.clone()),
            Derived::Computed(f) => Derived::Computed(f.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Derived::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Derived::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Derived<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Derived::Static)
    }
}
