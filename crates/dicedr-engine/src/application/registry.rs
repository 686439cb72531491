//! Catalog of registered methods.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dicedr_core::method::PickerMethod;

use crate::error::RegistryError;

/// Methods indexed by id, enumerable in registration order.
#[derive(Default)]
pub struct MethodRegistry {
    methods: Vec<Arc<dyn PickerMethod>>,
    index: HashMap<String, usize>,
}

impl MethodRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from `methods`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first `RegistryError` raised by [`register`](Self::register).
    pub fn from_methods(
        methods: impl IntoIterator<Item = Arc<dyn PickerMethod>>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register_all(methods)?;
        Ok(registry)
    }

    /// Registers one method.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidMethod` if the id or a localization key
    /// is blank, and `RegistryError::DuplicateMethod` if the id is taken.
    pub fn register(&mut self, method: Arc<dyn PickerMethod>) -> Result<(), RegistryError> {
        let id = method.id();
        if id.trim().is_empty() {
            return Err(RegistryError::InvalidMethod(
                "method id must be a non-empty string".to_owned(),
            ));
        }
        if method.title_key().trim().is_empty() || method.subtitle_key().trim().is_empty() {
            return Err(RegistryError::InvalidMethod(format!(
                "method \"{id}\" is missing a title or subtitle key"
            )));
        }
        if self.index.contains_key(id) {
            return Err(RegistryError::DuplicateMethod(id.to_owned()));
        }

        self.index.insert(id.to_owned(), self.methods.len());
        self.methods.push(method);
        Ok(())
    }

    /// Registers several methods, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first `RegistryError` raised by [`register`](Self::register).
    pub fn register_all(
        &mut self,
        methods: impl IntoIterator<Item = Arc<dyn PickerMethod>>,
    ) -> Result<(), RegistryError> {
        methods.into_iter().try_for_each(|method| self.register(method))
    }

    /// The method registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn PickerMethod>> {
        self.index.get(id).map(|&i| &self.methods[i])
    }

    /// All methods in registration order.
    #[must_use]
    pub fn all(&self) -> &[Arc<dyn PickerMethod>] {
        &self.methods
    }

    /// `true` if `id` is registered.
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|m| m.id())
    }

    /// The first registered method, used when navigation names an unknown id.
    #[must_use]
    pub fn default_method(&self) -> Option<&Arc<dyn PickerMethod>> {
        self.methods.first()
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
