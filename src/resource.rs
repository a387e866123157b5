use std::collections::HashMap;

use crate::{
    Value,
    error::{Error, Result},
};

/// Named fixture values staged before tests run.
///
/// Adding and overriding are distinct on purpose: a staged name is never replaced by
/// accident and an override never creates a name silently.
#[derive(Debug, Default, Clone)]
pub struct Resources(HashMap<String, Value>);

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        match self.0.contains_key(&name) {
            true => Err(Error::DuplicateResource(name)),
            false => {
                self.0.insert(name, value.into());
                Ok(())
            }
        }
    }

    pub fn override_with(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self.0.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(Error::UnknownResource(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        self.0
            .get(name)
            .ok_or_else(|| Error::UnknownResource(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Result<Value> {
        self.0
            .remove(name)
            .ok_or_else(|| Error::UnknownResource(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
