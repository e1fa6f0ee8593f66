//! Value models shared by the unit tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub age: u32,
    pub company: Option<Company>,
    pub address: Option<Address>,
    pub numbers: Vec<i32>,
    pub friends: Vec<User>,
    pub custom: BTreeMap<String, String>,
}

impl User {
    pub fn new(name: &str, age: u32) -> Self {
        Self {
            name: name.to_string(),
            age,
            ..Self::default()
        }
    }

    pub fn with(mut self, edit: impl FnOnce(&mut Self)) -> Self {
        edit(&mut self);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
}

/// Deliberately a leaf: replaced as a whole, never diffed field by field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub house_number: u32,
}

crate::diffable_record!(
    User { name, age, company, address, numbers, friends, custom },
    identity = name
);
crate::diffable_record!(Company { name });
crate::diffable_leaf!(Address);

pub fn custom(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
