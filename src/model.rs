//! User record types as exchanged with the remote collection.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type UserId = u64;

/// A user record owned by the remote collection.
///
/// Only `name`, `email` and `address.city` are read or written here; every
/// other field the server sends is kept in `extra` and survives edits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: Address,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `null` and a missing key both read as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            address: Address { city: Some(city.into()), extra: Map::new() },
            extra: Map::new(),
        }
    }

    /// City of the nested address, empty when absent.
    pub fn city(&self) -> &str {
        self.address.city.as_deref().unwrap_or("")
    }
}

/// Body of a create request: `{name, email, address: {city}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: NewAddress,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewAddress {
    pub city: String,
}

/// Fields changed by an edit. Applied locally once the server acknowledges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserPatch {
    pub name: String,
    pub email: String,
    pub city: String,
}

impl UserPatch {
    /// Overwrite name, email and city; the rest of the record (including the
    /// other address fields) is left as is.
    pub fn apply(&self, user: &mut User) {
        user.name = self.name.clone();
        user.email = self.email.clone();
        user.address.city = Some(self.city.clone());
    }
}
