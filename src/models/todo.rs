use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Store-assigned identifier of a todo.
///
/// MongoDB hands out `ObjectId`s, rendered on the wire as 24-digit hex strings.
/// The in-memory store counts upwards from 1 and those ids travel as numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TodoId {
    Sequence(u64),
    Object(ObjectId),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Sequence(n) => write!(f, "{}", n),
            TodoId::Object(oid) => write!(f, "{}", oid.to_hex()),
        }
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TodoId::Sequence(n) => serializer.serialize_u64(*n),
            TodoId::Object(oid) => serializer.serialize_str(&oid.to_hex()),
        }
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(TodoId::Sequence(n)),
            Raw::Text(hex) => ObjectId::parse_str(&hex)
                .map(TodoId::Object)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Todo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TodoId>,
    pub completed: bool,
    pub body: String,
}

/// Create payload. Any client-supplied `id` is dropped during deserialization;
/// missing and `null` fields both fall back to their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NewTodo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewTodo {
    #[cfg(test)]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            completed: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
