//! Event extension data.
//!
//! Events carry an open-ended string-keyed map for data the base fields
//! don't cover (element, crit flag, source skill, ...). The engine doesn't
//! interpret it beyond including it in the event fingerprint.
//!
//! ## ExtraValue Types
//!
//! - `Int`: Numbers (bonus damage, stacks)
//! - `Bool`: Flags (critical, piercing)
//! - `Text`: Strings (element, skill name)
//! - `IntList`: Number lists
//! - `TextList`: String lists (tags)

use serde::{Deserialize, Serialize};

/// Value stored in an event's extension map.
///
/// Values are totally ordered and hashable so they can take part in the
/// event fingerprint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExtraValue {
    Int(i64),
    Bool(bool),
    Text(String),
    IntList(Vec<i64>),
    TextList(Vec<String>),
}

macro_rules! extra_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for ExtraValue {
                fn from(v: $source) -> Self {
                    ExtraValue::$variant(v.into())
                }
            }
        )*
    };
}

extra_from! {
    i64 => Int,
    bool => Bool,
    String => Text,
    &str => Text,
    Vec<i64> => IntList,
    Vec<String> => TextList,
}

/// Extension map carried by every event. Empty by default.
///
/// Iteration is ordered by key, which makes the map's contribution to a
/// fingerprint independent of insertion order.
pub type Extras = im::OrdMap<String, ExtraValue>;
