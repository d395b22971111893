//! Composition policies for merging two values of one term.

use crate::{ComposeError, ComposeResult};
use layers_core::PropertyValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How two values of the same term are merged.
///
/// `old` is the value already on the target, `new` the incoming one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionPolicy {
    /// Set union, duplicates collapsed.
    #[default]
    Set,
    /// Concatenation, order preserved.
    List,
    /// New replaces old unless new is absent.
    Override,
    /// Old always wins.
    NoCompose,
    /// Unequal values conflict.
    Error,
}

impl CompositionPolicy {
    pub fn compose(
        self,
        old: Option<&PropertyValue>,
        new: Option<&PropertyValue>,
    ) -> ComposeResult<Option<PropertyValue>> {
        match self {
            CompositionPolicy::Set => Ok(set_union(old, new)),
            CompositionPolicy::List => Ok(list_append(old, new)),
            CompositionPolicy::Override => Ok(new.or(old).cloned()),
            CompositionPolicy::NoCompose => Ok(old.or(new).cloned()),
            CompositionPolicy::Error => match (old, new) {
                (Some(o), Some(n)) if o != n => Err(ComposeError::Conflict {
                    old: o.clone(),
                    new: n.clone(),
                }),
                (o, n) => Ok(o.or(n).cloned()),
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompositionPolicy::Set => "set",
            CompositionPolicy::List => "list",
            CompositionPolicy::Override => "override",
            CompositionPolicy::NoCompose => "nocompose",
            CompositionPolicy::Error => "error",
        }
    }
}

impl fmt::Display for CompositionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(CompositionPolicy::Set),
            "list" => Ok(CompositionPolicy::List),
            "override" => Ok(CompositionPolicy::Override),
            "nocompose" => Ok(CompositionPolicy::NoCompose),
            "error" => Ok(CompositionPolicy::Error),
            other => Err(format!("unknown composition policy: {}", other)),
        }
    }
}

/// Union of two values. A single surviving string stays a scalar.
pub fn set_union(
    old: Option<&PropertyValue>,
    new: Option<&PropertyValue>,
) -> Option<PropertyValue> {
    let (old, new) = match (old, new) {
        (None, n) => return n.cloned(),
        (o, None) => return o.cloned(),
        (Some(o), Some(n)) => (o, n),
    };
    if old == new {
        return Some(old.clone());
    }

    let mut items = old.to_string_list();
    for item in new.to_string_list() {
        if !items.contains(&item) {
            items.push(item);
        }
    }
    if !old.is_list() && items.len() == 1 {
        return items.pop().map(PropertyValue::String);
    }
    Some(PropertyValue::List(items))
}

/// Concatenation of two values into a list.
pub fn list_append(
    old: Option<&PropertyValue>,
    new: Option<&PropertyValue>,
) -> Option<PropertyValue> {
    match (old, new) {
        (None, n) => n.cloned(),
        (o, None) => o.cloned(),
        (Some(o), Some(n)) => {
            let mut items = o.to_string_list();
            items.extend(n.to_string_list());
            Some(PropertyValue::List(items))
        }
    }
}
