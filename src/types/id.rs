// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resource identifier.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a resource within one bridge session.
///
/// The bridge assigns integer ids. They are stable for the lifetime of the
/// session and are used both for lookups and to address outbound commands.
///
/// # Examples
///
/// ```
/// use nexo_lib::types::ResourceId;
/// use serde_json::json;
///
/// assert_eq!(ResourceId::from_value(&json!(7)), Some(ResourceId::new(7)));
/// assert_eq!(ResourceId::from_value(&json!("7")), Some(ResourceId::new(7)));
/// assert_eq!(ResourceId::from_value(&json!("kitchen")), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(i64);

impl ResourceId {
    /// Creates a resource id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Reads an id from a JSON value.
    ///
    /// Accepts integers and strings holding an integer. Anything else
    /// (floats, booleans, null, non-numeric strings) yields `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self),
            Value::String(s) => s.trim().parse().ok().map(Self),
            _ => None,
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_integer() {
        assert_eq!(ResourceId::from_value(&json!(42)), Some(ResourceId(42)));
        assert_eq!(ResourceId::from_value(&json!(-3)), Some(ResourceId(-3)));
    }

    #[test]
    fn from_numeric_string() {
        assert_eq!(ResourceId::from_value(&json!(" 12 ")), Some(ResourceId(12)));
    }

    #[test]
    fn rejects_non_integers() {
        assert_eq!(ResourceId::from_value(&json!(1.5)), None);
        assert_eq!(ResourceId::from_value(&json!(true)), None);
        assert_eq!(ResourceId::from_value(&json!(null)), None);
        assert_eq!(ResourceId::from_value(&json!("abc")), None);
        assert_eq!(ResourceId::from_value(&json!({"id": 1})), None);
    }

    #[test]
    fn serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&ResourceId(5)).unwrap(), "5");
    }
}
