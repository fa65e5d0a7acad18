//! Department record.

use serde::{Deserialize, Serialize};

/// Store-assigned department identifier.
pub type DepartmentId = i64;

/// Persisted department. `name` is unique across the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}
