//! Authorization model payload.
//!
//! Readers pass these values through untouched. Relation rewrites, metadata
//! and conditions are kept as raw JSON so that the schema can evolve without
//! this crate interpreting it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A versioned authorization schema stored for one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationModel {
    /// Model id (e.g., "01HVMMBCMGZNT3SED4Z17ECXCA").
    #[serde(default)]
    pub id: String,

    /// Schema version (e.g., "1.1").
    pub schema_version: String,

    /// Object type definitions.
    #[serde(default)]
    pub type_definitions: Vec<TypeDefinition>,

    /// Named conditions, keyed by condition name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub conditions: BTreeMap<String, serde_json::Value>,
}

/// One object type and its relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    #[serde(rename = "type")]
    pub type_name: String,

    /// Relation rewrites, keyed by relation name.
    #[serde(default)]
    pub relations: BTreeMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl AuthorizationModel {
    pub fn new(id: impl Into<String>, schema_version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema_version: schema_version.into(),
            type_definitions: Vec::new(),
            conditions: BTreeMap::new(),
        }
    }

    /// Add a type definition.
    pub fn with_type(mut self, type_definition: TypeDefinition) -> Self {
        self.type_definitions.push(type_definition);
        self
    }
}

impl TypeDefinition {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            relations: BTreeMap::new(),
            metadata: None,
        }
    }

    /// Add a relation with its rewrite.
    pub fn with_relation(mut self, name: impl Into<String>, rewrite: serde_json::Value) -> Self {
        self.relations.insert(name.into(), rewrite);
        self
    }
}
