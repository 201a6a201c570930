//! Resource schema of `rancher_host`.
//!
//! Describes each attribute the configuration tool exposes and validates a
//! configuration record against it before any remote call is made.

use crate::error::ProviderError;
use crate::labels;
use serde_json::Value;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    /// Map of string keys to string values
    Map,
}

/// Whether the user must, may, or cannot set an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Set by the provider only
    Computed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeType,
    pub presence: Presence,
    pub description: &'static str,
}

impl Attribute {
    pub const fn new(
        name: &'static str,
        kind: AttributeType,
        presence: Presence,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            presence,
            description,
        }
    }
}

/// Schema of one resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub attributes: Vec<Attribute>,
}

/// Schema of the `rancher_host` resource
pub fn host_schema() -> ResourceSchema {
    use AttributeType::{Map, String};
    use Presence::{Computed, Optional, Required};

    ResourceSchema {
        type_name: "rancher_host",
        attributes: vec![
            Attribute::new("id", String, Computed, "Rancher host ID"),
            Attribute::new("name", String, Required, "Host name shown in Rancher"),
            Attribute::new("description", String, Optional, "Host description"),
            Attribute::new("environment_id", String, Required, "Environment the host belongs to"),
            Attribute::new("hostname", String, Required, "Hostname the agent registers with"),
            Attribute::new("labels", Map, Optional, "Host labels"),
        ],
    }
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Validate a configuration record given as JSON.
    ///
    /// Every problem is collected; the error lists all of them.
    pub fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        let Some(object) = config.as_object() else {
            return Err(ProviderError::Validation(vec![format!(
                "{} configuration must be an object",
                self.type_name
            )]));
        };

        let mut problems = Vec::new();

        for key in object.keys() {
            if self.attribute(key).is_none() {
                problems.push(format!("unknown attribute \"{}\"", key));
            }
        }

        for attribute in &self.attributes {
            let Some(value) = object.get(attribute.name).filter(|v| !v.is_null()) else {
                if attribute.presence == Presence::Required {
                    problems.push(format!("\"{}\" is required", attribute.name));
                }
                continue;
            };

            match attribute.kind {
                AttributeType::String => match value.as_str() {
                    Some("") if attribute.presence == Presence::Required => {
                        problems.push(format!("\"{}\" must not be empty", attribute.name));
                    }
                    Some(_) => {}
                    None => problems.push(format!("\"{}\" must be a string", attribute.name)),
                },
                AttributeType::Map => match value.as_object() {
                    Some(map) => {
                        for (key, entry) in map {
                            if !entry.is_string() {
                                problems.push(format!(
                                    "\"{}.{}\" must be a string",
                                    attribute.name, key
                                ));
                            }
                            if attribute.name == "labels" && labels::is_read_only(key) {
                                problems.push(format!(
                                    "label \"{}\" is managed by Rancher and cannot be set",
                                    key
                                ));
                            }
                        }
                    }
                    None => problems.push(format!("\"{}\" must be a map", attribute.name)),
                },
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::Validation(problems))
        }
    }
}
