//! Data model of a Matter IDL file, reduced to what identifier tables need.
//!
//! A `.matter` file describes clusters and their attributes, commands,
//! command responses and events. Every one of those carries a numeric code
//! that is visible on the wire; this crate parses those codes (plus enough
//! metadata to name and document them) and validates that they are unique
//! within their scope.

use core::fmt;

#[cfg(feature = "idl")]
pub mod idl;
#[cfg(feature = "idl")]
pub mod validate;

/// How mature/usable a member of an API is
///
/// Most things should be stable, however while spec is developed
/// we expect PROVISIONAL to be set.
#[derive(Debug, PartialEq, Copy, Clone, Hash, PartialOrd, Eq, Ord, Default)]
#[non_exhaustive]
pub enum ApiMaturity {
    #[default]
    Stable,
    Provisional,
    Internal,
    Deprecated,
}

/// The scope an identifier code lives in.
///
/// Cluster codes are global; every other namespace is scoped by the
/// owning cluster.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    Cluster,
    Attribute,
    Command,
    CommandResponse,
    Event,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Namespace::Cluster => "cluster",
            Namespace::Attribute => "attribute",
            Namespace::Command => "command",
            Namespace::CommandResponse => "command response",
            Namespace::Event => "event",
        })
    }
}

/// A generic type such as integers, strings, enums, structs etc.
///
/// Supports information if this is repeated/list as well
/// as a maximum length (if applicable).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DataType {
    pub name: String,
    pub is_list: bool,
    pub max_length: Option<u64>,
}

impl DataType {
    pub fn scalar<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            is_list: false,
            max_length: None,
        }
    }

    pub fn list_of<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            is_list: true,
            max_length: None,
        }
    }

    pub fn scalar_of_size<T: Into<String>>(name: T, max_length: u64) -> Self {
        Self {
            name: name.into(),
            is_list: false,
            max_length: Some(max_length),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(max_length) = self.max_length {
            write!(f, "<{}>", max_length)?;
        }
        if self.is_list {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// An attribute within a cluster
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Attribute {
    pub doc_comment: Option<String>,
    pub maturity: ApiMaturity,
    pub data_type: DataType,
    pub id: String,
    pub code: u64,
    pub is_read_only: bool,
    pub is_optional: bool,
    pub is_nullable: bool,
    pub is_timed_write: bool,
}

/// A command that can be invoked on a cluster (client to server)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Command {
    pub doc_comment: Option<String>,
    pub maturity: ApiMaturity,
    pub id: String,
    pub input: Option<String>,
    pub output: String,
    pub code: u64,
    pub is_timed: bool,
    pub is_fabric_scoped: bool,
}

impl Default for Command {
    fn default() -> Self {
        Self {
            doc_comment: None,
            maturity: ApiMaturity::Stable,
            id: "".into(),
            input: None,
            output: "DefaultSuccess".into(),
            code: 0,
            is_timed: false,
            is_fabric_scoped: false,
        }
    }
}

/// A command sent back by the server, declared as `response struct X = code`.
///
/// Response codes live in their own scope: `AddGroup` and
/// `AddGroupResponse` legitimately share code 0.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CommandResponse {
    pub doc_comment: Option<String>,
    pub maturity: ApiMaturity,
    pub id: String,
    pub code: u64,
}

/// Priority of a specific event
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EventPriority {
    Critical,
    #[default]
    Info,
    Debug,
}

/// An event that may be emited by a cluster
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Event {
    pub doc_comment: Option<String>,
    pub maturity: ApiMaturity,
    pub priority: EventPriority,
    pub id: String,
    pub code: u64,
    pub is_fabric_sensitive: bool,
}

/// A cluster and the identifiers of everything it exposes.
///
/// `id` is generally a human-readable (and code-gen usable as well) name
/// while binary API will generally use `code`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cluster {
    pub doc_comment: Option<String>,
    pub maturity: ApiMaturity,

    pub id: String,
    pub code: u64,
    pub revision: u64,

    pub attributes: Vec<Attribute>,
    pub commands: Vec<Command>,
    pub responses: Vec<CommandResponse>,
    pub events: Vec<Event>,
}

impl Cluster {
    pub fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == name)
    }

    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == name)
    }

    pub fn find_response(&self, name: &str) -> Option<&CommandResponse> {
        self.responses.iter().find(|r| r.id == name)
    }

    pub fn find_event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == name)
    }

    /// `(name, code)` pairs of every element of this cluster within `namespace`.
    ///
    /// For [`Namespace::Cluster`] this yields the cluster itself.
    pub fn codes(&self, namespace: Namespace) -> Vec<(&str, u64)> {
        match namespace {
            Namespace::Cluster => vec![(self.id.as_str(), self.code)],
            Namespace::Attribute => self
                .attributes
                .iter()
                .map(|a| (a.id.as_str(), a.code))
                .collect(),
            Namespace::Command => self
                .commands
                .iter()
                .map(|c| (c.id.as_str(), c.code))
                .collect(),
            Namespace::CommandResponse => self
                .responses
                .iter()
                .map(|r| (r.id.as_str(), r.code))
                .collect(),
            Namespace::Event => self.events.iter().map(|e| (e.id.as_str(), e.code)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_display() {
        assert_eq!(DataType::scalar("int16u").to_string(), "int16u");
        assert_eq!(DataType::list_of("attrib_id").to_string(), "attrib_id[]");
        assert_eq!(
            DataType::scalar_of_size("char_string", 32).to_string(),
            "char_string<32>"
        );
    }

    #[test]
    fn cluster_codes_per_namespace() {
        let cluster = Cluster {
            id: "Groups".into(),
            code: 4,
            commands: vec![Command {
                id: "AddGroup".into(),
                code: 0,
                ..Default::default()
            }],
            responses: vec![CommandResponse {
                id: "AddGroupResponse".into(),
                code: 0,
                ..Default::default()
            }],
            ..Default::default()
        };

        assert_eq!(cluster.codes(Namespace::Cluster), vec![("Groups", 4)]);
        assert_eq!(cluster.codes(Namespace::Command), vec![("AddGroup", 0)]);
        assert_eq!(
            cluster.codes(Namespace::CommandResponse),
            vec![("AddGroupResponse", 0)]
        );
        assert!(cluster.codes(Namespace::Event).is_empty());
        assert!(cluster.find_command("AddGroupResponse").is_none());
        assert!(cluster.find_response("AddGroupResponse").is_some());
    }
}
