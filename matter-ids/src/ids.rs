/*
 * Copyright (c) 2024 Project CHIP Authors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use core::fmt;

use thiserror::Error;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u32 {
                self.0
            }

            /// The vendor prefix of a Manufacturer Extensible Identifier.
            pub const fn vendor_prefix(self) -> u16 {
                (self.0 >> 16) as u16
            }

            /// The vendor-local part of a Manufacturer Extensible Identifier.
            pub const fn suffix(self) -> u16 {
                (self.0 & 0xFFFF) as u16
            }

            /// Return `true` if the id is defined by the Matter specification
            /// rather than by a vendor.
            pub const fn is_standard(self) -> bool {
                self.vendor_prefix() == 0
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{:08X}", self.0)
            }
        }
    };
}

typed_id!(
    /// A cluster id, unique across the whole data model.
    ClusterId
);

typed_id!(
    /// An attribute id. Only unique within its cluster, except for the
    /// global attributes.
    AttributeId
);

typed_id!(
    /// A command id. Only unique within its cluster and direction:
    /// requests and responses are numbered independently.
    CommandId
);

typed_id!(
    /// An event id. Only unique within its cluster.
    EventId
);

/// The scope an identifier is numbered in.
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
        match self {
            Self::Cluster => write!(f, "cluster"),
            Self::Attribute => write!(f, "attribute"),
            Self::Command => write!(f, "command"),
            Self::CommandResponse => write!(f, "command response"),
            Self::Event => write!(f, "event"),
        }
    }
}

/// A fully scoped protocol element.
///
/// Usable as a map key: two identifiers are equal exactly when they name
/// the same element on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    Cluster(ClusterId),
    Attribute(ClusterId, AttributeId),
    /// An attribute every cluster carries, such as `ClusterRevision`.
    GlobalAttribute(AttributeId),
    Command(ClusterId, CommandId),
    CommandResponse(ClusterId, CommandId),
    Event(ClusterId, EventId),
}

impl Identifier {
    pub const fn namespace(&self) -> Namespace {
        match self {
            Self::Cluster(_) => Namespace::Cluster,
            Self::Attribute(..) | Self::GlobalAttribute(_) => Namespace::Attribute,
            Self::Command(..) => Namespace::Command,
            Self::CommandResponse(..) => Namespace::CommandResponse,
            Self::Event(..) => Namespace::Event,
        }
    }

    /// The owning cluster, or the cluster itself for cluster identifiers.
    ///
    /// `None` for global attributes.
    pub const fn cluster(&self) -> Option<ClusterId> {
        match self {
            Self::Cluster(cluster)
            | Self::Attribute(cluster, _)
            | Self::Command(cluster, _)
            | Self::CommandResponse(cluster, _)
            | Self::Event(cluster, _) => Some(*cluster),
            Self::GlobalAttribute(_) => None,
        }
    }

    /// The numeric value sent on the wire.
    pub const fn value(&self) -> u32 {
        match self {
            Self::Cluster(id) => id.get(),
            Self::Attribute(_, id) | Self::GlobalAttribute(id) => id.get(),
            Self::Command(_, id) | Self::CommandResponse(_, id) => id.get(),
            Self::Event(_, id) => id.get(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster(id) => write!(f, "cluster {id}"),
            Self::GlobalAttribute(id) => write!(f, "global attribute {id}"),
            _ => {
                let cluster = self.cluster().unwrap_or_default();
                write!(
                    f,
                    "{} 0x{:08X} of cluster {cluster}",
                    self.namespace(),
                    self.value()
                )
            }
        }
    }
}

/// An id that has no entry in the generated tables.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnknownId {
    #[error("unknown cluster {0}")]
    Cluster(ClusterId),
    #[error("unknown attribute {1} in cluster {0}")]
    Attribute(ClusterId, AttributeId),
    #[error("unknown command {1} in cluster {0}")]
    Command(ClusterId, CommandId),
    #[error("unknown command response {1} in cluster {0}")]
    CommandResponse(ClusterId, CommandId),
    #[error("unknown event {1} in cluster {0}")]
    Event(ClusterId, EventId),
    #[error("unknown global attribute {0}")]
    GlobalAttribute(AttributeId),
}

impl UnknownId {
    /// The identifier that failed to resolve.
    pub const fn identifier(&self) -> Identifier {
        match *self {
            Self::Cluster(id) => Identifier::Cluster(id),
            Self::Attribute(cluster, id) => Identifier::Attribute(cluster, id),
            Self::Command(cluster, id) => Identifier::Command(cluster, id),
            Self::CommandResponse(cluster, id) => Identifier::CommandResponse(cluster, id),
            Self::Event(cluster, id) => Identifier::Event(cluster, id),
            Self::GlobalAttribute(id) => Identifier::GlobalAttribute(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x0000_0006, 0x0000, 0x0006, true)]
    #[case(0xFFF1_FC01, 0xFFF1, 0xFC01, false)]
    #[case(0x0000_FFFD, 0x0000, 0xFFFD, true)]
    fn manufacturer_extensible_parts(
        #[case] raw: u32,
        #[case] prefix: u16,
        #[case] suffix: u16,
        #[case] standard: bool,
    ) {
        let id = AttributeId::new(raw);

        assert_eq!(id.vendor_prefix(), prefix);
        assert_eq!(id.suffix(), suffix);
        assert_eq!(id.is_standard(), standard);
    }

    #[test]
    fn display_is_zero_padded_hex() {
        assert_eq!(ClusterId::new(0x1F).to_string(), "0x0000001F");
        assert_eq!(EventId::from(1).to_string(), "0x00000001");
        assert_eq!(u32::from(CommandId::new(0x40)), 0x40);
    }

    #[rstest]
    #[case(Identifier::Cluster(ClusterId::new(6)), Namespace::Cluster, Some(6), 6)]
    #[case(
        Identifier::Attribute(ClusterId::new(6), AttributeId::new(0x4001)),
        Namespace::Attribute,
        Some(6),
        0x4001
    )]
    #[case(
        Identifier::GlobalAttribute(AttributeId::new(0xFFFD)),
        Namespace::Attribute,
        None,
        0xFFFD
    )]
    #[case(
        Identifier::CommandResponse(ClusterId::new(4), CommandId::new(0)),
        Namespace::CommandResponse,
        Some(4),
        0
    )]
    #[case(
        Identifier::Event(ClusterId::new(0x3B), EventId::new(1)),
        Namespace::Event,
        Some(0x3B),
        1
    )]
    fn identifier_parts(
        #[case] identifier: Identifier,
        #[case] namespace: Namespace,
        #[case] cluster: Option<u32>,
        #[case] value: u32,
    ) {
        assert_eq!(identifier.namespace(), namespace);
        assert_eq!(identifier.cluster(), cluster.map(ClusterId::new));
        assert_eq!(identifier.value(), value);
    }

    #[test]
    fn identifiers_display() {
        assert_eq!(
            Identifier::Command(ClusterId::new(6), CommandId::new(1)).to_string(),
            "command 0x00000001 of cluster 0x00000006"
        );
        assert_eq!(
            Identifier::GlobalAttribute(AttributeId::new(0xFFFC)).to_string(),
            "global attribute 0x0000FFFC"
        );
    }

    #[test]
    fn command_and_response_with_same_code_differ() {
        let command = Identifier::Command(ClusterId::new(4), CommandId::new(0));
        let response = Identifier::CommandResponse(ClusterId::new(4), CommandId::new(0));

        assert_ne!(command, response);
        assert_eq!(command.value(), response.value());
    }
}
