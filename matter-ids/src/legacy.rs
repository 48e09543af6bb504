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

//! Deprecated symbol names.
//!
//! Before the current naming scheme, constants were named
//! `Cluster{C}ID`, `Cluster{C}Attribute{A}ID`, `Cluster{C}Command{X}ID`,
//! `Cluster{C}Event{E}ID` and `GlobalAttribute{A}ID`, and some clusters
//! and elements carried names that were renamed since. These names are
//! still accepted by [`crate::symbol::resolve`] but are never generated as
//! enum variants.

use crate::registry::Description;
use crate::{Identifier, Namespace};

/// A cluster whose name changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RenamedCluster {
    pub old: &'static str,
    pub new: &'static str,
}

/// An element whose name changed within its cluster.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RenamedElement {
    /// Current name of the owning cluster.
    pub cluster: &'static str,
    pub namespace: Namespace,
    pub old: &'static str,
    pub new: &'static str,
}

pub const RENAMED_CLUSTERS: &[RenamedCluster] = &[
    RenamedCluster {
        old: "Basic",
        new: "BasicInformation",
    },
    RenamedCluster {
        old: "BridgedDeviceBasic",
        new: "BridgedDeviceBasicInformation",
    },
];

pub const RENAMED_ELEMENTS: &[RenamedElement] = &[
    RenamedElement {
        cluster: "Descriptor",
        namespace: Namespace::Attribute,
        old: "DeviceList",
        new: "DeviceTypeList",
    },
    RenamedElement {
        cluster: "PowerSource",
        namespace: Namespace::Attribute,
        old: "BatteryVoltage",
        new: "BatVoltage",
    },
    RenamedElement {
        cluster: "PowerSource",
        namespace: Namespace::Attribute,
        old: "BatteryPercentRemaining",
        new: "BatPercentRemaining",
    },
    RenamedElement {
        cluster: "PowerSource",
        namespace: Namespace::Attribute,
        old: "BatteryTimeRemaining",
        new: "BatTimeRemaining",
    },
    RenamedElement {
        cluster: "PowerSource",
        namespace: Namespace::Attribute,
        old: "BatteryChargeLevel",
        new: "BatChargeLevel",
    },
];

/// The current cluster name followed by all of its former names.
pub fn cluster_names(name: &'static str) -> impl Iterator<Item = &'static str> {
    core::iter::once(name).chain(
        RENAMED_CLUSTERS
            .iter()
            .filter(move |r| r.new == name)
            .map(|r| r.old),
    )
}

/// The current element name followed by all of its former names.
pub fn element_names(
    cluster: &'static str,
    namespace: Namespace,
    name: &'static str,
) -> impl Iterator<Item = &'static str> {
    core::iter::once(name).chain(
        RENAMED_ELEMENTS
            .iter()
            .filter(move |r| r.cluster == cluster && r.namespace == namespace && r.new == name)
            .map(|r| r.old),
    )
}

/// All deprecated symbols naming the described element.
pub fn aliases(description: &Description) -> Vec<String> {
    let identifier = description.identifier;

    let Some(cluster) = description.cluster else {
        return vec![format!("GlobalAttribute{}ID", description.name)];
    };

    if let Identifier::Cluster(_) = identifier {
        return cluster_names(cluster.name)
            .map(|c| format!("Cluster{c}ID"))
            .collect();
    }

    let kind = match identifier.namespace() {
        Namespace::Attribute => "Attribute",
        Namespace::Command | Namespace::CommandResponse => "Command",
        Namespace::Event => "Event",
        Namespace::Cluster => return Vec::new(),
    };

    let mut aliases = Vec::new();

    for c in cluster_names(cluster.name) {
        for e in element_names(cluster.name, identifier.namespace(), description.name) {
            aliases.push(format!("Cluster{c}{kind}{e}ID"));
        }
    }

    aliases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{cluster_by_name, describe};
    use crate::{AttributeId, ClusterId, EventId};

    fn aliases_of(identifier: Identifier) -> Vec<String> {
        aliases(&describe(identifier).expect("known identifier"))
    }

    #[test]
    fn renamed_entries_refer_to_known_names() {
        for renamed in RENAMED_CLUSTERS {
            assert!(cluster_by_name(renamed.new).is_some(), "{}", renamed.new);
            assert!(cluster_by_name(renamed.old).is_none(), "{}", renamed.old);
        }

        for renamed in RENAMED_ELEMENTS {
            let cluster = cluster_by_name(renamed.cluster).expect("known cluster");
            let elements = cluster.elements(renamed.namespace);

            assert!(elements.iter().any(|e| e.name == renamed.new), "{}", renamed.new);
            assert!(elements.iter().all(|e| e.name != renamed.old), "{}", renamed.old);
        }
    }

    #[test]
    fn cluster_aliases() {
        assert_eq!(
            aliases_of(Identifier::Cluster(ClusterId::new(0x0006))),
            vec!["ClusterOnOffID"]
        );
        assert_eq!(
            aliases_of(Identifier::Cluster(ClusterId::new(0x0028))),
            vec!["ClusterBasicInformationID", "ClusterBasicID"]
        );
    }

    #[test]
    fn element_aliases() {
        assert_eq!(
            aliases_of(Identifier::Event(ClusterId::new(0x003B), EventId::new(1))),
            vec!["ClusterSwitchEventInitialPressID"]
        );
        assert_eq!(
            aliases_of(Identifier::Attribute(ClusterId::new(0x001D), AttributeId::new(0))),
            vec![
                "ClusterDescriptorAttributeDeviceTypeListID",
                "ClusterDescriptorAttributeDeviceListID"
            ]
        );
        assert_eq!(
            aliases_of(Identifier::Attribute(ClusterId::new(0x0028), AttributeId::new(1))),
            vec![
                "ClusterBasicInformationAttributeVendorNameID",
                "ClusterBasicAttributeVendorNameID"
            ]
        );
    }

    #[test]
    fn global_attribute_aliases() {
        assert_eq!(
            aliases_of(Identifier::GlobalAttribute(AttributeId::new(0xFFFD))),
            vec!["GlobalAttributeClusterRevisionID"]
        );
    }
}
