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

//! Symbolic names of identifiers.
//!
//! Every identifier has one canonical symbol:
//!
//! | Identifier | Symbol |
//! |------------|--------|
//! | cluster | `ClusterIDType{Cluster}ID` |
//! | attribute | `AttributeIDTypeCluster{Cluster}Attribute{Attribute}ID` |
//! | global attribute | `AttributeIDTypeGlobalAttribute{Attribute}ID` |
//! | command, command response | `CommandIDTypeCluster{Cluster}Command{Command}ID` |
//! | event | `EventIDTypeCluster{Cluster}Event{Event}ID` |
//!
//! Symbols may carry an `MTR` prefix. Deprecated names from [`crate::legacy`]
//! resolve too, together with their canonical replacement.
//!
//! ```
//! use matter_ids::symbol::{resolve, Availability};
//! use matter_ids::Identifier;
//!
//! let on_off = resolve("ClusterIDTypeOnOffID").unwrap();
//! assert_eq!(on_off.identifier.value(), 0x0006);
//! assert_eq!(on_off.availability, Availability::Current);
//!
//! let legacy = resolve("MTRClusterOnOffID").unwrap();
//! assert_eq!(legacy.identifier, on_off.identifier);
//! assert!(legacy.availability.is_deprecated());
//!
//! let parsed: Identifier = "AttributeIDTypeClusterOnOffAttributeOnOffID".parse().unwrap();
//! assert_eq!(parsed.value(), 0x0000);
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::{debug, warn};

use crate::registry::{self, Description};
use crate::{legacy, Identifier};

/// Optional prefix of every symbol.
pub const SYMBOL_PREFIX: &str = "MTR";

/// Whether a symbol is the current name of its element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Availability {
    Current,
    Deprecated { replacement: String },
}

impl Availability {
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::Deprecated { .. })
    }
}

/// The element a symbol names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub identifier: Identifier,
    pub availability: Availability,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("unknown symbol {0}")]
    Unknown(String),
}

fn canonical_symbol(description: &Description) -> String {
    let cluster = description.cluster.map(|c| c.name).unwrap_or_default();
    let name = description.name;

    match description.identifier {
        Identifier::Cluster(_) => format!("ClusterIDType{name}ID"),
        Identifier::Attribute(..) => format!("AttributeIDTypeCluster{cluster}Attribute{name}ID"),
        Identifier::GlobalAttribute(_) => format!("AttributeIDTypeGlobalAttribute{name}ID"),
        Identifier::Command(..) | Identifier::CommandResponse(..) => {
            format!("CommandIDTypeCluster{cluster}Command{name}ID")
        }
        Identifier::Event(..) => format!("EventIDTypeCluster{cluster}Event{name}ID"),
    }
}

static SYMBOLS: Lazy<HashMap<String, Resolution>> = Lazy::new(|| {
    let descriptions = registry::identifiers()
        .filter_map(|identifier| registry::describe(identifier).ok())
        .collect::<Vec<_>>();

    let mut symbols = HashMap::new();

    for description in &descriptions {
        let symbol = canonical_symbol(description);
        let resolution = Resolution {
            identifier: description.identifier,
            availability: Availability::Current,
        };

        if let Some(previous) = symbols.insert(symbol.clone(), resolution) {
            warn!(
                "Symbol {} names both {} and {}",
                symbol, previous.identifier, description.identifier
            );
        }
    }

    // Deprecated names never shadow a canonical one
    for description in &descriptions {
        let replacement = canonical_symbol(description);

        for alias in legacy::aliases(description) {
            symbols.entry(alias).or_insert_with(|| Resolution {
                identifier: description.identifier,
                availability: Availability::Deprecated {
                    replacement: replacement.clone(),
                },
            });
        }
    }

    debug!(
        "Symbol table: {} symbols for {} identifiers",
        symbols.len(),
        descriptions.len()
    );

    symbols
});

/// The canonical symbol of a known identifier.
pub fn canonical(identifier: Identifier) -> Option<String> {
    registry::describe(identifier)
        .ok()
        .map(|description| canonical_symbol(&description))
}

/// Resolves a canonical or deprecated symbol, with or without the
/// [`SYMBOL_PREFIX`].
pub fn resolve(symbol: &str) -> Option<Resolution> {
    SYMBOLS
        .get(symbol)
        .or_else(|| {
            symbol
                .strip_prefix(SYMBOL_PREFIX)
                .and_then(|unprefixed| SYMBOLS.get(unprefixed))
        })
        .cloned()
}

/// All known symbols, canonical and deprecated, in no particular order.
pub fn symbols() -> impl Iterator<Item = (&'static str, &'static Resolution)> {
    Lazy::force(&SYMBOLS)
        .iter()
        .map(|(symbol, resolution)| (symbol.as_str(), resolution))
}

impl FromStr for Identifier {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
            .map(|resolution| resolution.identifier)
            .ok_or_else(|| SymbolError::Unknown(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clusters::{groups, on_off, switch};
    use crate::{AttributeId, ClusterId, CommandId, EventId, GlobalAttribute};
    use rstest::rstest;

    #[rstest]
    #[case("ClusterIDTypeOnOffID", Identifier::Cluster(ClusterId::new(0x0006)))]
    #[case("ClusterIDTypeAccessControlID", Identifier::Cluster(ClusterId::new(0x001F)))]
    #[case(
        "AttributeIDTypeClusterOnOffAttributeOnOffID",
        Identifier::Attribute(ClusterId::new(0x0006), AttributeId::new(0x0000))
    )]
    #[case(
        "CommandIDTypeClusterOnOffCommandOnID",
        Identifier::Command(ClusterId::new(0x0006), CommandId::new(0x0001))
    )]
    #[case(
        "EventIDTypeClusterSwitchEventInitialPressID",
        Identifier::Event(ClusterId::new(0x003B), EventId::new(0x0001))
    )]
    #[case(
        "CommandIDTypeClusterGroupsCommandAddGroupResponseID",
        Identifier::CommandResponse(ClusterId::new(0x0004), CommandId::new(0x0000))
    )]
    #[case(
        "AttributeIDTypeGlobalAttributeClusterRevisionID",
        Identifier::GlobalAttribute(AttributeId::new(0xFFFD))
    )]
    fn canonical_symbols(#[case] symbol: &str, #[case] identifier: Identifier) {
        assert_eq!(
            resolve(symbol),
            Some(Resolution {
                identifier,
                availability: Availability::Current
            })
        );
        assert_eq!(canonical(identifier).as_deref(), Some(symbol));
    }

    #[rstest]
    #[case("ClusterOnOffID", "ClusterIDTypeOnOffID")]
    #[case("MTRClusterBasicID", "ClusterIDTypeBasicInformationID")]
    #[case(
        "ClusterDescriptorAttributeDeviceListID",
        "AttributeIDTypeClusterDescriptorAttributeDeviceTypeListID"
    )]
    #[case(
        "ClusterSwitchEventInitialPressID",
        "EventIDTypeClusterSwitchEventInitialPressID"
    )]
    #[case(
        "GlobalAttributeFeatureMapID",
        "AttributeIDTypeGlobalAttributeFeatureMapID"
    )]
    fn deprecated_symbols(#[case] symbol: &str, #[case] replacement: &str) {
        let resolution = resolve(symbol).expect("known symbol");
        let current = resolve(replacement).expect("known symbol");

        assert_eq!(resolution.identifier, current.identifier);
        assert_eq!(
            resolution.availability,
            Availability::Deprecated {
                replacement: replacement.into()
            }
        );
    }

    #[test]
    fn generated_constants_match_symbols() {
        assert_eq!(
            resolve("ClusterIDTypeOnOffID").map(|r| r.identifier),
            Some(Identifier::Cluster(on_off::ID))
        );
        assert_eq!(
            "CommandIDTypeClusterGroupsCommandAddGroupResponseID".parse::<Identifier>(),
            Ok(Identifier::CommandResponse(
                groups::ID,
                groups::CommandResponseId::AddGroupResponse.into()
            ))
        );
        assert_eq!(
            "EventIDTypeClusterSwitchEventInitialPressID".parse::<Identifier>(),
            Ok(Identifier::Event(
                switch::ID,
                switch::EventId::InitialPress.into()
            ))
        );
    }

    #[rstest]
    #[case("")]
    #[case("MTR")]
    #[case("ClusterIDTypeNoSuchClusterID")]
    #[case("AttributeIDTypeClusterOnOffAttributeNoSuchAttributeID")]
    #[case("clusteridtypeonoffid")]
    fn unknown_symbols(#[case] symbol: &str) {
        assert!(resolve(symbol).is_none());
        assert_eq!(
            symbol.parse::<Identifier>(),
            Err(SymbolError::Unknown(symbol.into()))
        );
    }

    #[test]
    fn unknown_identifiers_have_no_symbol() {
        assert!(canonical(Identifier::Cluster(ClusterId::new(0xFFF1_FC00))).is_none());
        assert!(canonical(Identifier::Event(on_off::ID, EventId::new(0))).is_none());
    }

    #[test]
    fn global_attributes_also_have_cluster_scoped_symbols() {
        assert_eq!(
            resolve("AttributeIDTypeClusterOnOffAttributeClusterRevisionID").map(|r| r.identifier),
            Some(Identifier::Attribute(
                on_off::ID,
                GlobalAttribute::ClusterRevision.id()
            ))
        );
    }
}
