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

//! Name and number lookups over the generated tables.

use core::fmt;

use strum::IntoEnumIterator;

use crate::clusters::CLUSTERS;
use crate::{
    AttributeId, ClusterId, CommandId, EventId, GlobalAttribute, Identifier, Namespace, UnknownId,
};

/// How settled the definition of an element is.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Maturity {
    #[default]
    Stable,
    Provisional,
    Internal,
    Deprecated,
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::Provisional => write!(f, "provisional"),
            Self::Internal => write!(f, "internal"),
            Self::Deprecated => write!(f, "deprecated"),
        }
    }
}

/// A single attribute, command, command response or event of a cluster.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ElementMeta {
    pub code: u32,
    pub name: &'static str,
    pub maturity: Maturity,
}

impl ElementMeta {
    pub const fn new(code: u32, name: &'static str, maturity: Maturity) -> Self {
        Self {
            code,
            name,
            maturity,
        }
    }
}

fn by_code(elements: &'static [ElementMeta], code: u32) -> Option<&'static ElementMeta> {
    elements.iter().find(|e| e.code == code)
}

fn by_name(elements: &'static [ElementMeta], name: &str) -> Option<&'static ElementMeta> {
    elements.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}

/// Everything the generated tables know about one cluster.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClusterMeta {
    pub id: ClusterId,
    pub name: &'static str,
    pub revision: u16,
    pub maturity: Maturity,
    pub attributes: &'static [ElementMeta],
    pub commands: &'static [ElementMeta],
    pub responses: &'static [ElementMeta],
    pub events: &'static [ElementMeta],
}

impl ClusterMeta {
    pub fn attribute(&self, id: AttributeId) -> Option<&'static ElementMeta> {
        by_code(self.attributes, id.get())
    }

    pub fn attribute_by_name(&self, name: &str) -> Option<&'static ElementMeta> {
        by_name(self.attributes, name)
    }

    pub fn command(&self, id: CommandId) -> Option<&'static ElementMeta> {
        by_code(self.commands, id.get())
    }

    pub fn command_by_name(&self, name: &str) -> Option<&'static ElementMeta> {
        by_name(self.commands, name)
    }

    pub fn response(&self, id: CommandId) -> Option<&'static ElementMeta> {
        by_code(self.responses, id.get())
    }

    pub fn response_by_name(&self, name: &str) -> Option<&'static ElementMeta> {
        by_name(self.responses, name)
    }

    pub fn event(&self, id: EventId) -> Option<&'static ElementMeta> {
        by_code(self.events, id.get())
    }

    pub fn event_by_name(&self, name: &str) -> Option<&'static ElementMeta> {
        by_name(self.events, name)
    }

    /// The elements of one namespace. Empty for [`Namespace::Cluster`].
    pub fn elements(&self, namespace: Namespace) -> &'static [ElementMeta] {
        match namespace {
            Namespace::Cluster => &[],
            Namespace::Attribute => self.attributes,
            Namespace::Command => self.commands,
            Namespace::CommandResponse => self.responses,
            Namespace::Event => self.events,
        }
    }

    /// The cluster itself followed by every element it defines.
    pub fn identifiers(&self) -> impl Iterator<Item = Identifier> {
        let id = self.id;

        core::iter::once(Identifier::Cluster(id))
            .chain(
                self.attributes
                    .iter()
                    .map(move |e| Identifier::Attribute(id, AttributeId::new(e.code))),
            )
            .chain(
                self.commands
                    .iter()
                    .map(move |e| Identifier::Command(id, CommandId::new(e.code))),
            )
            .chain(
                self.responses
                    .iter()
                    .map(move |e| Identifier::CommandResponse(id, CommandId::new(e.code))),
            )
            .chain(
                self.events
                    .iter()
                    .map(move |e| Identifier::Event(id, EventId::new(e.code))),
            )
    }
}

/// All known clusters, ordered by id.
pub fn clusters() -> &'static [ClusterMeta] {
    CLUSTERS
}

pub fn cluster(id: ClusterId) -> Option<&'static ClusterMeta> {
    CLUSTERS
        .binary_search_by_key(&id, |c| c.id)
        .ok()
        .map(|index| &CLUSTERS[index])
}

/// Looks a cluster up by name, ignoring ASCII case.
pub fn cluster_by_name(name: &str) -> Option<&'static ClusterMeta> {
    CLUSTERS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Every known identifier: all clusters with their elements, then the
/// global attributes.
pub fn identifiers() -> impl Iterator<Item = Identifier> {
    CLUSTERS.iter().flat_map(ClusterMeta::identifiers).chain(
        GlobalAttribute::iter().map(|attr| Identifier::GlobalAttribute(attr.id())),
    )
}

/// The names behind a known identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Description {
    pub identifier: Identifier,
    /// The cluster the identifier names or belongs to. `None` for global
    /// attributes.
    pub cluster: Option<&'static ClusterMeta>,
    pub name: &'static str,
    pub maturity: Maturity,
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.identifier, self.cluster) {
            (Identifier::Cluster(id), _) => write!(f, "cluster {} ({id})", self.name),
            (identifier, Some(cluster)) => write!(
                f,
                "{} {}::{} (0x{:08X})",
                identifier.namespace(),
                cluster.name,
                self.name,
                identifier.value()
            ),
            (identifier, None) => write!(
                f,
                "global attribute {} (0x{:08X})",
                self.name,
                identifier.value()
            ),
        }
    }
}

fn global_element(id: AttributeId) -> Option<ElementMeta> {
    GlobalAttribute::from_id(id).map(|attr| ElementMeta::new(id.get(), attr.name(), Maturity::Stable))
}

/// Resolves an identifier to its names.
///
/// Global attributes resolve in every cluster, even when the cluster
/// definition does not list them.
pub fn describe(identifier: Identifier) -> Result<Description, UnknownId> {
    let describe_element = |cluster: &'static ClusterMeta, element: ElementMeta| Description {
        identifier,
        cluster: Some(cluster),
        name: element.name,
        maturity: element.maturity,
    };

    let known_cluster = |id: ClusterId| cluster(id).ok_or(UnknownId::Cluster(id));

    match identifier {
        Identifier::Cluster(id) => {
            let cluster = known_cluster(id)?;

            Ok(Description {
                identifier,
                cluster: Some(cluster),
                name: cluster.name,
                maturity: cluster.maturity,
            })
        }
        Identifier::GlobalAttribute(id) => global_element(id)
            .map(|element| Description {
                identifier,
                cluster: None,
                name: element.name,
                maturity: element.maturity,
            })
            .ok_or(UnknownId::GlobalAttribute(id)),
        Identifier::Attribute(cluster_id, id) => {
            let cluster = known_cluster(cluster_id)?;

            cluster
                .attribute(id)
                .copied()
                .or_else(|| global_element(id))
                .map(|element| describe_element(cluster, element))
                .ok_or(UnknownId::Attribute(cluster_id, id))
        }
        Identifier::Command(cluster_id, id) => {
            let cluster = known_cluster(cluster_id)?;

            cluster
                .command(id)
                .map(|element| describe_element(cluster, *element))
                .ok_or(UnknownId::Command(cluster_id, id))
        }
        Identifier::CommandResponse(cluster_id, id) => {
            let cluster = known_cluster(cluster_id)?;

            cluster
                .response(id)
                .map(|element| describe_element(cluster, *element))
                .ok_or(UnknownId::CommandResponse(cluster_id, id))
        }
        Identifier::Event(cluster_id, id) => {
            let cluster = known_cluster(cluster_id)?;

            cluster
                .event(id)
                .map(|element| describe_element(cluster, *element))
                .ok_or(UnknownId::Event(cluster_id, id))
        }
    }
}
