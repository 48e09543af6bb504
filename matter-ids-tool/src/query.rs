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

//! Parsing of `lookup` queries.
//!
//! A query is either a symbol (`ClusterIDTypeOnOffID`, `MTRClusterOnOffID`)
//! or a numeric path: `<cluster>`, `<cluster>/<namespace>/<code>` or
//! `global/<code>`. Clusters may be given by name or number; numbers are
//! decimal or `0x` hexadecimal.

use matter_ids::registry;
use matter_ids::symbol::{self, Resolution};
use matter_ids::{AttributeId, ClusterId, CommandId, EventId, Identifier};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown symbol or cluster `{0}`")]
    Unknown(String),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("unknown namespace `{0}`, expected one of attribute, command, response, event")]
    InvalidNamespace(String),
    #[error("malformed query `{0}`, expected <cluster>[/<namespace>/<code>] or global/<code>")]
    Malformed(String),
}

/// A resolved query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// A symbol, canonical or deprecated.
    Symbol(Resolution),
    /// A numeric path. The identifier may not exist in the tables.
    Path(Identifier),
}

impl Query {
    pub fn identifier(&self) -> Identifier {
        match self {
            Self::Symbol(resolution) => resolution.identifier,
            Self::Path(identifier) => *identifier,
        }
    }
}

pub fn parse_number(s: &str) -> Result<u32, QueryError> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };

    parsed.map_err(|_| QueryError::InvalidNumber(s.into()))
}

/// A cluster given by number or by name.
pub fn parse_cluster(s: &str) -> Result<ClusterId, QueryError> {
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        return parse_number(s).map(ClusterId::new);
    }

    registry::cluster_by_name(s)
        .map(|c| c.id)
        .ok_or_else(|| QueryError::Unknown(s.into()))
}

pub fn parse_query(query: &str) -> Result<Query, QueryError> {
    let query = query.trim();

    if let Some(resolution) = symbol::resolve(query) {
        return Ok(Query::Symbol(resolution));
    }

    let parts = query.split('/').collect::<Vec<_>>();

    let identifier = match parts.as_slice() {
        [cluster] => Identifier::Cluster(parse_cluster(cluster)?),
        ["global", code] => Identifier::GlobalAttribute(AttributeId::new(parse_number(code)?)),
        [cluster, namespace, code] => {
            let cluster = parse_cluster(cluster)?;
            let code = parse_number(code)?;

            match namespace.to_ascii_lowercase().as_str() {
                "attribute" | "a" => Identifier::Attribute(cluster, AttributeId::new(code)),
                "command" | "c" => Identifier::Command(cluster, CommandId::new(code)),
                "response" | "r" => Identifier::CommandResponse(cluster, CommandId::new(code)),
                "event" | "e" => Identifier::Event(cluster, EventId::new(code)),
                _ => return Err(QueryError::InvalidNamespace((*namespace).into())),
            }
        }
        _ => return Err(QueryError::Malformed(query.into())),
    };

    Ok(Query::Path(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matter_ids::symbol::Availability;
    use rstest::rstest;

    #[rstest]
    #[case("6", 6)]
    #[case("0x3B", 0x3B)]
    #[case("0XFFFD", 0xFFFD)]
    #[case("4294967295", u32::MAX)]
    fn numbers(#[case] input: &str, #[case] expected: u32) {
        assert_eq!(parse_number(input), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("0x")]
    #[case("4294967296")]
    #[case("-1")]
    #[case("0xZZ")]
    fn bad_numbers(#[case] input: &str) {
        assert_eq!(parse_number(input), Err(QueryError::InvalidNumber(input.into())));
    }

    #[rstest]
    #[case("6", Identifier::Cluster(ClusterId::new(6)))]
    #[case("onoff", Identifier::Cluster(ClusterId::new(6)))]
    #[case(
        "OnOff/attribute/0x4003",
        Identifier::Attribute(ClusterId::new(6), AttributeId::new(0x4003))
    )]
    #[case(
        "0x4/response/0",
        Identifier::CommandResponse(ClusterId::new(4), CommandId::new(0))
    )]
    #[case(
        "Switch/e/1",
        Identifier::Event(ClusterId::new(0x3B), EventId::new(1))
    )]
    #[case(
        "global/0xFFFC",
        Identifier::GlobalAttribute(AttributeId::new(0xFFFC))
    )]
    #[case(
        "0xFFF1FC00/command/1",
        Identifier::Command(ClusterId::new(0xFFF1_FC00), CommandId::new(1))
    )]
    fn paths(#[case] input: &str, #[case] expected: Identifier) {
        assert_eq!(parse_query(input), Ok(Query::Path(expected)));
    }

    #[test]
    fn symbols() {
        let query = parse_query(" MTRClusterOnOffID ").expect("valid query");

        assert_eq!(query.identifier(), Identifier::Cluster(ClusterId::new(6)));
        assert!(matches!(
            query,
            Query::Symbol(Resolution {
                availability: Availability::Deprecated { .. },
                ..
            })
        ));
    }

    #[rstest]
    #[case("NoSuchCluster", QueryError::Unknown("NoSuchCluster".into()))]
    #[case("OnOff/field/1", QueryError::InvalidNamespace("field".into()))]
    #[case("OnOff/attribute", QueryError::Malformed("OnOff/attribute".into()))]
    #[case("OnOff/attribute/x", QueryError::InvalidNumber("x".into()))]
    fn bad_queries(#[case] input: &str, #[case] expected: QueryError) {
        assert_eq!(parse_query(input), Err(expected));
    }
}
