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

//! Attributes and fields whose ids are shared by every cluster.

use strum::{EnumIter, FromRepr, IntoEnumIterator, IntoStaticStr};

use crate::AttributeId;

/// The field id of the fabric index in fabric-scoped structs and events.
pub const FABRIC_INDEX_FIELD_ID: u32 = 0xFE;

/// Attributes every cluster carries, with the same id in each of them.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr, EnumIter, IntoStaticStr,
)]
#[repr(u32)]
pub enum GlobalAttribute {
    GeneratedCommandList = 0xFFF8,
    AcceptedCommandList = 0xFFF9,
    EventList = 0xFFFA,
    AttributeList = 0xFFFB,
    FeatureMap = 0xFFFC,
    ClusterRevision = 0xFFFD,
}

impl GlobalAttribute {
    pub const fn id(self) -> AttributeId {
        AttributeId::new(self as u32)
    }

    pub fn from_id(id: AttributeId) -> Option<Self> {
        Self::from_repr(id.get())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|g| g.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl From<GlobalAttribute> for AttributeId {
    fn from(attr: GlobalAttribute) -> Self {
        attr.id()
    }
}

/// Return `true` if the attribute id is a global one.
pub fn is_global(id: AttributeId) -> bool {
    GlobalAttribute::from_id(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(GlobalAttribute::GeneratedCommandList, 0xFFF8)]
    #[case(GlobalAttribute::AcceptedCommandList, 0xFFF9)]
    #[case(GlobalAttribute::EventList, 0xFFFA)]
    #[case(GlobalAttribute::AttributeList, 0xFFFB)]
    #[case(GlobalAttribute::FeatureMap, 0xFFFC)]
    #[case(GlobalAttribute::ClusterRevision, 0xFFFD)]
    fn global_attribute_ids(#[case] attr: GlobalAttribute, #[case] code: u32) {
        assert_eq!(attr.id().get(), code);
        assert_eq!(GlobalAttribute::from_id(AttributeId::new(code)), Some(attr));
        assert_eq!(GlobalAttribute::from_name(attr.name()), Some(attr));
    }

    #[test]
    fn only_global_ids_are_global() {
        assert!(is_global(AttributeId::new(0xFFFD)));
        assert!(!is_global(AttributeId::new(0)));
        assert!(!is_global(AttributeId::new(FABRIC_INDEX_FIELD_ID)));
        assert!(!is_global(AttributeId::new(0xFFFE)));
    }

    #[test]
    fn names_match_variants() {
        assert_eq!(GlobalAttribute::ClusterRevision.name(), "ClusterRevision");
        assert_eq!(
            GlobalAttribute::from_name("featureMap"),
            Some(GlobalAttribute::FeatureMap)
        );
        assert_eq!(GlobalAttribute::iter().count(), 6);
    }
}
