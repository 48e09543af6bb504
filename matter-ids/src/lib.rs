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

//! Numeric identifiers of the Matter data model.
//!
//! Cluster ids are global, while attribute, command and event ids are only
//! meaningful inside the cluster that defines them. The tables in
//! [`clusters`] are generated at build time from the bundled Matter IDL,
//! one module per cluster:
//!
//! ```
//! use matter_ids::clusters::{on_off, switch};
//! use matter_ids::{AttributeId, ClusterId, EventId};
//!
//! assert_eq!(on_off::ID, ClusterId::new(0x0006));
//! assert_eq!(AttributeId::from(on_off::AttributeId::OnOff).get(), 0x0000);
//! assert_eq!(EventId::from(switch::EventId::InitialPress).get(), 0x0001);
//! ```
//!
//! Symbolic names, including deprecated ones, resolve through [`symbol`].

pub use global::GlobalAttribute;
pub use ids::*;
pub use registry::Maturity;

pub mod clusters;
pub mod global;
pub mod legacy;
pub mod registry;
pub mod symbol;

mod ids;
