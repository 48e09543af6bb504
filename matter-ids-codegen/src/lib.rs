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

//! Generation of Rust identifier tables from a parsed Matter IDL.
//!
//! The entry point is [`idl::registry`], which turns every cluster of an
//! [`matter_ids_data_model::idl::Idl`] into a module of `#[repr(u32)]` id
//! enums plus a static metadata table usable for name lookups.

pub mod idl;

pub use idl::{cluster_module, registry, IdlGenerateContext};
