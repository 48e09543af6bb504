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

use convert_case::{Case, Casing};

/// Converts an idl name (like `OnOff` or `kFoo`) into a name suitable for
/// constants based on rust guidelines
///
/// Examples:
///
/// ```
/// use matter_ids_codegen::idl::idl_id_to_constant_name;
///
/// assert_eq!(idl_id_to_constant_name("kAbc"), "ABC");
/// assert_eq!(idl_id_to_constant_name("OnOff"), "ON_OFF");
/// assert_eq!(idl_id_to_constant_name("ThisIsATest"), "THIS_IS_A_TEST");
/// ```
pub fn idl_id_to_constant_name(s: &str) -> String {
    let str = s.strip_prefix('k').unwrap_or(s).to_case(Case::UpperSnake);
    match str.chars().next() {
        Some(c) if c.is_alphabetic() => str,
        _ => format!("C{}", str),
    }
}

/// Converts a cluster name into the name of the module holding its ids.
///
/// Examples:
///
/// ```
/// use matter_ids_codegen::idl::idl_cluster_name_to_module_name;
///
/// assert_eq!(idl_cluster_name_to_module_name("OnOff"), "on_off");
/// assert_eq!(idl_cluster_name_to_module_name("BasicInformation"), "basic_information");
/// ```
pub fn idl_cluster_name_to_module_name(s: &str) -> String {
    s.to_case(Case::Snake)
}

/// Converts an element name into an enum variant name by upper-casing the
/// first character only, so `uniqueID` becomes `UniqueID` and `NOCs` stays
/// as is.
///
/// Examples:
///
/// ```
/// use matter_ids_codegen::idl::idl_attribute_name_to_enum_variant_name;
///
/// assert_eq!(idl_attribute_name_to_enum_variant_name("onOff"), "OnOff");
/// assert_eq!(idl_attribute_name_to_enum_variant_name("NOCs"), "NOCs");
/// assert_eq!(idl_attribute_name_to_enum_variant_name(""), "");
/// ```
pub fn idl_attribute_name_to_enum_variant_name(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Normalizes an IDL doc comment into a single-line doc string.
///
/// Leading `*` decorations of multi-line comments are dropped.
///
/// ```
/// use matter_ids_codegen::idl::idl_doc_comment_to_doc;
///
/// assert_eq!(idl_doc_comment_to_doc(" Something\n   * happened "), "Something happened");
/// ```
pub fn idl_doc_comment_to_doc(s: &str) -> String {
    s.lines()
        .map(|l| l.trim().trim_start_matches('*'))
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
