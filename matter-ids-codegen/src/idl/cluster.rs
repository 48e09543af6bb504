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

//! Generation of the per-cluster id enums and metadata.
//!
//! In other words, simple `#[repr(u32)]` enums for the IDs of the cluster
//! attributes, commands, command responses and events, as well as the
//! `CLUSTER` metadata constant used for name lookups at runtime.

use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::quote;

use matter_ids_data_model::{ApiMaturity, Cluster};

use super::id::{idl_attribute_name_to_enum_variant_name, idl_doc_comment_to_doc};
use super::IdlGenerateContext;

/// One named code inside an id enum.
struct Entry<'a> {
    name: String,
    code: u64,
    doc_comment: Option<&'a str>,
    maturity: ApiMaturity,
}

fn attribute_entries(cluster: &Cluster) -> Vec<Entry<'_>> {
    cluster
        .attributes
        .iter()
        .map(|a| Entry {
            name: idl_attribute_name_to_enum_variant_name(&a.id),
            code: a.code,
            doc_comment: a.doc_comment.as_deref(),
            maturity: a.maturity,
        })
        .collect()
}

fn command_entries(cluster: &Cluster) -> Vec<Entry<'_>> {
    cluster
        .commands
        .iter()
        .map(|c| Entry {
            name: idl_attribute_name_to_enum_variant_name(&c.id),
            code: c.code,
            doc_comment: c.doc_comment.as_deref(),
            maturity: c.maturity,
        })
        .collect()
}

fn command_response_entries(cluster: &Cluster) -> Vec<Entry<'_>> {
    cluster
        .responses
        .iter()
        .map(|r| Entry {
            name: idl_attribute_name_to_enum_variant_name(&r.id),
            code: r.code,
            doc_comment: r.doc_comment.as_deref(),
            maturity: r.maturity,
        })
        .collect()
}

fn event_entries(cluster: &Cluster) -> Vec<Entry<'_>> {
    cluster
        .events
        .iter()
        .map(|e| Entry {
            name: idl_attribute_name_to_enum_variant_name(&e.id),
            code: e.code,
            doc_comment: e.doc_comment.as_deref(),
            maturity: e.maturity,
        })
        .collect()
}

/// Doc attributes for an element: its IDL doc comment (if any) followed by
/// a maturity marker for anything that is not stable.
pub(crate) fn doc_attributes(doc_comment: Option<&str>, maturity: ApiMaturity) -> TokenStream {
    let doc = doc_comment
        .map(idl_doc_comment_to_doc)
        .filter(|d| !d.is_empty())
        .map(|d| quote!(#[doc = #d]));

    let marker = match maturity {
        ApiMaturity::Provisional => quote!(#[doc = "provisional"]),
        ApiMaturity::Internal => quote!(#[doc = "internal"]),
        ApiMaturity::Deprecated => quote!(#[doc = "deprecated"]),
        _ => quote!(),
    };

    quote!(#doc #marker)
}

pub(crate) fn maturity(maturity: ApiMaturity, context: &IdlGenerateContext) -> TokenStream {
    let krate = context.krate();

    match maturity {
        ApiMaturity::Provisional => quote!(#krate::Maturity::Provisional),
        ApiMaturity::Internal => quote!(#krate::Maturity::Internal),
        ApiMaturity::Deprecated => quote!(#krate::Maturity::Deprecated),
        _ => quote!(#krate::Maturity::Stable),
    }
}

/// Shared shape of all generated id enums: the enum itself plus
/// conversions to and from the crate-wide typed id.
fn id_enum(
    enum_name: &str,
    typed_id: TokenStream,
    unknown: &str,
    entries: &[Entry],
    context: &IdlGenerateContext,
) -> TokenStream {
    if entries.is_empty() {
        return quote!();
    }

    let krate = context.krate();
    let enum_name = Ident::new(enum_name, Span::call_site());
    let unknown = Ident::new(unknown, Span::call_site());

    let variants = entries.iter().map(|e| {
        let doc = doc_attributes(e.doc_comment, e.maturity);
        let name = Ident::new(&e.name, Span::call_site());
        let code = Literal::u32_unsuffixed(e.code as u32);

        quote!(
            #doc
            #name = #code
        )
    });

    quote!(
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, strum::FromRepr, strum::EnumIter, strum::IntoStaticStr)]
        #[repr(u32)]
        pub enum #enum_name {
            #(#variants),*
        }

        impl From<#enum_name> for #typed_id {
            fn from(id: #enum_name) -> Self {
                Self::new(id as u32)
            }
        }

        impl core::convert::TryFrom<#typed_id> for #enum_name {
            type Error = #krate::UnknownId;

            fn try_from(id: #typed_id) -> Result<Self, Self::Error> {
                #enum_name::from_repr(id.get()).ok_or(#krate::UnknownId::#unknown(ID, id))
            }
        }
    )
}

/// Return a TokenStream containing a simple enum with variants for each
/// attribute in the given IDL cluster.
pub fn attribute_id(cluster: &Cluster, context: &IdlGenerateContext) -> TokenStream {
    let krate = context.krate();

    id_enum(
        "AttributeId",
        quote!(#krate::AttributeId),
        "Attribute",
        &attribute_entries(cluster),
        context,
    )
}

/// Return a TokenStream containing a simple enum with variants for each
/// command in the given IDL cluster.
pub fn command_id(cluster: &Cluster, context: &IdlGenerateContext) -> TokenStream {
    let krate = context.krate();

    id_enum(
        "CommandId",
        quote!(#krate::CommandId),
        "Command",
        &command_entries(cluster),
        context,
    )
}

/// Return a TokenStream containing a simple enum with variants for each
/// command response in the given IDL cluster.
pub fn command_response_id(cluster: &Cluster, context: &IdlGenerateContext) -> TokenStream {
    let krate = context.krate();

    id_enum(
        "CommandResponseId",
        quote!(#krate::CommandId),
        "CommandResponse",
        &command_response_entries(cluster),
        context,
    )
}

/// Return a TokenStream containing a simple enum with variants for each
/// event in the given IDL cluster.
pub fn event_id(cluster: &Cluster, context: &IdlGenerateContext) -> TokenStream {
    let krate = context.krate();

    id_enum(
        "EventId",
        quote!(#krate::EventId),
        "Event",
        &event_entries(cluster),
        context,
    )
}

fn element_metas(entries: &[Entry], context: &IdlGenerateContext) -> TokenStream {
    let krate = context.krate();

    let metas = entries.iter().map(|e| {
        let code = Literal::u32_unsuffixed(e.code as u32);
        let name = Literal::string(&e.name);
        let maturity = maturity(e.maturity, context);

        quote!(#krate::registry::ElementMeta::new(#code, #name, #maturity))
    });

    quote!(&[#(#metas),*])
}

/// Return a TokenStream containing a constant `CLUSTER` object of type
/// `ClusterMeta` for the given IDL cluster.
///
/// `CLUSTER` lists every element of the cluster with its code, name and
/// maturity, which is what name/number lookups need at runtime.
pub fn cluster_metadata(cluster: &Cluster, context: &IdlGenerateContext) -> TokenStream {
    let krate = context.krate();

    let revision = Literal::u64_unsuffixed(cluster.revision);
    let cluster_maturity = maturity(cluster.maturity, context);
    let attributes = element_metas(&attribute_entries(cluster), context);
    let commands = element_metas(&command_entries(cluster), context);
    let responses = element_metas(&command_response_entries(cluster), context);
    let events = element_metas(&event_entries(cluster), context);

    quote!(
        pub const CLUSTER: #krate::registry::ClusterMeta = #krate::registry::ClusterMeta {
            id: ID,
            name: NAME,
            revision: #revision,
            maturity: #cluster_maturity,
            attributes: #attributes,
            commands: #commands,
            responses: #responses,
            events: #events,
        };
    )
}
