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

use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::quote;
use syn::Path;
use tracing::debug;

use matter_ids_data_model::Cluster;

pub mod cluster;
pub mod id;

pub use id::*;

/// Some context data for IDL generation
///
/// Generated code refers to the typed ids and registry types of the
/// identifier crate, hence the path of that crate is provided.
/// Use `crate` when expanding inside the identifier crate itself.
pub struct IdlGenerateContext {
    ids_crate: Path,
}

impl IdlGenerateContext {
    /// Creates a context from the path of the identifier crate, such as
    /// `crate`, `matter_ids` or `::matter_ids`.
    ///
    /// Fails if `ids_crate` is not a Rust path (a package name like
    /// `matter-ids` is not).
    pub fn new(ids_crate: impl AsRef<str>) -> syn::Result<Self> {
        Ok(Self {
            ids_crate: syn::parse_str(ids_crate.as_ref())?,
        })
    }

    pub(crate) fn krate(&self) -> &Path {
        &self.ids_crate
    }

    /// Whether the generated code lands inside the identifier crate itself.
    ///
    /// Only then may it add inherent items to the identifier types.
    pub fn is_ids_crate(&self) -> bool {
        self.ids_crate.leading_colon.is_none()
            && self.ids_crate.segments.len() == 1
            && self.ids_crate.segments[0].ident == "crate"
    }
}

/// Generates the module holding every identifier of a single cluster.
///
/// The module is named after the cluster (`OnOff` becomes `on_off`) and
/// contains the `ID` and `NAME` constants, one id enum per non-empty
/// namespace and the `CLUSTER` metadata constant.
///
/// The cluster is expected to have passed `Idl::validate`: codes are
/// emitted as `u32`.
pub fn cluster_module(cluster: &Cluster, context: &IdlGenerateContext) -> TokenStream {
    let krate = context.krate();

    let module_name = Ident::new(
        &idl_cluster_name_to_module_name(&cluster.id),
        Span::call_site(),
    );
    let cluster_code = Literal::u32_unsuffixed(cluster.code as u32);
    let cluster_name = Literal::string(&cluster.id);
    let doc = cluster::doc_attributes(cluster.doc_comment.as_deref(), cluster.maturity);

    let attribute_id = cluster::attribute_id(cluster, context);
    let command_id = cluster::command_id(cluster, context);
    let command_response_id = cluster::command_response_id(cluster, context);
    let event_id = cluster::event_id(cluster, context);
    let metadata = cluster::cluster_metadata(cluster, context);

    quote!(
        #doc
        pub mod #module_name {
            pub const ID: #krate::ClusterId = #krate::ClusterId::new(#cluster_code);
            pub const NAME: &str = #cluster_name;

            #attribute_id

            #command_id

            #command_response_id

            #event_id

            #metadata
        }
    )
}

/// Generates the complete identifier tables for a set of clusters.
///
/// Besides one module per cluster, this emits:
/// - a `cluster_ids` module with one constant per cluster
///   (`cluster_ids::ON_OFF`)
/// - the `CLUSTERS` static listing the metadata of every cluster, ordered by
///   cluster code
///
/// Inside the identifier crate itself the constants are also made
/// available as `ClusterId` associated constants (`ClusterId::ON_OFF`).
pub fn registry<'a>(
    clusters: impl IntoIterator<Item = &'a Cluster>,
    context: &IdlGenerateContext,
) -> TokenStream {
    let krate = context.krate();

    let mut clusters = clusters.into_iter().collect::<Vec<_>>();
    clusters.sort_by_key(|c| c.code);

    debug!("Generating identifier tables for {} clusters", clusters.len());

    let modules = clusters.iter().map(|c| cluster_module(c, context));

    let constants = clusters
        .iter()
        .map(|c| {
            let doc = format!("The {} cluster", c.id);
            let name = Ident::new(&idl_id_to_constant_name(&c.id), Span::call_site());
            let module_name =
                Ident::new(&idl_cluster_name_to_module_name(&c.id), Span::call_site());

            (doc, name, module_name)
        })
        .collect::<Vec<_>>();

    let free_constants = constants.iter().map(|(doc, name, module_name)| {
        quote!(
            #[doc = #doc]
            pub const #name: #krate::ClusterId = super::#module_name::ID;
        )
    });

    let associated_constants = if context.is_ids_crate() {
        let constants = constants.iter().map(|(doc, name, module_name)| {
            quote!(
                #[doc = #doc]
                pub const #name: Self = #module_name::ID;
            )
        });

        quote!(
            impl #krate::ClusterId {
                #(#constants)*
            }
        )
    } else {
        quote!()
    };

    let metas = clusters.iter().map(|c| {
        let module_name = Ident::new(&idl_cluster_name_to_module_name(&c.id), Span::call_site());

        quote!(#module_name::CLUSTER)
    });

    quote!(
        #(#modules)*

        /// The id of every cluster, by constant name.
        pub mod cluster_ids {
            #(#free_constants)*
        }

        #associated_constants

        pub static CLUSTERS: &[#krate::registry::ClusterMeta] = &[#(#metas),*];
    )
}
