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

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use matter_ids_codegen::{registry, IdlGenerateContext};
use matter_ids_data_model::idl::Idl;
use miette::{GraphicalReportHandler, GraphicalTheme};
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{bracketed, parse_macro_input, Ident, LitStr, Token};
use tracing::debug;

/// Environment variable naming the directory relative IDL paths resolve against.
const IDL_DIR_ENV: &str = "MATTER_IDS_IDL_DIR";

struct MatterIdsImportArgs {
    file: LitStr,
    // What clusters to import. Non-empty list if
    // a clusters argument was given
    clusters: Option<Vec<LitStr>>,
}

impl Parse for MatterIdsImportArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let file = input.parse::<LitStr>()?;

        let clusters = if input.is_empty() {
            None
        } else {
            // Remaining tokens look like `, clusters = ["OnOff", "Switch"]`
            input.parse::<Token![,]>()?;

            let name = input.parse::<Ident>()?;
            if name != "clusters" {
                return Err(syn::Error::new(
                    name.span(),
                    format!("unsupported argument: {name}"),
                ));
            }

            input.parse::<Token![=]>()?;

            let content;
            bracketed!(content in input);

            let names = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
            input.parse::<Option<Token![,]>>()?;

            Some(names.into_iter().collect())
        };

        Ok(MatterIdsImportArgs { file, clusters })
    }
}

fn get_crate_name() -> String {
    let found_crate = proc_macro_crate::crate_name("matter-ids").unwrap_or_else(|err| {
        eprintln!("Warning: defaulting to `crate` {err}");
        proc_macro_crate::FoundCrate::Itself
    });

    match found_crate {
        proc_macro_crate::FoundCrate::Itself => String::from("crate"),
        proc_macro_crate::FoundCrate::Name(name) => name,
    }
}

/// Resolves the IDL file location.
///
/// Absolute paths are used as-is. Relative paths are resolved against
/// the IDL directory if one is configured, otherwise against the manifest
/// directory of the crate invoking the macro.
fn resolve_idl_path(
    file: &str,
    idl_dir: Option<OsString>,
    manifest_dir: Option<OsString>,
) -> PathBuf {
    let file = Path::new(file);

    if file.is_absolute() {
        return file.to_path_buf();
    }

    match idl_dir.or(manifest_dir) {
        Some(dir) => PathBuf::from(dir).join(file),
        None => file.to_path_buf(),
    }
}

fn render_diagnostic(diagnostic: &dyn miette::Diagnostic) -> String {
    let mut out = String::new();

    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut out, diagnostic).is_err() {
        out = diagnostic.to_string();
    }

    out
}

fn expand(args: MatterIdsImportArgs, krate: &str) -> syn::Result<proc_macro2::TokenStream> {
    let span = args.file.span();

    let path = resolve_idl_path(
        &args.file.value(),
        std::env::var_os(IDL_DIR_ENV),
        std::env::var_os("CARGO_MANIFEST_DIR"),
    );

    debug!("Importing IDL from {}", path.display());

    let input = std::fs::read_to_string(&path).map_err(|err| {
        syn::Error::new(span, format!("failed to read {}: {err}", path.display()))
    })?;

    let name = path.to_string_lossy();

    let idl = Idl::parse_named(&name, input.as_str().into())
        .map_err(|err| syn::Error::new(span, render_diagnostic(&err)))?;

    idl.validate()
        .map_err(|err| syn::Error::new(span, render_diagnostic(&err)))?;

    let filter = match args.clusters {
        Some(names) => {
            let mut filter = HashSet::new();

            for name in names {
                if idl.find_cluster(&name.value()).is_none() {
                    return Err(syn::Error::new(
                        name.span(),
                        format!("cluster {} not found in {}", name.value(), path.display()),
                    ));
                }

                filter.insert(name.value());
            }

            Some(filter)
        }
        None => None,
    };

    let clusters = idl.clusters.iter().filter(|c| match filter {
        Some(ref v) => v.contains(&c.id),
        None => true,
    });

    let context = IdlGenerateContext::new(krate)
        .map_err(|err| syn::Error::new(span, format!("invalid crate path `{krate}`: {err}")))?;

    let tables = registry(clusters, &context);
    let path = LitStr::new(&path.to_string_lossy(), Span::call_site());

    Ok(quote!(
        // Rebuild when the IDL changes
        const _: &str = include_str!(#path);

        // IDL-generated code:
        #tables
    ))
}

/// Imports a matter IDL and generates identifier tables for it
///
/// Relative paths resolve against `MATTER_IDS_IDL_DIR` from the environment
/// when set, otherwise against the directory of the invoking crate's
/// `Cargo.toml`. Generally this means that `.cargo/config.toml` may include
/// something like `MATTER_IDS_IDL_DIR = { value="idl", relative=true }`
///
/// `idl_import!("file.matter")` imports the entire file.
///
/// `idl_import!("file.matter", clusters=["A", "B", "C"])` restricts the
/// import to the given clusters
#[proc_macro]
pub fn idl_import(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as MatterIdsImportArgs);

    expand(input, &get_crate_name())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_file_only() {
        let args: MatterIdsImportArgs = syn::parse_str(r#""clusters.matter""#).expect("valid args");

        assert_eq!(args.file.value(), "clusters.matter");
        assert!(args.clusters.is_none());
    }

    #[test]
    fn parses_cluster_filter() {
        let args: MatterIdsImportArgs =
            syn::parse_str(r#""clusters.matter", clusters = ["OnOff", "Switch",]"#)
                .expect("valid args");

        let clusters = args
            .clusters
            .expect("filter present")
            .iter()
            .map(LitStr::value)
            .collect::<Vec<_>>();

        assert_eq!(clusters, vec!["OnOff", "Switch"]);
    }

    #[rstest]
    #[case(r#""clusters.matter", endpoints = ["OnOff"]"#)]
    #[case(r#""clusters.matter" clusters = ["OnOff"]"#)]
    #[case(r#""clusters.matter", clusters = [OnOff]"#)]
    #[case("clusters")]
    fn rejects_bad_args(#[case] input: &str) {
        assert!(syn::parse_str::<MatterIdsImportArgs>(input).is_err());
    }

    #[rstest]
    #[case("a.matter", Some("/idl"), Some("/crate"), "/idl/a.matter")]
    #[case("a.matter", None, Some("/crate"), "/crate/a.matter")]
    #[case("/abs/a.matter", Some("/idl"), Some("/crate"), "/abs/a.matter")]
    #[case("a.matter", None, None, "a.matter")]
    fn idl_path_resolution(
        #[case] file: &str,
        #[case] idl_dir: Option<&str>,
        #[case] manifest_dir: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(
            resolve_idl_path(file, idl_dir.map(Into::into), manifest_dir.map(Into::into)),
            PathBuf::from(expected)
        );
    }
}
