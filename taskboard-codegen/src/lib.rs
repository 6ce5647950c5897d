/*
 *     Copyright (C) 2023  Fritz Ochsmann
 *
 *     This program is free software: you can redistribute it and/or modify
 *     it under the terms of the GNU Affero General Public License as published
 *     by the Free Software Foundation, either version 3 of the License, or
 *     (at your option) any later version.
 *
 *     This program is distributed in the hope that it will be useful,
 *     but WITHOUT ANY WARRANTY; without even the implied warranty of
 *     MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *     GNU Affero General Public License for more details.
 *
 *     You should have received a copy of the GNU Affero General Public License
 *     along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

#[macro_use]
extern crate quote;
extern crate darling;

use darling::{FromDeriveInput, FromField};
use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput, Path, Type};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(writer))]
struct DataWriterOptions {
    name: Option<String>,
    validate: Option<Path>,
}

#[derive(Debug, FromField)]
#[darling(attributes(writer))]
struct DataWriterFieldOptions {
    #[darling(default)]
    skip: bool,
    rename: Option<String>,
}

/// Generates a `Write{Name}` builder for an entity. Every non-skipped field becomes an optional
/// value which is only serialized when set, so the same builder serves as the full body of a
/// create and as the partial body of a patch. Awaiting the builder creates a new entity through
/// the borrowed cache, or patches the entity named by `target`.
#[proc_macro_derive(DataWriter, attributes(writer))]
pub fn data_writer_macro_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let input_ident = &input.ident;
    let options = match DataWriterOptions::from_derive_input(&input) {
        Ok(options) => options,
        Err(error) => return error.write_errors().into(),
    };

    let writer_ident = match options.name {
        Some(name) => format_ident!("{}", name),
        None => format_ident!("Write{}", input_ident),
    };

    // parse the struct data
    let fields = match input.data {
        Data::Struct(ref data) => data.fields.clone(),
        _ => {
            return syn::Error::new_spanned(&input.ident, "DataWriter expects a struct")
                .to_compile_error()
                .into()
        }
    };

    let mut field_names = Vec::<syn::Ident>::new();
    let mut field_types = Vec::<Type>::new();
    let mut field_renames = Vec::<proc_macro2::TokenStream>::new();

    for field in fields.into_iter() {
        let options = match DataWriterFieldOptions::from_field(&field) {
            Ok(options) => options,
            Err(error) => return error.write_errors().into(),
        };

        if options.skip {
            continue;
        }

        let Some(ident) = field.ident else {
            return syn::Error::new_spanned(&field.ty, "DataWriter expects named fields")
                .to_compile_error()
                .into();
        };

        field_renames.push(match options.rename {
            Some(rename) => quote! { #[serde(rename = #rename)] },
            None => quote! {},
        });
        field_names.push(ident);
        field_types.push(field.ty);
    }

    let validate = match options.validate {
        Some(path) => quote! {
            fn validate(&self) -> crate::error::Result<()> {
                #path(self)
            }
        },
        None => quote! {},
    };

    let expanded = quote! {
        #[derive(Clone, ::serde::Serialize, ::getset::Getters, ::getset::Setters)]
        #[get = "pub"]
        #[set = "pub"]
        pub struct #writer_ident<'a> {
            #(
                #[serde(skip_serializing_if = "Option::is_none")]
                #field_renames
                #field_names: Option<#field_types>,
            )*
            #[serde(skip)]
            cache: &'a crate::cache::EntityCache<#input_ident>,
            #[serde(skip)]
            target: Option<i64>,
        }

        impl<'a> From<&'a crate::cache::EntityCache<#input_ident>> for #writer_ident<'a> {
            fn from(cache: &'a crate::cache::EntityCache<#input_ident>) -> Self {
                Self {
                    cache,
                    target: None,
                    #(
                        #field_names: None,
                    )*
                }
            }
        }

        impl<'a> crate::cache::Validate for #writer_ident<'a> {
            #validate
        }

        impl<'a> std::future::IntoFuture for #writer_ident<'a> {
            type Output = crate::error::Result<#input_ident>;
            type IntoFuture = std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + Send + 'a>>;

            #[::tracing::instrument(skip_all)]
            fn into_future(self) -> Self::IntoFuture {
                Box::pin(async move {
                    let cache = self.cache;

                    match self.target {
                        Some(id) => cache.update(id, &self).await,
                        None => cache.create(&self).await,
                    }
                })
            }
        }
    };

    expanded.into()
}
