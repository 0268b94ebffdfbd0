//! Derive macro exposing a struct's declared shape to `entity-sql-core`.
//!
//! This crate provides `#[derive(Entity)]`, which lets a struct be turned
//! into an INSERT statement by the statement builder.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Expr, Fields, Generics, Lit,
    Meta,
};

/// Derives the `Entity` trait for a struct.
///
/// # Attributes
///
/// - `#[entity(table = "table_name")]` - Overrides the type name used as
///   table name (optional, defaults to the struct name as written)
/// - `#[entity(scalar)]` - The struct implements `ToSqlValue` and is bound
///   as a single value instead of being expanded
///
/// # Field Attributes
///
/// - `#[column(embed)]` - Marks the field as embedded: when it holds a
///   reference to a record (`Option<T>`, `Box<T>`, `&T`), that record's
///   fields are flattened into the parent's columns
/// - `#[column(name = "column_name")]` - Specifies the column name
///   (optional, defaults to the field name)
///
/// Type parameters get an `Entity` bound added.
#[proc_macro_derive(Entity, attributes(entity, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_entity_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let entity_attrs = parse_entity_attrs(&input.attrs)?;
    let type_name = entity_attrs
        .table
        .unwrap_or_else(|| struct_name.unraw().to_string());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity derive only supports structs",
            ));
        }
    };

    let mut field_entries: Vec<TokenStream2> = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let column_attrs = parse_column_attrs(&field.attrs)?;
        let column_name = column_attrs
            .name
            .unwrap_or_else(|| ident.unraw().to_string());

        let constructor = if column_attrs.embed {
            quote!(embedded)
        } else {
            quote!(new)
        };
        field_entries.push(quote! {
            ::entity_sql_core::Field::#constructor(#column_name, &self.#ident)
        });
    }

    let describe = if entity_attrs.scalar {
        quote! { ::entity_sql_core::TypeDesc::record(#type_name).with_scalar_value() }
    } else {
        quote! { ::entity_sql_core::TypeDesc::record(#type_name) }
    };

    let bound_value = if entity_attrs.scalar {
        quote! {
            ::entity_sql_core::BoundValue::Scalar(
                ::entity_sql_core::ToSqlValue::to_sql_value(self)
            )
        }
    } else {
        quote! { ::entity_sql_core::BoundValue::Record(self) }
    };

    let generics = add_entity_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::entity_sql_core::Entity for #struct_name #ty_generics #where_clause {
            fn describe() -> ::entity_sql_core::TypeDesc {
                #describe
            }

            fn type_desc(&self) -> ::entity_sql_core::TypeDesc {
                <Self as ::entity_sql_core::Entity>::describe()
            }

            fn fields(&self) -> ::std::vec::Vec<::entity_sql_core::Field<'_>> {
                ::std::vec![#(#field_entries),*]
            }

            fn bound_value(&self) -> ::entity_sql_core::BoundValue<'_> {
                #bound_value
            }
        }
    };

    Ok(expanded)
}

#[derive(Default)]
struct EntityAttrs {
    table: Option<String>,
    scalar: bool,
}

#[derive(Default)]
struct ColumnAttrs {
    name: Option<String>,
    embed: bool,
}

fn parse_entity_attrs(attrs: &[Attribute]) -> syn::Result<EntityAttrs> {
    let mut result = EntityAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("entity") || matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                result.table = Some(parse_str_value(&meta)?);
            } else if meta.path.is_ident("scalar") {
                result.scalar = true;
            } else {
                return Err(meta.error("unsupported entity attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_column_attrs(attrs: &[Attribute]) -> syn::Result<ColumnAttrs> {
    let mut result = ColumnAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("column") || matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("embed") {
                result.embed = true;
            } else if meta.path.is_ident("name") {
                result.name = Some(parse_str_value(&meta)?);
            } else {
                return Err(meta.error("unsupported column attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_str_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Lit(lit) => match lit.lit {
            Lit::Str(s) => Ok(s.value()),
            other => Err(syn::Error::new_spanned(other, "expected a string literal")),
        },
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

fn add_entity_bounds(mut generics: Generics) -> Generics {
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::entity_sql_core::Entity));
    }
    generics
}
