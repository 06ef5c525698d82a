mod decode_column;
mod decode_enum;
mod decode_table;
mod util;

use decode_enum::decode_enum;
use decode_table::decode_table;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemEnum, ItemStruct, parse_macro_input};

fn quote_option(value: &Option<String>) -> proc_macro2::TokenStream {
    match value {
        None => quote! { ::std::option::Option::None },
        Some(v) => quote! { ::std::option::Option::Some(#v) },
    }
}

/// Implements `quill::Entity` from the field declarations of a struct.
///
/// - `#[quill(table = "name")]` on the struct names the table.
/// - `#[quill(column = "name")]` maps a field to an ordinary column, bare
///   `#[quill(column)]` uses the field name.
/// - `#[quill(id = "name")]` maps a field to a primary key column.
/// - `#[quill(ignore)]` hides a field from the mapping entirely.
///
/// Fields without attributes are not persisted but can still be populated
/// from query results by name. `Option` fields are nullable.
#[proc_macro_derive(Entity, attributes(quill))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    let metadata = match decode_table(&item) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };
    let ident = &item.ident;
    let entity_name = ident.to_string();
    let table = quote_option(&metadata.table);
    let field_defs = metadata.fields.iter().map(|f| {
        let name = &f.name;
        let ty = &f.ty;
        let column = quote_option(&f.column);
        let id = quote_option(&f.id);
        let nullable = f.nullable;
        quote! {
            ::quill::FieldDef {
                name: #name,
                column: #column,
                id: #id,
                value: <#ty as ::quill::AsValue>::as_empty_value(),
                nullable: #nullable,
            }
        }
    });
    let get_arms = metadata.fields.iter().map(|f| {
        let name = &f.name;
        let field = &f.ident;
        quote! {
            #name => ::std::option::Option::Some(::quill::AsValue::as_value(
                ::std::clone::Clone::clone(&self.#field),
            )),
        }
    });
    let set_arms = metadata.fields.iter().map(|f| {
        let name = &f.name;
        let field = &f.ident;
        let ty = &f.ty;
        let convert = quote! {
            <#ty as ::quill::AsValue>::try_from_value(value)
                .map_err(|e| e.context(::quill::OrmError::access(#entity_name, #name)))?
        };
        if f.nullable {
            quote! {
                #name => {
                    self.#field = #convert;
                    ::std::result::Result::Ok(())
                }
            }
        } else {
            quote! {
                #name => {
                    self.#field = if value.is_null() {
                        ::std::default::Default::default()
                    } else {
                        #convert
                    };
                    ::std::result::Result::Ok(())
                }
            }
        }
    });
    quote! {
        impl ::quill::Entity for #ident {
            fn descriptor() -> &'static ::quill::EntityDescriptor {
                static DESCRIPTOR: ::std::sync::LazyLock<::quill::EntityDescriptor> =
                    ::std::sync::LazyLock::new(|| ::quill::EntityDescriptor {
                        name: #entity_name,
                        table: #table,
                        fields: ::std::vec![#(#field_defs),*].into_boxed_slice(),
                    });
                &DESCRIPTOR
            }

            fn get_field(&self, field: &str) -> ::std::option::Option<::quill::Value> {
                match field {
                    #(#get_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_field(&mut self, field: &str, value: ::quill::Value) -> ::quill::Result<()> {
                match field {
                    #(#set_arms)*
                    _ => ::std::result::Result::Err(::quill::OrmError::Mapping(::std::format!(
                        "`{}` has no field `{}`",
                        #entity_name,
                        field
                    ))
                    .into()),
                }
            }
        }
    }
    .into()
}

/// Implements `quill::AsValue` for a field-less enum, stored as the variant name.
///
/// `#[quill(rename_all = "snake_case")]` on the enum and
/// `#[quill(rename = "name")]` on a variant change the stored names.
#[proc_macro_derive(SqlEnum, attributes(quill))]
pub fn derive_sql_enum(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemEnum);
    let metadata = match decode_enum(&item) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };
    let ident = &item.ident;
    let enum_name = ident.to_string();
    let names: Vec<_> = metadata.variants.iter().map(|(_, name)| name).collect();
    let variants = quote! {
        {
            const VARIANTS: &[&str] = &[#(#names),*];
            VARIANTS
        }
    };
    let to_name = metadata
        .variants
        .iter()
        .map(|(variant, name)| quote!(Self::#variant => #name,));
    let from_name = metadata
        .variants
        .iter()
        .map(|(variant, name)| quote!(#name => ::std::result::Result::Ok(Self::#variant),));
    quote! {
        impl ::quill::AsValue for #ident {
            fn as_empty_value() -> ::quill::Value {
                ::quill::Value::Enum(::std::option::Option::None, #variants)
            }

            fn as_value(self) -> ::quill::Value {
                let name: &str = match self {
                    #(#to_name)*
                };
                ::quill::Value::Enum(
                    ::std::option::Option::Some(::std::string::ToString::to_string(name)),
                    #variants,
                )
            }

            fn try_from_value(value: ::quill::Value) -> ::quill::Result<Self> {
                let name = match value {
                    ::quill::Value::Enum(::std::option::Option::Some(v), ..)
                    | ::quill::Value::Varchar(::std::option::Option::Some(v)) => v,
                    _ => {
                        return ::std::result::Result::Err(::quill::Error::msg(::std::format!(
                            "Cannot convert {:?} to {}",
                            value,
                            #enum_name
                        )));
                    }
                };
                match name.as_str() {
                    #(#from_name)*
                    _ => ::std::result::Result::Err(::quill::Error::msg(::std::format!(
                        "`{}` is not a variant of {}",
                        name,
                        #enum_name
                    ))),
                }
            }
        }
    }
    .into()
}
