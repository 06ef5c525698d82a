use crate::decode_column::{FieldMetadata, decode_column};
use syn::{Error, Fields, ItemStruct, LitStr, Result, spanned::Spanned};

pub(crate) struct TableMetadata {
    pub(crate) table: Option<String>,
    /// Fields not marked with `ignore`.
    pub(crate) fields: Vec<FieldMetadata>,
}

pub(crate) fn decode_table(item: &ItemStruct) -> Result<TableMetadata> {
    if !item.generics.params.is_empty() {
        return Err(Error::new(
            item.generics.span(),
            "Entity cannot be derived for a generic struct",
        ));
    }
    if let Fields::Unnamed(fields) = &item.fields {
        return Err(Error::new(
            fields.span(),
            "Entity cannot be derived for a tuple struct, fields must be named",
        ));
    }
    let mut table = None;
    for attr in &item.attrs {
        if !attr.path().is_ident("quill") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("table") {
                let value = arg.value()?.parse::<LitStr>().map_err(|e| {
                    Error::new(
                        e.span(),
                        "Error while parsing `table`, use it like: `#[quill(table = \"my_table\")]`",
                    )
                })?;
                table = Some(value.value());
                Ok(())
            } else {
                Err(arg.error("Unknown attribute inside quill macro, expected `table`"))
            }
        })?;
    }
    let mut fields = Vec::new();
    for field in &item.fields {
        let field = decode_column(field)?;
        if !field.ignore {
            fields.push(field);
        }
    }
    Ok(TableMetadata { table, fields })
}
