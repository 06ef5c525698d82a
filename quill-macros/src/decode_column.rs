use crate::util::is_option;
use syn::{Error, Field, Ident, LitStr, Result, Type, ext::IdentExt, spanned::Spanned};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    /// Field name without the raw identifier prefix.
    pub(crate) name: String,
    pub(crate) column: Option<String>,
    /// `Some("")` when the field is declared as key without a column name.
    pub(crate) id: Option<String>,
    pub(crate) nullable: bool,
    pub(crate) ignore: bool,
}

pub(crate) fn decode_column(field: &Field) -> Result<FieldMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new(field.span(), "Fields are expected to have a name"));
    };
    let mut metadata = FieldMetadata {
        name: ident.unraw().to_string(),
        ident,
        ty: field.ty.clone(),
        column: None,
        id: None,
        nullable: is_option(&field.ty),
        ignore: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("quill") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("column") {
                metadata.column = Some(if arg.input.peek(syn::Token![=]) {
                    arg.value()?.parse::<LitStr>().map_err(|e| {
                        Error::new(
                            e.span(),
                            "Error while parsing `column`, use it like: `#[quill(column = \"my_column\")]`",
                        )
                    })?
                    .value()
                } else {
                    metadata.name.clone()
                });
            } else if arg.path.is_ident("id") {
                metadata.id = Some(if arg.input.peek(syn::Token![=]) {
                    arg.value()?.parse::<LitStr>().map_err(|e| {
                        Error::new(
                            e.span(),
                            "Error while parsing `id`, use it like: `#[quill(id = \"my_key\")]`",
                        )
                    })?
                    .value()
                } else {
                    String::new()
                });
            } else if arg.path.is_ident("ignore") {
                metadata.ignore = true;
            } else {
                return Err(arg.error(format!(
                    "Unknown attribute `{}` inside quill macro, expected one of `column`, `id`, `ignore`",
                    arg.path
                        .get_ident()
                        .map(ToString::to_string)
                        .unwrap_or_default()
                )));
            }
            Ok(())
        })?;
    }
    Ok(metadata)
}
