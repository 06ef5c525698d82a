use convert_case::{Case, Casing};
use syn::{Error, Fields, Ident, ItemEnum, LitStr, Result, spanned::Spanned};

pub(crate) struct EnumMetadata {
    /// Variant identifier and its stored name.
    pub(crate) variants: Vec<(Ident, String)>,
}

fn decode_case(value: &LitStr) -> Result<Case> {
    Ok(match value.value().as_str() {
        "lowercase" => Case::Flat,
        "UPPERCASE" => Case::UpperFlat,
        "snake_case" => Case::Snake,
        "SCREAMING_SNAKE_CASE" => Case::UpperSnake,
        "kebab-case" => Case::Kebab,
        "SCREAMING-KEBAB-CASE" => Case::Cobol,
        "camelCase" => Case::Camel,
        "PascalCase" => Case::Pascal,
        other => {
            return Err(Error::new(
                value.span(),
                format!(
                    "Unknown case `{other}`, expected one of `lowercase`, `UPPERCASE`, `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case`, `SCREAMING-KEBAB-CASE`, `camelCase`, `PascalCase`"
                ),
            ));
        }
    })
}

pub(crate) fn decode_enum(item: &ItemEnum) -> Result<EnumMetadata> {
    if !item.generics.params.is_empty() {
        return Err(Error::new(
            item.generics.span(),
            "SqlEnum cannot be derived for a generic enum",
        ));
    }
    let mut case = None;
    for attr in &item.attrs {
        if !attr.path().is_ident("quill") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("rename_all") {
                case = Some(decode_case(&arg.value()?.parse::<LitStr>()?)?);
                Ok(())
            } else {
                Err(arg.error("Unknown attribute inside quill macro, expected `rename_all`"))
            }
        })?;
    }
    let mut variants = Vec::with_capacity(item.variants.len());
    for variant in &item.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "SqlEnum variants cannot have fields",
            ));
        }
        let mut name = variant.ident.to_string();
        if let Some(case) = &case {
            name = name.to_case(case.clone());
        }
        for attr in &variant.attrs {
            if !attr.path().is_ident("quill") {
                continue;
            }
            attr.parse_nested_meta(|arg| {
                if arg.path.is_ident("rename") {
                    name = arg.value()?.parse::<LitStr>()?.value();
                    Ok(())
                } else {
                    Err(arg.error("Unknown attribute inside quill macro, expected `rename`"))
                }
            })?;
        }
        variants.push((variant.ident.clone(), name));
    }
    Ok(EnumMetadata { variants })
}
