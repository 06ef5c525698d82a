use std::cmp::min;
use syn::{Path, Type, TypePath};

/// The trailing segments of `path` equal the trailing elements of `expect`.
pub(crate) fn matches_path(path: &Path, expect: &[&str]) -> bool {
    let len = min(path.segments.len(), expect.len());
    path.segments
        .iter()
        .rev()
        .take(len)
        .map(|v| &v.ident)
        .eq(expect.iter().rev().take(len))
}

/// `Option<T>`, `option::Option<T>` or `std::option::Option<T>`.
pub(crate) fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(TypePath { qself: None, path }) => {
            matches_path(path, &["std", "option", "Option"])
                || matches_path(path, &["core", "option", "Option"])
        }
        Type::Group(group) => is_option(&group.elem),
        Type::Paren(paren) => is_option(&paren.elem),
        _ => false,
    }
}
