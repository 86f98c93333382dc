use quote::ToTokens;
use std::collections::HashSet;
use syn::{Attribute, Field, FieldsNamed, Token, Type, punctuated::Punctuated};

/// 在属性列表上合并派生：required 在前，既有 derive 去重后追加，非 derive 属性原样保留
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs.iter() {
        if !attr.path().is_ident("derive") {
            retained.push(attr.clone());
            continue;
        }
        if let Ok(list) =
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
        {
            existing.extend(list);
        }
    }

    let mut seen = HashSet::new();
    let merged: Vec<syn::Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();

    let derive: Attribute = syn::parse_quote!(#[derive(#(#merged),*)]);
    *attrs = std::iter::once(derive).chain(retained).collect();
}

// Serialize 与 serde::Serialize 视为同一个派生
fn derive_key(p: &syn::Path) -> String {
    match p.segments.last() {
        Some(last) => {
            let ident = last.ident.to_string();
            match ident.as_str() {
                "Serialize" | "Deserialize" => format!("serde::{ident}"),
                _ => ident,
            }
        }
        None => p.to_token_stream().to_string(),
    }
}

/// 将公共字段按给定顺序置于结构体最前：
/// - 用户已声明的同名字段原样复用（保留其可见性与属性）；
/// - 缺失的字段按给定类型补齐；
/// - 其余字段保持原有相对顺序。
pub(crate) fn prepend_common_fields(fields_named: &mut FieldsNamed, common: &[(&str, Type)]) {
    let old_named = std::mem::take(&mut fields_named.named);
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    for (name, ty) in common {
        match old_named.iter().find(|f| is_named(f, name)) {
            Some(existing) => new_named.push(existing.clone()),
            None => {
                let ident = syn::Ident::new(name, proc_macro2::Span::call_site());
                new_named.push(syn::parse_quote! { #ident: #ty });
            }
        }
    }

    for f in old_named {
        if !common.iter().any(|(name, _)| is_named(&f, name)) {
            new_named.push(f);
        }
    }

    fields_named.named = new_named;
}

fn is_named(field: &Field, name: &str) -> bool {
    field.ident.as_ref().is_some_and(|i| i == name)
}
