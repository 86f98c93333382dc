use crate::utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Default, Clone, (Debug 可控), Serialize, Deserialize, PartialEq, Eq
/// - 参数：`#[value_object(debug = true|false)]`，默认 true
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Default),
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
    ];
    if cfg.derive_debug {
        required.insert(0, syn::parse_quote!(Debug));
    }

    match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            TokenStream::from(quote! { #st })
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            TokenStream::from(quote! { #en })
        }
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}

// -------- parsing --------

struct ValueObjectAttrConfig {
    derive_debug: bool,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;

        let mut derive_debug = None;
        for kv in pairs {
            if !kv.path.is_ident("debug") {
                return Err(syn::Error::new(
                    kv.path.span(),
                    "unknown key in attribute; expected 'debug'",
                ));
            }
            if derive_debug.is_some() {
                return Err(syn::Error::new(
                    kv.path.span(),
                    "duplicate key 'debug' in attribute",
                ));
            }
            let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Bool(b),
                ..
            }) = &kv.value
            else {
                return Err(syn::Error::new(
                    kv.value.span(),
                    "expected boolean literal for 'debug'",
                ));
            };
            derive_debug = Some(b.value());
        }

        Ok(Self {
            derive_debug: derive_debug.unwrap_or(true),
        })
    }
}
