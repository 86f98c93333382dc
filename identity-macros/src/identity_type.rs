use crate::utils::{apply_derives, prepend_common_fields};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[identity_type] 宏实现
/// - 注入公共字段（若缺失）：`key`、`enabled`、`created_date`、`expiration_date`、`attributes`，并置于字段最前
/// - 自动实现 `::identity_domain::model::IdentityType`
/// - 合并派生：Clone、Default、Serialize、Deserialize，以及可控的 Debug
/// - 参数：`#[identity_type(debug = true|false)]`，默认 true
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as IdentityTypeAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[identity_type] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "#[identity_type] only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let timestamp: Type = syn::parse_quote! { ::identity_domain::model::Timestamp };
    let common: [(&str, Type); 5] = [
        ("key", syn::parse_quote! { ::std::string::String }),
        ("enabled", syn::parse_quote! { bool }),
        ("created_date", timestamp.clone()),
        (
            "expiration_date",
            syn::parse_quote! { ::std::option::Option<#timestamp> },
        ),
        (
            "attributes",
            syn::parse_quote! { ::identity_domain::model::Attributes },
        ),
    ];
    prepend_common_fields(fields_named, &common);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Default),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let expanded = quote! {
        #st

        impl #impl_generics ::identity_domain::model::IdentityType for #ident #ty_generics #where_clause {
            fn new(key: ::std::string::String) -> Self {
                Self {
                    key,
                    enabled: true,
                    created_date: ::identity_domain::model::now(),
                    ..::std::default::Default::default()
                }
            }

            fn key(&self) -> &str { &self.key }

            fn is_enabled(&self) -> bool { self.enabled }

            fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }

            fn created_date(&self) -> #timestamp { self.created_date }

            fn set_created_date(&mut self, created_date: #timestamp) {
                self.created_date = created_date;
            }

            fn expiration_date(&self) -> ::std::option::Option<#timestamp> { self.expiration_date }

            fn set_expiration_date(&mut self, expiration_date: ::std::option::Option<#timestamp>) {
                self.expiration_date = expiration_date;
            }

            fn attributes(&self) -> &::identity_domain::model::Attributes { &self.attributes }

            fn attributes_mut(&mut self) -> &mut ::identity_domain::model::Attributes {
                &mut self.attributes
            }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct IdentityTypeAttrConfig {
    derive_debug: Option<bool>,
}

impl Parse for IdentityTypeAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut derive_debug: Option<bool> = None;

        if input.is_empty() {
            return Ok(Self { derive_debug });
        }

        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;

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
            match kv.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => derive_debug = Some(b.value()),
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "expected boolean literal for 'debug'",
                    ));
                }
            }
        }

        Ok(Self { derive_debug })
    }
}
