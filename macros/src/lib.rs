#![allow(clippy::let_and_return)]

use proc_macro::TokenStream;
use proc_macro2::Span;
use syn::{spanned::Spanned, Data, DeriveInput, Fields, LitStr};

struct ErrorCollector {
    inner: TokenStream,
}

impl ErrorCollector {
    #[cold]
    fn push_error(&mut self, err: syn::Error) {
        self.inner.extend(TokenStream::from(err.to_compile_error()));
    }

    #[cold]
    fn push<T: std::fmt::Display>(&mut self, span: Span, msg: T) {
        self.push_error(syn::Error::new(span, msg));
    }

    fn push_res(&mut self, res: Result<(), syn::Error>) {
        if let Err(e) = res {
            self.push_error(e);
        }
    }

    fn finish(mut self, rem: impl Into<TokenStream>) -> TokenStream {
        if self.inner.is_empty() {
            return rem.into()
        }

        self.inner.extend(rem.into());

        self.inner
    }
}

/// Parameter table of a strategy method
///
/// Implements `crate::strat::ParamSet` for a struct with named fields. Every field is one
/// parameter of the method; its type must implement `crate::strat::ParamValue`, which decides
/// how the value is read from a strategy string and written back.
///
/// Accepted field attributes are:
///
/// ### `#[strat(name = "...")]`
/// name under which the parameter appears in strategy strings. Defaults to the field name.
/// Parameter names are matched case-insensitively by the strategy parser.
///
/// ### `#[strat(skip)]`
/// field is not a parameter (kept at its `Default` value).
#[proc_macro_derive(StratParams, attributes(strat))]
pub fn derive_strat_params(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let mut errors = ErrorCollector { inner: TokenStream::new() };

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                errors.push(unnamed.span(), "StratParams requires named fields");
                Vec::new()
            }
        },
        _ => {
            errors.push(input.ident.span(), "StratParams can only be derived for structs");
            Vec::new()
        }
    };

    let mut idents = Vec::new();
    let mut names = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue
        };
        let mut name = LitStr::new(&ident.to_string(), ident.span());
        let mut skip = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("strat")) {
            errors.push_res(attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    name = meta.value()?.parse()?;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown directive (valid directives: `name` or `skip`)"))
                }
            }));
        }
        if name.value().is_empty() || !name.value().chars().all(|c| c.is_ascii_alphanumeric()) {
            errors.push(name.span(), "parameter names must be non-empty and alphanumeric");
        }
        if names.iter().any(|n: &LitStr| n.value().eq_ignore_ascii_case(&name.value())) {
            errors.push(name.span(), format!("duplicate parameter name `{}`", name.value()));
        }
        if !skip {
            idents.push(ident);
            names.push(name);
        }
    }

    let ty = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let firsts = (0..idents.len()).map(|i| i == 0);

    let res = quote::quote! {
        impl #impl_generics crate::strat::ParamSet for #ty #ty_generics #where_clause {
            fn param_names(&self) -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn parse_param(
                &mut self,
                name: &str,
                parser: &mut crate::strat_parser::StratParser<'_>,
            ) -> ::std::result::Result<(), crate::strat::StratError> {
                #(
                    if name.eq_ignore_ascii_case(#names) {
                        self.#idents = crate::strat::ParamValue::parse_value(parser)?;
                        return Ok(());
                    }
                )*
                Err(parser.error_unknown_param(name))
            }

            fn save_params(&self, out: &mut ::std::string::String) {
                #(
                    if !#firsts {
                        out.push(',');
                    }
                    out.push_str(#names);
                    out.push('=');
                    crate::strat::ParamValue::save_value(&self.#idents, out);
                )*
            }
        }
    };

    errors.finish(res)
}
