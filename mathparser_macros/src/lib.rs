use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg, Ident, ItemFn, Pat, PatType, Type};

fn formatted_arg_error_msg(arg_pos: usize, fn_name: &str) -> String {
    format!("Expected argument {} of {} to be f64", arg_pos, fn_name)
}

fn is_f64(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "f64"),
        _ => false,
    }
}

/// Turns a plain numeric function into a rule that pulls its operands from an
/// `EvalCursor`.
///
/// ```ignore
/// #[math_fn]
/// fn log(x: f64, base: f64) -> f64 {
///     x.log(base)
/// }
/// ```
///
/// expands to `fn log(cursor: &mut EvalCursor<'_>) -> Result<f64, EvalFault>`
/// plus `const LOG_ARITY: usize = 2`. Operands are pulled last parameter
/// first, so `base` is pulled before `x`. `EvalCursor` and `EvalFault` must
/// be in scope at the call site.
#[proc_macro_attribute]
pub fn math_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    match expand(input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: ItemFn) -> syn::Result<TokenStream2> {
    let vis = &input.vis;
    let attrs = &input.attrs;
    let fn_name = &input.sig.ident;
    let fn_args = &input.sig.inputs;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;

    let mut arg_names: Vec<&Ident> = Vec::new();

    for (i, arg) in fn_args.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return Err(syn::Error::new_spanned(arg, "math_fn cannot take self"));
        };

        let arg_name = match **pat {
            Pat::Ident(ref ident) => &ident.ident,
            _ => return Err(syn::Error::new_spanned(pat, "Unsupported pattern")),
        };

        if !is_f64(ty) {
            return Err(syn::Error::new_spanned(
                ty,
                formatted_arg_error_msg(i, &fn_name.to_string()),
            ));
        }

        arg_names.push(arg_name);
    }

    let args_len = arg_names.len();
    let arity_const = format_ident!("{}_ARITY", fn_name.to_string().to_uppercase());
    let pulls = arg_names.iter().rev().map(|name| {
        quote! {
            let #name: f64 = __cursor.pull()?;
        }
    });

    Ok(quote! {
        #[doc = concat!("Number of operands `", stringify!(#fn_name), "` pulls.")]
        #[allow(dead_code)]
        #vis const #arity_const: usize = #args_len;

        #(#attrs)*
        #vis fn #fn_name(__cursor: &mut EvalCursor<'_>) -> Result<f64, EvalFault> {
            fn __apply(#fn_args) #fn_output #fn_body

            #(#pulls)*

            Ok(__apply(#(#arg_names),*))
        }
    })
}
