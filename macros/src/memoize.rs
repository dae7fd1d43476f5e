use proc_macro2::Span;

use super::*;

/// Memoize a function.
pub fn expand(mut func: syn::ItemFn) -> Result<proc_macro2::TokenStream> {
    let sig = &func.sig;
    if let Some(asyncness) = &sig.asyncness {
        bail!(asyncness, "async functions are not supported");
    }

    if !sig.generics.params.is_empty() {
        bail!(sig.generics, "generic functions are not supported");
    }

    let mut args = vec![];
    for input in &sig.inputs {
        let typed = match input {
            syn::FnArg::Typed(typed) => typed,
            syn::FnArg::Receiver(_) => {
                bail!(input, "methods are not supported")
            }
        };

        let name = match typed.pat.as_ref() {
            syn::Pat::Ident(syn::PatIdent {
                by_ref: None,
                mutability: None,
                ident,
                subpat: None,
                ..
            }) => ident,
            pat => bail!(pat, "only simple identifiers are supported"),
        };

        if let syn::Type::ImplTrait(ty) = typed.ty.as_ref() {
            bail!(ty, "`impl Trait` arguments are not supported");
        }

        args.push(name.clone());
    }

    let output = match &sig.output {
        syn::ReturnType::Default => parse_quote! { () },
        syn::ReturnType::Type(_, ty) => ty.as_ref().clone(),
    };

    // Hash all arguments at once.
    let key = quote! {
        ::memoizer::internal::hash(&(#(&#args,)*))
    };

    // Mixed-site spans keep these apart from the function's own names.
    let cache = syn::Ident::new("__MEMOIZER_CACHE", Span::mixed_site());
    let key_var = syn::Ident::new("__memoizer_key", Span::mixed_site());

    // The function body runs in a closure that captures the arguments.
    let body = &func.block;
    let closure = quote! { move || -> #output #body };

    func.block = if is_result(&output) {
        parse_quote! { {
            static #cache: ::memoizer::internal::Cache<
                <#output as ::memoizer::internal::Fallible>::Ok,
            > = ::memoizer::internal::Cache::new();
            let #key_var = #key;
            ::memoizer::internal::memoized_result(&#cache, #key_var, #closure)
        } }
    } else {
        parse_quote! { {
            static #cache: ::memoizer::internal::Cache<#output> =
                ::memoizer::internal::Cache::new();
            let #key_var = #key;
            ::memoizer::internal::memoized(&#cache, #key_var, #closure)
        } }
    };

    Ok(quote! { #func })
}

/// Whether a type is spelled as some `Result`.
fn is_result(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Result"),
        syn::Type::Paren(paren) => is_result(&paren.elem),
        syn::Type::Group(group) => is_result(&group.elem),
        _ => false,
    }
}
