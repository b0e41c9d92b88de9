use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Index, Member, Meta, Result};

// -----------------------------------------------------------------------------
// Expansion

/// Expands `#[derive(Flatten)]` for a `#[repr(C)]` struct.
pub(crate) fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                &input.ident,
                "`#[derive(Flatten)]` does not support enums: \
                 their field layout cannot be walked per offset",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                &input.ident,
                "`#[derive(Flatten)]` does not support unions",
            ));
        }
    };

    if !has_defined_layout(input) {
        return Err(Error::new_spanned(
            &input.ident,
            "`#[derive(Flatten)]` requires `#[repr(C)]` (or `#[repr(transparent)]`): \
             the serialized form is the struct's in-memory bytes",
        ));
    }

    let members = field_members(&data.fields);

    let name = &input.ident;
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(::zf_flat::Flatten));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let (ctx, pos) = if members.is_empty() {
        (quote!(_ctx), quote!(_pos))
    } else {
        (quote!(ctx), quote!(pos))
    };

    let flatten_fields = members.iter().map(|member| {
        quote! {
            ::zf_flat::Flatten::flatten(
                &self.#member,
                ctx,
                pos + ::core::mem::offset_of!(Self, #member) as ::zf_flat::Offset,
            );
        }
    });

    let rebase_fields = members.iter().map(|member| {
        quote! {
            // SAFETY: the caller's contract covers every field in place.
            unsafe {
                ::zf_flat::Flatten::rebase(&mut self.#member, ctx)?;
            }
        }
    });

    Ok(quote! {
        #[automatically_derived]
        unsafe impl #impl_generics ::zf_flat::Flatten for #name #ty_generics #where_clause {
            fn flatten(
                &self,
                #ctx: &mut ::zf_flat::SerializeContext<'_>,
                #pos: ::zf_flat::Offset,
            ) {
                #(#flatten_fields)*
            }

            unsafe fn rebase(
                &mut self,
                #ctx: &::zf_flat::DeserializeContext,
            ) -> ::core::result::Result<(), ::zf_flat::DeserializeError> {
                #(#rebase_fields)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

// -----------------------------------------------------------------------------
// Helpers

/// Returns the struct members in declaration order, named or positional.
fn field_members(fields: &Fields) -> Vec<Member> {
    match fields {
        Fields::Named(fields) => fields
            .named
            .iter()
            .map(|field| Member::Named(field.ident.clone().expect("named field has an ident")))
            .collect(),
        Fields::Unnamed(fields) => (0..fields.unnamed.len())
            .map(|index| Member::Unnamed(Index::from(index)))
            .collect(),
        Fields::Unit => Vec::new(),
    }
}

/// Returns `true` if the type carries `#[repr(C)]` or `#[repr(transparent)]`.
fn has_defined_layout(input: &DeriveInput) -> bool {
    input.attrs.iter().any(|attr| {
        if !attr.path().is_ident("repr") {
            return false;
        }
        let Meta::List(list) = &attr.meta else {
            return false;
        };
        // `repr` arguments are a plain comma list, e.g. `C, align(8)`.
        list.tokens
            .to_string()
            .split(',')
            .any(|repr| matches!(repr.trim(), "C" | "transparent"))
    })
}
