use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, Path,
    PathArguments, Type,
};

/// Collection types with `ToValue`/`FromValue` impls in `zoner_api`.
const SEQUENCES: &[&str] = &["Vec"];
const MAPPINGS: &[&str] = &["HashMap", "BTreeMap"];

/// Derive macro for reflected mapping types.
///
/// Generates three things on the annotated struct:
///
/// - `Typed::info()`: the static field-descriptor table, built once.
/// - `Reflect::get_field` / `Reflect::set_field`: accessors dispatched by
///   declaring type and declaration slot.
/// - `Reflect::type_info`: the same table, reached through an instance.
///
/// # Example
///
/// ```ignore
/// #[derive(Zoner, Default)]
/// #[zoner(to = CompanyWire)]
/// pub struct Company {
///     #[zoner(write_cache = "xyzId")]
///     pub id: String,
///
///     #[zoner(rename = "employees")]
///     pub emps: Vec<Shared<Emp>>,
/// }
/// ```
///
/// Struct attributes: `to = Type`, `name = "..."`, `statics = path`
/// (`fn(TypeInfoBuilder) -> TypeInfoBuilder`).
///
/// Field attributes: `rename = "..."`, `read_cache = "..."`,
/// `write_cache = "..."`, `skip`, `readonly`, `ignore`, `base`.
#[proc_macro_derive(Zoner, attributes(zoner))]
pub fn derive_zoner(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

#[derive(Default)]
struct StructAttrs {
    to: Option<Type>,
    name: Option<String>,
    statics: Option<Path>,
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    read_cache: Option<String>,
    write_cache: Option<String>,
    skip: bool,
    readonly: bool,
    ignore: bool,
    base: bool,
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Zoner does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Zoner only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Zoner only supports structs")),
    };

    let attrs = parse_struct_attrs(input)?;
    let type_name = attrs.name.clone().unwrap_or_else(|| name.to_string());

    let mut field_calls = Vec::new();
    let mut get_arms = Vec::new();
    let mut set_arms = Vec::new();
    let mut base: Option<(&Ident, &Type)> = None;
    let mut slot = 0usize;

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let fattrs = parse_field_attrs(field)?;

        if fattrs.ignore {
            continue;
        }
        if fattrs.base {
            if base.is_some() {
                return Err(syn::Error::new_spanned(ident, "only one #[zoner(base)] field is allowed"));
            }
            base = Some((ident, &field.ty));
            continue;
        }

        let field_name = ident.unraw().to_string();
        let declared = declared_type_tokens(&field.ty)?;
        let meta = meta_tokens(&fattrs);

        field_calls.push(quote! {
            .field(#field_name, #declared, #meta)
        });

        get_arms.push(quote! {
            #slot => ::std::result::Result::Ok(::zoner_api::ToValue::to_value(&self.#ident)),
        });

        if fattrs.readonly {
            set_arms.push(quote! {
                #slot => ::std::result::Result::Err(::zoner_api::AccessError::read_only(
                    ::std::format!("field '{}' of {} is read-only", #field_name, #type_name)
                )),
            });
        } else {
            set_arms.push(quote! {
                #slot => {
                    self.#ident = ::zoner_api::FromValue::from_value(value).map_err(|e| {
                        e.with_context(::std::format!("field '{}' of {}", #field_name, #type_name))
                    })?;
                    ::std::result::Result::Ok(())
                }
            });
        }
        slot += 1;
    }

    let statics_call = attrs.statics.as_ref().map(|path| quote! { .with(#path) });
    let target_call = attrs.to.as_ref().map(|to| {
        quote! { .target(::zoner_api::TargetDecl::of::<#to>()) }
    });
    let base_call = base.map(|(_, ty)| {
        quote! { .base(<#ty as ::zoner_api::Typed>::info) }
    });

    let (base_get, base_set) = match base {
        Some((ident, _)) => (
            quote! { ::zoner_api::Reflect::get_field(&self.#ident, field) },
            quote! { ::zoner_api::Reflect::set_field(&mut self.#ident, field, value) },
        ),
        None => (
            quote! {
                ::std::result::Result::Err(::zoner_api::reflect::foreign_field(
                    <Self as ::zoner_api::Typed>::info(),
                    field,
                ))
            },
            quote! {
                {
                    let _ = value;
                    ::std::result::Result::Err(::zoner_api::reflect::foreign_field(
                        <Self as ::zoner_api::Typed>::info(),
                        field,
                    ))
                }
            },
        ),
    };

    let expanded = quote! {
        impl ::zoner_api::Typed for #name {
            fn info() -> &'static ::zoner_api::TypeInfo {
                static INFO: ::std::sync::OnceLock<::zoner_api::TypeInfo> =
                    ::std::sync::OnceLock::new();
                INFO.get_or_init(|| {
                    ::zoner_api::TypeInfo::builder::<#name>(#type_name)
                        #(#field_calls)*
                        #statics_call
                        #base_call
                        #target_call
                        .build()
                })
            }
        }

        impl ::zoner_api::Reflect for #name {
            fn type_info(&self) -> &'static ::zoner_api::TypeInfo {
                <Self as ::zoner_api::Typed>::info()
            }

            fn get_field(
                &self,
                field: &::zoner_api::FieldDescriptor,
            ) -> ::std::result::Result<::zoner_api::Value, ::zoner_api::AccessError> {
                if field.owner() == ::std::any::TypeId::of::<Self>() {
                    match field.slot() {
                        #(#get_arms)*
                        _ => ::std::result::Result::Err(::zoner_api::reflect::foreign_field(
                            <Self as ::zoner_api::Typed>::info(),
                            field,
                        )),
                    }
                } else {
                    #base_get
                }
            }

            fn set_field(
                &mut self,
                field: &::zoner_api::FieldDescriptor,
                value: ::zoner_api::Value,
            ) -> ::std::result::Result<(), ::zoner_api::AccessError> {
                if field.owner() == ::std::any::TypeId::of::<Self>() {
                    match field.slot() {
                        #(#set_arms)*
                        _ => ::std::result::Result::Err(::zoner_api::reflect::foreign_field(
                            <Self as ::zoner_api::Typed>::info(),
                            field,
                        )),
                    }
                } else {
                    #base_set
                }
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

fn parse_struct_attrs(input: &DeriveInput) -> Result<StructAttrs, syn::Error> {
    let mut attrs = StructAttrs::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("zoner") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("to") {
                attrs.to = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.name = Some(value.value());
            } else if meta.path.is_ident("statics") {
                attrs.statics = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unknown zoner struct attribute (expected to, name, statics)"));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

fn parse_field_attrs(field: &syn::Field) -> Result<FieldAttrs, syn::Error> {
    let mut attrs = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("zoner") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.rename = Some(value.value());
            } else if meta.path.is_ident("read_cache") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.read_cache = Some(value.value());
            } else if meta.path.is_ident("write_cache") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.write_cache = Some(value.value());
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else if meta.path.is_ident("readonly") {
                attrs.readonly = true;
            } else if meta.path.is_ident("ignore") {
                attrs.ignore = true;
            } else if meta.path.is_ident("base") {
                attrs.base = true;
            } else {
                return Err(meta.error(
                    "unknown zoner field attribute \
                     (expected rename, read_cache, write_cache, skip, readonly, ignore, base)",
                ));
            }
            Ok(())
        })?;
    }
    if attrs.base && (attrs.ignore || attrs.rename.is_some() || attrs.skip) {
        return Err(syn::Error::new_spanned(
            field,
            "#[zoner(base)] cannot be combined with other field attributes",
        ));
    }
    Ok(attrs)
}

fn meta_tokens(attrs: &FieldAttrs) -> TokenStream2 {
    let opt = |s: &Option<String>| match s {
        Some(s) => quote! { ::std::option::Option::Some(::std::string::String::from(#s)) },
        None => quote! { ::std::option::Option::None },
    };
    let rename = opt(&attrs.rename);
    let read_cache = opt(&attrs.read_cache);
    let write_cache = opt(&attrs.write_cache);
    let skip = attrs.skip;
    quote! {
        ::zoner_api::FieldMeta {
            rename: #rename,
            read_cache: #read_cache,
            write_cache: #write_cache,
            skip: #skip,
        }
    }
}

/// `DeclaredType` expression for a field type.
///
/// `Option` layers are peeled first, so `Option<Vec<T>>` is a sequence
/// just like `Vec<T>`: both read as a list or null.
fn declared_type_tokens(ty: &Type) -> Result<TokenStream2, syn::Error> {
    let unsupported = |ty: &Type| syn::Error::new_spanned(ty, "unsupported field type for Zoner");

    let (mut ident, mut args) = last_segment(ty).ok_or_else(|| unsupported(ty))?;
    let mut inner = ty;
    let mut optional = false;
    while *ident == "Option" {
        inner = generic_types(args)
            .into_iter()
            .next()
            .ok_or_else(|| syn::Error::new_spanned(ty, "Option without a type argument"))?;
        (ident, args) = last_segment(inner).ok_or_else(|| unsupported(inner))?;
        optional = true;
    }
    let ident_str = ident.to_string();

    let (shape, element) = if SEQUENCES.contains(&ident_str.as_str()) {
        (quote! { Sequence }, generic_types(args).into_iter().next())
    } else if MAPPINGS.contains(&ident_str.as_str()) {
        (quote! { Mapping }, generic_types(args).into_iter().last())
    } else if optional {
        (quote! { Optional }, Some(inner))
    } else {
        (quote! { Plain }, Some(inner))
    };

    let nested = element.and_then(shared_inner).map(|inner| {
        quote! { .with_nested(<#inner as ::zoner_api::Typed>::info) }
    });

    Ok(quote! {
        ::zoner_api::DeclaredType::new(#ident_str, ::zoner_api::Shape::#shape) #nested
    })
}

/// `T` for a `Shared<T>` type, looking through `Option` layers.
fn shared_inner(ty: &Type) -> Option<&Type> {
    let (ident, args) = last_segment(ty)?;
    let inner = generic_types(args).into_iter().next()?;
    if *ident == "Option" {
        shared_inner(inner)
    } else if *ident == "Shared" {
        Some(inner)
    } else {
        None
    }
}

/// Extract the last path segment of a type (e.g. `u64`, `Vec`, `Shared`).
fn last_segment(ty: &Type) -> Option<(&Ident, &PathArguments)> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|seg| (&seg.ident, &seg.arguments)),
        Type::Group(group) => last_segment(&group.elem),
        Type::Paren(paren) => last_segment(&paren.elem),
        _ => None,
    }
}

fn generic_types(args: &PathArguments) -> Vec<&Type> {
    match args {
        PathArguments::AngleBracketed(angle) => angle
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
