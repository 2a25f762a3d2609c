#![doc = include_str!("../README.md")]

use convert_case::{Case, Casing};
use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::*;

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(env), supports(struct_named))]
struct EnvArgs {
	ident: syn::Ident,
	generics: syn::Generics,
	data: ast::Data<(), EnvFieldArgs>,
}

#[derive(Debug, FromField)]
#[darling(attributes(env))]
struct EnvFieldArgs {
	ident: Option<syn::Ident>,

	/// Environment name segment used instead of the field's own name.
	#[darling(default)]
	name: Option<String>,
	/// Raw string parsed into the field when no variable is set.
	#[darling(default)]
	default: Option<String>,
	#[darling(default)]
	nested: bool,
	#[darling(default)]
	flatten: bool,
	#[darling(default)]
	factory: bool,
	#[darling(default)]
	ignore: bool,
}

/// Generates a `FromEnv` implementation that populates each field from
/// environment variables, walking fields in declaration order.
///
/// Leaf fields must implement `EnvValue`; fields marked `#[env(nested)]` or
/// `#[env(flatten)]` must implement `FromEnv` and `Default` themselves.
#[proc_macro_derive(FromEnv, attributes(env))]
pub fn from_env(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	// Parse the input tokens into a syntax tree
	let input = parse_macro_input!(input as DeriveInput);

	let args = match EnvArgs::from_derive_input(&input) {
		Ok(v) => v,
		Err(e) => {
			return e.write_errors().into();
		}
	};

	let name = args.ident;
	let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();
	let fields = args.data.as_ref().take_struct().unwrap().fields;

	let mut body = TokenStream::new();
	for field in &fields {
		match expand_field(field) {
			Ok(tokens) => body.extend(tokens),
			Err(e) => return e.write_errors().into(),
		}
	}

	// Build the output, possibly using quasi-quotation
	let expanded = quote! {
		impl #impl_generics ::envcascade::FromEnv for #name #ty_generics #where_clause {
			fn process(&mut self, scope: &::envcascade::Scope<'_>) -> ::envcascade::Result<()> {
				#body
				::envcascade::Result::Ok(())
			}
		}
	};

	// Hand the output tokens back to the compiler
	expanded.into()
}

fn expand_field(field: &&EnvFieldArgs) -> darling::Result<TokenStream> {
	let ident = field.ident.clone().unwrap();
	let structured = field.nested || field.flatten || field.factory;

	if field.ignore {
		if structured || field.name.is_some() || field.default.is_some() {
			return Err(custom_error(
				&ident,
				"#[env(ignore)] cannot be combined with other attributes",
			));
		}
		return Ok(TokenStream::new());
	}
	if field.nested && field.flatten {
		return Err(custom_error(
			&ident,
			"#[env(nested)] and #[env(flatten)] are mutually exclusive",
		));
	}
	if field.factory && field.nested {
		return Err(custom_error(
			&ident,
			"#[env(factory)] fields are built by their factory; #[env(nested)] is redundant",
		));
	}
	if structured && field.default.is_some() {
		return Err(custom_error(
			&ident,
			"#[env(default)] only applies to leaf fields",
		));
	}

	let field_name = ident.to_string();
	let env_name = match &field.name {
		Some(name) => name.to_ascii_lowercase(),
		None => field_name.to_case(Case::Snake),
	};

	if structured {
		// Flattened fields resolve at their parent's prefix level, unless
		// an explicit name extends the chain for all descendants.
		let segment = if field.flatten && field.name.is_none() {
			quote! { ::core::option::Option::None }
		} else {
			quote! { ::core::option::Option::Some(#env_name) }
		};
		if field.factory {
			Ok(quote! {
				::envcascade::populate::factory_only(&mut self.#ident, scope, #segment, #field_name)?;
			})
		} else {
			Ok(quote! {
				::envcascade::populate::nested(&mut self.#ident, scope, #segment, #field_name)?;
			})
		}
	} else {
		let default = match &field.default {
			Some(raw) => quote! { ::core::option::Option::Some(#raw) },
			None => quote! { ::core::option::Option::None },
		};
		Ok(quote! {
			::envcascade::populate::leaf(&mut self.#ident, scope, #field_name, #env_name, #default)?;
		})
	}
}

fn custom_error(ident: &Ident, message: &str) -> darling::Error {
	darling::Error::custom(message).with_span(ident)
}
