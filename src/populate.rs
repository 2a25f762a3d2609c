//! Per-field population helpers expanded by `#[derive(FromEnv)]`.
//!
//! Public so generated code can reach them; not part of the supported API.

use std::any::{self, Any};
use std::env::{self, VarError};

use tracing::trace;

use crate::{EnvValue, Factories, FromEnv, FromEnvError, Lookup, Result, Scope};

/// Populates a leaf field from the first set candidate variable, falling
/// back to `default`, or leaving the field at its zero value.
///
/// `field` is the struct field's own name, used for error context; `name`
/// is the resolved environment name (the field name, or its override).
pub fn leaf<T: EnvValue>(
	value: &mut T,
	scope: &Scope<'_>,
	field: &str,
	name: &str,
	default: Option<&str>,
) -> Result<()> {
	let candidates = scope.candidates(name);
	for var in &candidates {
		match env::var(var) {
			Ok(raw) => {
				*value = T::parse(&raw).map_err(|source| FromEnvError::Parse {
					field: field.to_string(),
					var: var.clone(),
					value: raw.clone(),
					source,
				})?;
				trace!(var = %var, field = field, "field resolved from environment");
				return Ok(());
			}
			Err(VarError::NotPresent) => {}
			Err(VarError::NotUnicode(raw)) => {
				return Err(FromEnvError::NotUnicode(var.clone(), raw));
			}
		}
	}
	if let Some(raw) = default {
		*value = T::parse(raw).map_err(|source| FromEnvError::Parse {
			field: field.to_string(),
			var: candidates[0].clone(),
			value: raw.to_string(),
			source,
		})?;
		trace!(field = field, default = raw, "field resolved from its default");
	}
	Ok(())
}

/// Populates a nested configuration field.
///
/// A factory registered for `T` builds the value; otherwise a fresh zero
/// value of `T` is processed under the child scope and assigned back. The
/// child scope extends the chain by `segment`, or reuses the parent chain
/// when the field is flattened (`None`).
pub fn nested<T>(
	value: &mut T,
	scope: &Scope<'_>,
	segment: Option<&str>,
	field: &str,
) -> Result<()>
where
	T: FromEnv + Default + Any,
{
	let child = scope.child(segment);
	if let Some(produced) = run_factory::<T>(scope.factories(), &child, field) {
		*value = produced?;
		return Ok(());
	}
	trace!(prefix = %child.prefix(), field = field, "descending into nested configuration");
	let mut fresh = T::default();
	fresh.process(&child)?;
	*value = fresh;
	Ok(())
}

/// Populates a field whose type can only be built by a registered factory.
///
/// Used for foreign types that are not processable themselves; a missing
/// registration is an error, not a silent zero value.
pub fn factory_only<T: Any>(
	value: &mut T,
	scope: &Scope<'_>,
	segment: Option<&str>,
	field: &str,
) -> Result<()> {
	let child = scope.child(segment);
	match run_factory::<T>(scope.factories(), &child, field) {
		Some(produced) => {
			*value = produced?;
			Ok(())
		}
		None => Err(FromEnvError::MissingFactory {
			field: field.to_string(),
			type_name: any::type_name::<T>(),
		}),
	}
}

fn run_factory<T: Any>(
	factories: Option<&Factories>,
	child: &Scope<'_>,
	field: &str,
) -> Option<Result<T>> {
	let lookup = Lookup::new(child);
	factories?.produce::<T>(field, &lookup)
}
