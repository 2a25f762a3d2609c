use std::error::Error;
use std::ffi::OsString;

use thiserror::Error;

/// Any error raised while populating a configuration from the environment.
///
/// Every variant carries the offending field so the failing variable can be
/// located without re-running the walk.
#[derive(Debug, Error)]
pub enum FromEnvError {
	/// The variable was set but its value did not parse as the field's type.
	#[error("{var}: cannot parse {value:?} for field `{field}`")]
	Parse {
		field: String,
		var: String,
		value: String,
		#[source]
		source: Box<dyn Error + Send + Sync>,
	},
	/// The variable was set to something other than valid unicode.
	#[error("{0}: environment variable is not valid unicode")]
	NotUnicode(String, OsString),
	/// The field can only be built by a registered factory, and the call
	/// supplied none for its type.
	#[error("field `{field}`: no factory registered for `{type_name}`")]
	MissingFactory {
		field: String,
		type_name: &'static str,
	},
	/// A registered factory produced a value of a different type than the
	/// field it was invoked for.
	#[error("field `{field}`: factory did not produce a `{type_name}`")]
	FactoryType {
		field: String,
		type_name: &'static str,
	},
	/// A caller-supplied factory failed.
	#[error("field `{field}`: factory failed")]
	Factory {
		field: String,
		#[source]
		source: Box<FromEnvError>,
	},
	/// An error raised by caller code running inside a factory.
	#[error(transparent)]
	Custom(#[from] Box<dyn Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, FromEnvError>;
