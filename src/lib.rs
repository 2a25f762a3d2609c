//! Populates nested configuration structs from prefixed environment variables.
//!
//! Deriving [`FromEnv`] on a struct makes every field fillable from the
//! environment. Leaf fields parse with [`EnvValue`]; fields marked
//! `#[env(nested)]` descend into their own configuration one prefix level
//! deeper, and `#[env(flatten)]` fields resolve as if their members were
//! declared directly on the parent.
//!
//! For each leaf, the variable names probed are the accumulated prefix chain
//! with progressively fewer leading segments, down to the bare field name:
//! a field `topic` nested under `pub_sub` with prefix `test` tries
//! `TEST_PUB_SUB_TOPIC`, then `PUB_SUB_TOPIC`, then `TOPIC`. The first set
//! variable wins, so a qualified name always beats a bare one. If none is
//! set, an `#[env(default = "...")]` string is parsed instead; with no
//! default the field keeps its zero value.
//!
//! ```
//! use std::time::Duration;
//! use envcascade::FromEnv;
//!
//! #[derive(Debug, Default, FromEnv)]
//! struct PubSub {
//! 	#[env(name = "topic")]
//! 	topic: String,
//! 	#[env(name = "max_extension", default = "15m")]
//! 	max_extension: Duration,
//! }
//!
//! #[derive(Debug, Default, FromEnv)]
//! struct Config {
//! 	#[env(nested)]
//! 	pub_sub: PubSub,
//! 	http_port: u16,
//! }
//!
//! std::env::set_var("TEST_HTTP_PORT", "8088");
//! std::env::set_var("TEST_PUB_SUB_TOPIC", "events");
//!
//! let config = Config::from_env("test")?;
//! assert_eq!(config.http_port, 8088);
//! assert_eq!(config.pub_sub.topic, "events");
//! assert_eq!(config.pub_sub.max_extension, Duration::from_secs(15 * 60));
//! # Ok::<(), envcascade::FromEnvError>(())
//! ```
//!
//! # Field attributes
//!
//! - `#[env(name = "...")]` — environment name segment to use instead of
//!   the field's own name. On a leaf the field's own name is then never
//!   probed; on a nested or flattened field the segment extends the prefix.
//! - `#[env(default = "...")]` — string parsed into the field's type when
//!   no candidate variable is set.
//! - `#[env(nested)]` — the field is a configuration of its own, populated
//!   one prefix level deeper.
//! - `#[env(flatten)]` — the field's members resolve at the parent's
//!   prefix level. Combined with `name`, the tag extends the prefix for
//!   all descendants, exactly like a nested field.
//! - `#[env(factory)]` — the field can only be built by a factory
//!   registered with [`process_with`]; used for types that are not
//!   themselves processable.
//! - `#[env(ignore)]` — the field is never touched.
//!
//! # Dynamic construction
//!
//! [`process_with`] takes a [`Factories`] registry mapping a field type to
//! a constructor. When the walk reaches a field whose type is registered,
//! the factory is handed a [`Lookup`] bound to that field's scope and its
//! product is assigned verbatim, bypassing plain recursion for that field
//! only.
//!
//! # Environment access
//!
//! Variables are read live, one lookup per candidate, never snapshotted.
//! Population is synchronous and touches no other process state; mutating
//! the environment concurrently with a [`process`] call yields unspecified
//! field values. Population is not transactional: fields written before an
//! error keep their values.

mod error;
mod factory;
mod scope;
mod value;

#[doc(hidden)]
pub mod populate;

pub use envcascade_macros::FromEnv;
pub use error::{FromEnvError, Result};
pub use factory::{Factories, Lookup};
pub use scope::Scope;
pub use value::{EnvValue, ValueError};

/// A configuration that can be populated from the environment.
///
/// Derive this with `#[derive(FromEnv)]`; the generated implementation
/// walks the struct's fields in declaration order.
pub trait FromEnv {
	/// Populates `self` under the given resolution scope.
	///
	/// Driven by [`process`]; derived implementations call back into the
	/// crate for each field and abort on the first error.
	fn process(&mut self, scope: &Scope<'_>) -> Result<()>;

	/// Builds a configuration from its zero value and processes it.
	fn from_env(prefix: &str) -> Result<Self>
	where
		Self: Default + Sized,
	{
		let mut config = Self::default();
		process(prefix, &mut config)?;
		Ok(config)
	}
}

/// Populates `config` from the environment under `prefix`.
///
/// An empty prefix resolves every top-level field by its bare name.
pub fn process<C: FromEnv>(prefix: &str, config: &mut C) -> Result<()> {
	config.process(&Scope::root(prefix, None))
}

/// Like [`process`], with a registry of per-type constructors consulted for
/// every nested field before plain recursion.
///
/// The registry is only borrowed for the duration of the call.
pub fn process_with<C: FromEnv>(
	prefix: &str,
	config: &mut C,
	factories: &Factories,
) -> Result<()> {
	config.process(&Scope::root(prefix, Some(factories)))
}

/// Populates `config`, panicking on failure.
///
/// For startup configuration only, where a bad environment leaves nothing
/// sensible to do but abort.
pub fn must_process<C: FromEnv>(prefix: &str, config: &mut C) {
	if let Err(err) = process(prefix, config) {
		panic!("cannot process configuration from environment: {err}");
	}
}
