use std::any::{self, Any, TypeId};
use std::collections::HashMap;

use crate::{FromEnv, FromEnvError, Result, Scope};

/// Prefix-aware lookup handle passed to a registered factory.
///
/// A factory may build its value however it likes; calling
/// [`Lookup::populate`] runs the standard environment walk, scoped to the
/// field the factory is producing, over any processable value. This lets a
/// factory own construction of a foreign type by populating a mirror struct
/// and converting it, while still seeing correctly prefixed variable names.
pub struct Lookup<'a> {
	scope: &'a Scope<'a>,
}

impl<'a> Lookup<'a> {
	pub(crate) fn new(scope: &'a Scope<'a>) -> Self {
		Lookup { scope }
	}

	pub fn populate<C: FromEnv>(&self, target: &mut C) -> Result<()> {
		target.process(self.scope)
	}
}

type BoxedFactory = Box<dyn Fn(&Lookup<'_>) -> Result<Box<dyn Any>>>;

/// Registry mapping a configuration type to the constructor used to build
/// it, instead of plain recursive population.
///
/// Supplied per [`process_with`](crate::process_with) call; the populator
/// borrows it for the duration of the walk and consults it at every nesting
/// level.
#[derive(Default)]
pub struct Factories {
	map: HashMap<TypeId, BoxedFactory>,
}

impl Factories {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `factory` as the constructor for every field of type `T`,
	/// replacing any previous registration for `T`.
	pub fn register<T, F>(&mut self, factory: F)
	where
		T: Any,
		F: Fn(&Lookup<'_>) -> Result<T> + 'static,
	{
		self.map.insert(
			TypeId::of::<T>(),
			Box::new(move |lookup| {
				factory(lookup).map(|value| Box::new(value) as Box<dyn Any>)
			}),
		);
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	/// Runs the factory registered for `T`, if any, tagging failures with
	/// the field being populated.
	pub(crate) fn produce<T: Any>(&self, field: &str, lookup: &Lookup<'_>) -> Option<Result<T>> {
		let factory = self.map.get(&TypeId::of::<T>())?;
		Some(match factory(lookup) {
			Ok(value) => match value.downcast::<T>() {
				Ok(value) => Ok(*value),
				Err(_) => Err(FromEnvError::FactoryType {
					field: field.to_string(),
					type_name: any::type_name::<T>(),
				}),
			},
			Err(source) => Err(FromEnvError::Factory {
				field: field.to_string(),
				source: Box::new(source),
			}),
		})
	}
}
