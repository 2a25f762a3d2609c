use crate::Factories;

/// Name-resolution context for one level of a configuration tree.
///
/// A scope is the chain of lower-cased name segments accumulated while
/// descending from the caller-supplied prefix into named sub-configurations,
/// plus the factory registry for the current call. Flattened fields reuse
/// their parent's scope, so they add no segment.
pub struct Scope<'f> {
	segments: Vec<String>,
	factories: Option<&'f Factories>,
}

impl<'f> Scope<'f> {
	pub(crate) fn root(prefix: &str, factories: Option<&'f Factories>) -> Self {
		let mut segments = Vec::new();
		if !prefix.is_empty() {
			segments.push(prefix.to_ascii_lowercase());
		}
		Scope {
			segments,
			factories,
		}
	}

	/// Scope for a nested configuration field; `None` keeps the chain
	/// unchanged (flattened fields), `Some` descends one level.
	pub(crate) fn child(&self, segment: Option<&str>) -> Scope<'f> {
		let mut segments = self.segments.clone();
		if let Some(segment) = segment {
			segments.push(segment.to_ascii_lowercase());
		}
		Scope {
			segments,
			factories: self.factories,
		}
	}

	pub(crate) fn factories(&self) -> Option<&'f Factories> {
		self.factories
	}

	/// The joined chain, as it would prefix a variable name.
	pub(crate) fn prefix(&self) -> String {
		self.segments.join("_").to_ascii_uppercase()
	}

	/// Environment variable names to probe for a leaf, most specific first.
	///
	/// One candidate per suffix of the segment chain, ending with the bare
	/// leaf name, all upper-cased. A qualified name therefore always beats
	/// the bare name when both are set.
	pub(crate) fn candidates(&self, leaf: &str) -> Vec<String> {
		(0..=self.segments.len())
			.map(|skip| {
				let mut name = String::new();
				for segment in &self.segments[skip..] {
					name.push_str(segment);
					name.push('_');
				}
				name.push_str(leaf);
				name.to_ascii_uppercase()
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bare_name_is_the_only_candidate_without_a_prefix() {
		let scope = Scope::root("", None);
		assert_eq!(scope.candidates("topic"), ["TOPIC"]);
	}

	#[test]
	fn prefixed_candidate_comes_first() {
		let scope = Scope::root("test", None);
		assert_eq!(scope.candidates("topic"), ["TEST_TOPIC", "TOPIC"]);
	}

	#[test]
	fn each_nesting_level_adds_one_suffix_candidate() {
		let scope = Scope::root("test", None).child(Some("pubsuba"));
		assert_eq!(
			scope.candidates("topic"),
			["TEST_PUBSUBA_TOPIC", "PUBSUBA_TOPIC", "TOPIC"],
		);
	}

	#[test]
	fn flattened_children_keep_their_parents_chain() {
		let scope = Scope::root("test", None).child(None);
		assert_eq!(scope.candidates("http_port"), ["TEST_HTTP_PORT", "HTTP_PORT"]);
	}

	#[test]
	fn segments_are_case_normalized() {
		let scope = Scope::root("Test", None).child(Some("PubSub"));
		assert_eq!(scope.prefix(), "TEST_PUBSUB");
		assert_eq!(
			scope.candidates("Topic"),
			["TEST_PUBSUB_TOPIC", "PUBSUB_TOPIC", "TOPIC"],
		);
	}
}
