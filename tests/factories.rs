use std::time::Duration;

use envcascade::{process, process_with, Factories, FromEnv, FromEnvError, Lookup};

// A handle type outside the derive's reach; only a registered factory can
// build it.
#[derive(Clone, Debug, Default, PartialEq)]
struct MetricsHandle {
	endpoint: String,
	interval: Duration,
}

// Mirror struct a factory populates through its lookup before converting
// into the foreign handle.
#[derive(Clone, Debug, Default, PartialEq, FromEnv)]
struct MetricsEnv {
	endpoint: String,
	#[env(name = "interval", default = "10s")]
	interval: Duration,
}

#[derive(Clone, Debug, Default, PartialEq, FromEnv)]
struct PubSubConfig {
	#[env(name = "topic")]
	topic: String,
	#[env(name = "max_extension", default = "15m")]
	max_extension: Duration,
}

#[derive(Clone, Debug, Default, PartialEq, FromEnv)]
struct ServiceConfig {
	#[env(flatten, factory)]
	metrics: MetricsHandle,
	#[env(nested)]
	pub_sub_a: PubSubConfig,
	#[env(nested)]
	pub_sub_b: PubSubConfig,
}

#[derive(Clone, Debug, Default, PartialEq, FromEnv)]
struct WorkerConfig {
	#[env(nested)]
	pub_sub: PubSubConfig,
	#[env(nested)]
	backup: PubSubConfig,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Unrelated;

fn register_metrics_factory(factories: &mut Factories) {
	factories.register(|lookup: &Lookup| {
		let mut env = MetricsEnv::default();
		lookup.populate(&mut env)?;
		Ok(MetricsHandle {
			endpoint: env.endpoint,
			interval: env.interval,
		})
	});
}

#[test]
fn factories_build_registered_types_with_prefixed_lookups() {
	temp_env::with_vars(
		[
			("ENDPOINT", Some("/metrics")),
			("INTERVAL", Some("30s")),
			("PUB_SUB_A_TOPIC", Some("topicA")),
			("PUB_SUB_A_MAX_EXTENSION", Some("11h")),
			("PUB_SUB_B_TOPIC", Some("topicB")),
			("PUB_SUB_B_MAX_EXTENSION", Some("22m")),
		],
		|| {
			let mut factories = Factories::new();
			register_metrics_factory(&mut factories);
			factories.register(|lookup: &Lookup| {
				let mut config = PubSubConfig::default();
				lookup.populate(&mut config)?;
				Ok(config)
			});
			let mut config = ServiceConfig::default();
			process_with("", &mut config, &factories).unwrap();
			assert_eq!(config.metrics.endpoint, "/metrics");
			assert_eq!(config.metrics.interval, Duration::from_secs(30));
			assert_eq!(config.pub_sub_a.topic, "topicA");
			assert_eq!(config.pub_sub_a.max_extension, Duration::from_secs(11 * 3600));
			assert_eq!(config.pub_sub_b.topic, "topicB");
			assert_eq!(config.pub_sub_b.max_extension, Duration::from_secs(22 * 60));
		},
	);
}

// The factory's product lands in the field untouched, even when variables
// that plain recursion would have read are set.
#[test]
fn a_factory_product_is_assigned_verbatim() {
	temp_env::with_vars(
		[("TOPIC", Some("from-env")), ("MAX_EXTENSION", Some("1h"))],
		|| {
			let injected = PubSubConfig {
				topic: "injected".to_string(),
				max_extension: Duration::from_secs(5),
			};
			let mut factories = Factories::new();
			let product = injected.clone();
			factories.register(move |_: &Lookup| Ok(product.clone()));
			let mut config = WorkerConfig::default();
			process_with("test", &mut config, &factories).unwrap();
			assert_eq!(config.pub_sub, injected);
			assert_eq!(config.backup, injected);
		},
	);
}

#[test]
fn unregistered_nested_fields_still_recurse() {
	temp_env::with_vars(
		[
			("PUB_SUB_TOPIC", Some("topicA")),
			("BACKUP_TOPIC", Some("topicB")),
			("MAX_EXTENSION", None),
		],
		|| {
			let mut factories = Factories::new();
			factories.register(|_: &Lookup| Ok(Unrelated));
			let mut config = WorkerConfig::default();
			process_with("", &mut config, &factories).unwrap();
			assert_eq!(config.pub_sub.topic, "topicA");
			assert_eq!(config.backup.topic, "topicB");
			assert_eq!(config.pub_sub.max_extension, Duration::from_secs(15 * 60));
		},
	);
}

#[test]
fn factory_failures_carry_the_field_name() {
	let mut factories = Factories::new();
	factories.register(|_: &Lookup| -> envcascade::Result<PubSubConfig> {
		Err(FromEnvError::Custom("broker catalog unavailable".into()))
	});
	let mut config = WorkerConfig::default();
	let err = process_with("test", &mut config, &factories).unwrap_err();
	match err {
		FromEnvError::Factory { field, source } => {
			assert_eq!(field, "pub_sub");
			assert!(matches!(*source, FromEnvError::Custom(_)));
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn parse_errors_inside_a_factory_lookup_propagate() {
	temp_env::with_vars(
		[("PUB_SUB_MAX_EXTENSION", Some("notaduration"))],
		|| {
			let mut factories = Factories::new();
			factories.register(|lookup: &Lookup| {
				let mut config = PubSubConfig::default();
				lookup.populate(&mut config)?;
				Ok(config)
			});
			let mut config = WorkerConfig::default();
			let err = process_with("", &mut config, &factories).unwrap_err();
			match err {
				FromEnvError::Factory { field, source } => {
					assert_eq!(field, "pub_sub");
					assert!(
						matches!(*source, FromEnvError::Parse { ref field, .. } if field == "max_extension"),
					);
				}
				other => panic!("unexpected error: {other}"),
			}
		},
	);
}

#[test]
fn factory_only_fields_require_a_registration() {
	let mut config = ServiceConfig::default();
	let err = process("", &mut config).unwrap_err();
	match err {
		FromEnvError::MissingFactory { field, .. } => assert_eq!(field, "metrics"),
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn a_registry_without_the_required_type_is_still_missing() {
	let mut factories = Factories::new();
	factories.register(|_: &Lookup| Ok(Unrelated));
	assert_eq!(factories.len(), 1);
	let mut config = ServiceConfig::default();
	let err = process_with("", &mut config, &factories).unwrap_err();
	assert!(matches!(err, FromEnvError::MissingFactory { field, .. } if field == "metrics"));
}
