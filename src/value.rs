use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Failure reported by a leaf value parser, before field context is attached.
pub type ValueError = Box<dyn Error + Send + Sync>;

/// A leaf value that can be parsed from the raw text of an environment
/// variable.
///
/// Durations use humantime's notation (`15m`, `11h`, `1h30m`). `Option<T>`
/// wraps a present value in `Some`; `Vec<T>` splits on commas, with the empty
/// string parsing to an empty vector.
pub trait EnvValue: Sized {
	fn parse(raw: &str) -> Result<Self, ValueError>;
}

macro_rules! from_str_values {
	($($ty:ty),* $(,)?) => {
		$(impl EnvValue for $ty {
			fn parse(raw: &str) -> Result<Self, ValueError> {
				raw.parse().map_err(Into::into)
			}
		})*
	};
}

from_str_values! {
	String, bool, char,
	u8, u16, u32, u64, u128, usize,
	i8, i16, i32, i64, i128, isize,
	f32, f64,
	PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr,
}

impl EnvValue for Duration {
	fn parse(raw: &str) -> Result<Self, ValueError> {
		humantime::parse_duration(raw).map_err(Into::into)
	}
}

impl<T: EnvValue> EnvValue for Option<T> {
	fn parse(raw: &str) -> Result<Self, ValueError> {
		T::parse(raw).map(Some)
	}
}

impl<T: EnvValue> EnvValue for Vec<T> {
	fn parse(raw: &str) -> Result<Self, ValueError> {
		if raw.is_empty() {
			return Ok(Vec::new());
		}
		raw.split(',').map(T::parse).collect()
	}
}
