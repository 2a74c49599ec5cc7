//! Helpers for byte newtypes that are displayed and serialized as hex strings

/// Implements hex based [Debug], [Display], [FromStr], `Serialize` and `Deserialize`
/// for a fixed size byte array newtype.
///
/// [Debug]: core::fmt::Debug
/// [Display]: core::fmt::Display
/// [FromStr]: core::str::FromStr
#[macro_export]
macro_rules! fixed_byte_string {
	($name:ident, $len:expr) => {
		impl $name {
			/// Returns the hex encoding of the wrapped bytes
			pub fn to_hex_string(&self) -> String {
				hex::encode(self.0)
			}
		}

		impl core::fmt::Debug for $name {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				write!(f, "{}({})", stringify!($name), self.to_hex_string())
			}
		}

		impl core::fmt::Display for $name {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				f.write_str(&self.to_hex_string())
			}
		}

		impl TryFrom<Vec<u8>> for $name {
			type Error = String;

			fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
				let len = value.len();
				<[u8; $len]>::try_from(value).map(Self).map_err(|_| {
					format!("{} must be {} bytes long, got {}", stringify!($name), $len, len)
				})
			}
		}

		impl core::str::FromStr for $name {
			type Err = String;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
					.map_err(|e| format!("{} is not valid hex: {e}", stringify!($name)))?;
				Self::try_from(bytes)
			}
		}

		impl serde::Serialize for $name {
			fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.serialize_str(&self.to_hex_string())
			}
		}

		impl<'de> serde::Deserialize<'de> for $name {
			fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				let s = String::deserialize(deserializer)?;
				s.parse().map_err(serde::de::Error::custom)
			}
		}
	};
}
