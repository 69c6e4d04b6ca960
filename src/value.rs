//! Resolution of dynamically typed attribute input into tagged values.
//!
//! Declarative attribute calls hand over whatever the caller wrote, which is captured as [`RawValue`].
//! Each attribute resolves that once, at the call boundary, into the value type its native setter accepts.
//! Anything that doesn't fit resolves to [`None`], which [`Component::set_slot`](`crate::Component::set_slot`) treats as a reset.

use core::convert::TryFrom;

/// A reference into the application's resource table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceRef {
	pub id: u32,
	pub kind: ResourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
	Color,
	Float,
	Integer,
	String,
	Media,
}

/// An attribute argument as written by the caller, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
	Number(f64),
	Str(String),
	Bool(bool),
	Resource(ResourceRef),
	Undefined,
}
impl From<f64> for RawValue {
	fn from(number: f64) -> Self {
		Self::Number(number)
	}
}
impl From<u32> for RawValue {
	fn from(number: u32) -> Self {
		Self::Number(number.into())
	}
}
impl From<i32> for RawValue {
	fn from(number: i32) -> Self {
		Self::Number(number.into())
	}
}
impl From<bool> for RawValue {
	fn from(flag: bool) -> Self {
		Self::Bool(flag)
	}
}
impl From<&str> for RawValue {
	fn from(text: &str) -> Self {
		Self::Str(text.to_owned())
	}
}
impl From<String> for RawValue {
	fn from(text: String) -> Self {
		Self::Str(text)
	}
}
impl From<ResourceRef> for RawValue {
	fn from(resource: ResourceRef) -> Self {
		Self::Resource(resource)
	}
}
impl<T: Into<RawValue>> From<Option<T>> for RawValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Undefined, Into::into)
	}
}

/// A colour as accepted by native colour setters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Color {
	/// `0xAARRGGBB`. Values without alpha channel are made opaque during resolution.
	Numeric(u32),
	/// A colour name or `#`-prefixed hex string, passed through to the native side.
	Named(String),
	Resource(ResourceRef),
}
impl Color {
	/// Resolves numbers, colour strings and colour resources.
	///
	/// Numbers must be integral and fit into 32 bits.
	/// Strings must be a `#RGB`, `#ARGB`, `#RRGGBB` or `#AARRGGBB` hex code or an ASCII-alphabetic name.
	#[must_use]
	pub fn resolve(raw: &RawValue) -> Option<Self> {
		match raw {
			&RawValue::Number(number) => integral_u32(number).map(|argb| Self::Numeric(with_default_alpha(argb))),
			RawValue::Str(text) => {
				let text = text.trim();
				if is_hex_color(text) || (!text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic())) {
					Some(Self::Named(text.to_owned()))
				} else {
					None
				}
			}
			&RawValue::Resource(resource) if resource.kind == ResourceKind::Color => Some(Self::Resource(resource)),
			RawValue::Resource(_) | RawValue::Bool(_) | RawValue::Undefined => None,
		}
	}
}

fn with_default_alpha(argb: u32) -> u32 {
	if argb > 0x00FF_FFFF {
		argb
	} else {
		argb | 0xFF00_0000
	}
}

fn is_hex_color(text: &str) -> bool {
	match text.strip_prefix('#') {
		Some(digits) => matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit()),
		None => false,
	}
}

#[allow(clippy::cast_possible_truncation)]
fn integral_i32(number: f64) -> Option<i32> {
	if number.is_finite() && number.fract() == 0.0 && number >= f64::from(i32::MIN) && number <= f64::from(i32::MAX) {
		Some(number as i32)
	} else {
		None
	}
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn integral_u32(number: f64) -> Option<u32> {
	if number.is_finite() && number.fract() == 0.0 && number >= 0.0 && number <= f64::from(u32::MAX) {
		Some(number as u32)
	} else {
		None
	}
}

/// A length in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
	Vp(f64),
	Resource(ResourceRef),
}
impl Length {
	/// Resolves finite non-negative numbers, strings ending in `vp` and numeric resources.
	#[must_use]
	pub fn resolve(raw: &RawValue) -> Option<Self> {
		let vp = match raw {
			&RawValue::Number(number) => number,
			RawValue::Str(text) => {
				let text = text.trim();
				text.strip_suffix("vp").unwrap_or(text).trim_end().parse().ok()?
			}
			&RawValue::Resource(resource) => {
				return match resource.kind {
					ResourceKind::Float | ResourceKind::Integer => Some(Self::Resource(resource)),
					_ => None,
				}
			}
			RawValue::Bool(_) | RawValue::Undefined => return None,
		};
		if vp.is_finite() && vp >= 0.0 {
			Some(Self::Vp(vp))
		} else {
			None
		}
	}
}

/// Resolves a boolean flag. Only actual booleans are accepted.
#[must_use]
pub fn resolve_bool(raw: &RawValue) -> Option<bool> {
	match raw {
		&RawValue::Bool(flag) => Some(flag),
		_ => None,
	}
}

/// Resolves an integral enum index through `E`'s [`TryFrom<i32>`] conversion.
///
/// Out-of-range indices resolve to [`None`], so the attribute reverts to its native default.
#[must_use]
pub fn resolve_enum<E: TryFrom<i32>>(raw: &RawValue) -> Option<E> {
	match raw {
		&RawValue::Number(number) => integral_i32(number).and_then(|index| E::try_from(index).ok()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, PartialEq)]
	enum Mode {
		Stack,
		Split,
	}
	impl TryFrom<i32> for Mode {
		type Error = ();

		fn try_from(index: i32) -> Result<Self, ()> {
			match index {
				0 => Ok(Self::Stack),
				1 => Ok(Self::Split),
				_ => Err(()),
			}
		}
	}

	#[test]
	fn numeric_color_gets_opaque_alpha() {
		assert_eq!(Color::resolve(&0x00FF_0000_u32.into()), Some(Color::Numeric(0xFFFF_0000)));
		assert_eq!(Color::resolve(&0x80FF_0000_u32.into()), Some(Color::Numeric(0x80FF_0000)));
	}

	#[test]
	fn invalid_colors() {
		assert_eq!(Color::resolve(&RawValue::Number(-1.0)), None);
		assert_eq!(Color::resolve(&RawValue::Number(1.5)), None);
		assert_eq!(Color::resolve(&RawValue::Number(f64::from(u32::MAX) + 1.0)), None);
		assert_eq!(Color::resolve(&"#12".into()), None);
		assert_eq!(Color::resolve(&"not a colour".into()), None);
		assert_eq!(Color::resolve(&RawValue::Undefined), None);
		assert_eq!(
			Color::resolve(&ResourceRef { id: 7, kind: ResourceKind::String }.into()),
			None
		);
	}

	#[test]
	fn named_and_resource_colors() {
		assert_eq!(Color::resolve(&" #A0ff00 ".into()), Some(Color::Named("#A0ff00".to_owned())));
		assert_eq!(Color::resolve(&"red".into()), Some(Color::Named("red".to_owned())));
		let resource = ResourceRef { id: 7, kind: ResourceKind::Color };
		assert_eq!(Color::resolve(&resource.into()), Some(Color::Resource(resource)));
	}

	#[test]
	fn lengths() {
		assert_eq!(Length::resolve(&RawValue::Number(12.0)), Some(Length::Vp(12.0)));
		assert_eq!(Length::resolve(&"8vp".into()), Some(Length::Vp(8.0)));
		assert_eq!(Length::resolve(&"8".into()), Some(Length::Vp(8.0)));
		assert_eq!(Length::resolve(&RawValue::Number(-1.0)), None);
		assert_eq!(Length::resolve(&RawValue::Number(f64::NAN)), None);
		assert_eq!(Length::resolve(&"wide".into()), None);
	}

	#[test]
	fn enum_out_of_range_is_absent() {
		assert_eq!(resolve_enum::<Mode>(&RawValue::Number(1.0)), Some(Mode::Split));
		assert_eq!(resolve_enum::<Mode>(&RawValue::Number(0.0)), Some(Mode::Stack));
		assert_eq!(resolve_enum::<Mode>(&RawValue::Number(2.0)), None);
		assert_eq!(resolve_enum::<Mode>(&RawValue::Number(0.5)), None);
		assert_eq!(resolve_enum::<Mode>(&"1".into()), None);
	}

	#[test]
	fn enum_index_beyond_i32_is_absent() {
		assert_eq!(resolve_enum::<i64>(&RawValue::Number(f64::from(i32::MAX))), Some(i64::from(i32::MAX)));
		assert_eq!(resolve_enum::<i64>(&RawValue::Number(f64::from(i32::MIN))), Some(i64::from(i32::MIN)));
		assert_eq!(resolve_enum::<i64>(&RawValue::Number(f64::from(i32::MAX) + 1.0)), None);
		assert_eq!(resolve_enum::<i64>(&RawValue::Number(f64::from(i32::MIN) - 1.0)), None);
		assert_eq!(resolve_enum::<i64>(&RawValue::Number(f64::INFINITY)), None);
		assert_eq!(resolve_enum::<i64>(&RawValue::Number(f64::NAN)), None);
	}

	#[test]
	fn bools() {
		assert_eq!(resolve_bool(&true.into()), Some(true));
		assert_eq!(resolve_bool(&RawValue::Number(1.0)), None);
		assert_eq!(resolve_bool(&Option::<bool>::None.into()), None);
	}
}
