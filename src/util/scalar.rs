//! Scalar kinds - the eight numeric types a PLY property can store.

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Scalar kind enum - the fixed set of numeric storage types.
///
/// `Unused` is the "no list framing" sentinel used as the list kind of a
/// plain (non-list) property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ScalarKind {
    /// No list framing
    #[default]
    Unused = 0,
    /// Signed 8-bit integer (`char`)
    Int8 = 1,
    /// Unsigned 8-bit integer (`uchar`)
    Uint8 = 2,
    /// Signed 16-bit integer (`short`)
    Int16 = 3,
    /// Unsigned 16-bit integer (`ushort`)
    Uint16 = 4,
    /// Signed 32-bit integer (`int`)
    Int32 = 5,
    /// Unsigned 32-bit integer (`uint`)
    Uint32 = 6,
    /// 32-bit floating point (`float`)
    Float32 = 7,
    /// 64-bit floating point (`double`)
    Float64 = 8,
}

/// Header spellings, indexed by discriminant: (short, descriptive).
const KIND_NAMES: [(&str, &str); 9] = [
    ("unused", "unused"),
    ("char", "int8"),
    ("uchar", "uint8"),
    ("short", "int16"),
    ("ushort", "uint16"),
    ("int", "int32"),
    ("uint", "uint32"),
    ("float", "float32"),
    ("double", "float64"),
];

const KINDS: [ScalarKind; 9] = [
    ScalarKind::Unused,
    ScalarKind::Int8,
    ScalarKind::Uint8,
    ScalarKind::Int16,
    ScalarKind::Uint16,
    ScalarKind::Int32,
    ScalarKind::Uint32,
    ScalarKind::Float32,
    ScalarKind::Float64,
];

impl ScalarKind {
    /// The eight numeric kinds (without `Unused`).
    pub const NUMERIC: [ScalarKind; 8] = [
        ScalarKind::Int8,
        ScalarKind::Uint8,
        ScalarKind::Int16,
        ScalarKind::Uint16,
        ScalarKind::Int32,
        ScalarKind::Uint32,
        ScalarKind::Float32,
        ScalarKind::Float64,
    ];

    /// Returns the size in bytes of one binary-encoded value.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Unused => 0,
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Returns the short header spelling (`uchar`, `float`, ...).
    #[inline]
    pub const fn name(self) -> &'static str {
        KIND_NAMES[self as usize].0
    }

    /// Returns the descriptive header spelling (`uint8`, `float32`, ...).
    #[inline]
    pub const fn long_name(self) -> &'static str {
        KIND_NAMES[self as usize].1
    }

    /// Parse a kind from either header spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        KIND_NAMES
            .iter()
            .position(|(short, long)| *short == name || *long == name)
            .map(|i| KINDS[i])
    }

    /// Returns true for every kind except `Unused`.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Unused)
    }

    /// Returns true if this is a floating point kind.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single value of one of the eight scalar kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    Int8(i8),
    Uint8(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Float32(f32),
    Float64(f64),
}

impl Scalar {
    /// The kind of the held value.
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Int8(_) => ScalarKind::Int8,
            Self::Uint8(_) => ScalarKind::Uint8,
            Self::Int16(_) => ScalarKind::Int16,
            Self::Uint16(_) => ScalarKind::Uint16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Uint32(_) => ScalarKind::Uint32,
            Self::Float32(_) => ScalarKind::Float32,
            Self::Float64(_) => ScalarKind::Float64,
        }
    }

    /// Numeric cast to a Rust type, with `as` semantics.
    ///
    /// Never fails: narrowing wraps (integers) or saturates (float to int).
    #[inline]
    pub fn cast<T: PlyPod>(self) -> T {
        T::from_scalar(self)
    }

    /// Numeric cast to another kind. Casting to `Unused` is the identity.
    pub fn cast_to(self, kind: ScalarKind) -> Scalar {
        match kind {
            ScalarKind::Unused => self,
            ScalarKind::Int8 => Self::Int8(self.cast()),
            ScalarKind::Uint8 => Self::Uint8(self.cast()),
            ScalarKind::Int16 => Self::Int16(self.cast()),
            ScalarKind::Uint16 => Self::Uint16(self.cast()),
            ScalarKind::Int32 => Self::Int32(self.cast()),
            ScalarKind::Uint32 => Self::Uint32(self.cast()),
            ScalarKind::Float32 => Self::Float32(self.cast()),
            ScalarKind::Float64 => Self::Float64(self.cast()),
        }
    }

    /// Interpret the value as a list length.
    ///
    /// Returns `None` for negative, fractional or non-finite values.
    pub fn to_len(self) -> Option<usize> {
        match self {
            Self::Int8(v) => usize::try_from(v).ok(),
            Self::Uint8(v) => Some(v as usize),
            Self::Int16(v) => usize::try_from(v).ok(),
            Self::Uint16(v) => Some(v as usize),
            Self::Int32(v) => usize::try_from(v).ok(),
            Self::Uint32(v) => usize::try_from(v).ok(),
            Self::Float32(v) => float_len(v as f64),
            Self::Float64(v) => float_len(v),
        }
    }
}

fn float_len(v: f64) -> Option<usize> {
    (v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64).then_some(v as usize)
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int8(v) => write!(f, "{v}"),
            Self::Uint8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Uint16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Uint32(v) => write!(f, "{v}"),
            Self::Float32(v) => f.write_str(&shortest_float(*v)),
            Self::Float64(v) => f.write_str(&shortest_float(*v)),
        }
    }
}

/// Shortest round-trip text for a float, in plain or exponent notation.
///
/// Both forms carry the minimal digits; the exponent form is chosen only
/// when it is shorter even counted with a sign and two exponent digits
/// (`1e300`, `1e-45`, but `3000` and `0.25`).
fn shortest_float<T: fmt::Display + fmt::LowerExp>(v: T) -> String {
    let plain = v.to_string();
    let exp = format!("{v:e}");
    let exp_len = match exp.split_once('e') {
        Some((mantissa, exponent)) => {
            mantissa.len() + 2 + exponent.trim_start_matches('-').len().max(2)
        }
        None => usize::MAX,
    };
    if exp_len < plain.len() {
        exp
    } else {
        plain
    }
}

// === POD Trait for type-safe conversions ===

/// Trait for Rust types that map onto one PLY scalar kind.
pub trait PlyPod: Pod + Zeroable + Copy + Default + PartialEq + fmt::Debug {
    /// The corresponding ScalarKind value.
    const KIND: ScalarKind;

    /// Size of this type in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Numeric cast from any scalar.
    fn from_scalar(value: Scalar) -> Self;

    /// Wrap into the matching scalar variant.
    fn into_scalar(self) -> Scalar;
}

macro_rules! impl_ply_pod {
    ($ty:ty, $variant:ident) => {
        impl PlyPod for $ty {
            const KIND: ScalarKind = ScalarKind::$variant;

            #[inline]
            fn from_scalar(value: Scalar) -> Self {
                match value {
                    Scalar::Int8(v) => v as $ty,
                    Scalar::Uint8(v) => v as $ty,
                    Scalar::Int16(v) => v as $ty,
                    Scalar::Uint16(v) => v as $ty,
                    Scalar::Int32(v) => v as $ty,
                    Scalar::Uint32(v) => v as $ty,
                    Scalar::Float32(v) => v as $ty,
                    Scalar::Float64(v) => v as $ty,
                }
            }

            #[inline]
            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }
        }

        impl From<$ty> for Scalar {
            #[inline]
            fn from(v: $ty) -> Self {
                Scalar::$variant(v)
            }
        }
    };
}

impl_ply_pod!(i8, Int8);
impl_ply_pod!(u8, Uint8);
impl_ply_pod!(i16, Int16);
impl_ply_pod!(u16, Uint16);
impl_ply_pod!(i32, Int32);
impl_ply_pod!(u32, Uint32);
impl_ply_pod!(f32, Float32);
impl_ply_pod!(f64, Float64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sizes() {
        assert_eq!(ScalarKind::Int8.num_bytes(), 1);
        assert_eq!(ScalarKind::Uint16.num_bytes(), 2);
        assert_eq!(ScalarKind::Float32.num_bytes(), 4);
        assert_eq!(ScalarKind::Float64.num_bytes(), 8);
        assert_eq!(ScalarKind::Unused.num_bytes(), 0);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ScalarKind::from_name("uchar"), Some(ScalarKind::Uint8));
        assert_eq!(ScalarKind::from_name("uint8"), Some(ScalarKind::Uint8));
        assert_eq!(ScalarKind::from_name("float64"), Some(ScalarKind::Float64));
        assert_eq!(ScalarKind::from_name("quad"), None);
        assert_eq!(ScalarKind::Float32.name(), "float");
        assert_eq!(ScalarKind::Float32.long_name(), "float32");
    }

    #[test]
    fn test_kind_name_roundtrip() {
        for kind in ScalarKind::NUMERIC {
            assert_eq!(ScalarKind::from_name(kind.name()), Some(kind));
            assert_eq!(ScalarKind::from_name(kind.long_name()), Some(kind));
        }
    }

    #[test]
    fn test_cast() {
        assert_eq!(Scalar::Float32(3.75).cast::<i32>(), 3);
        assert_eq!(Scalar::Int16(-1).cast::<u8>(), 255);
        assert_eq!(Scalar::Uint8(200).cast::<f64>(), 200.0);
        assert_eq!(Scalar::Float64(1e10).cast::<i32>(), i32::MAX);
        assert_eq!(Scalar::Int32(7).cast_to(ScalarKind::Float32), Scalar::Float32(7.0));
        assert_eq!(Scalar::Int32(7).cast_to(ScalarKind::Unused), Scalar::Int32(7));
    }

    #[test]
    fn test_to_len() {
        assert_eq!(Scalar::Uint8(5).to_len(), Some(5));
        assert_eq!(Scalar::Int8(-1).to_len(), None);
        assert_eq!(Scalar::Float32(2.0).to_len(), Some(2));
        assert_eq!(Scalar::Float32(2.5).to_len(), None);
        assert_eq!(Scalar::Float64(f64::NAN).to_len(), None);
    }

    #[test]
    fn test_float_text_is_short() {
        assert_eq!(Scalar::Float64(1e300).to_string(), "1e300");
        assert_eq!(Scalar::Float64(-2.5e-300).to_string(), "-2.5e-300");
        assert_eq!(Scalar::Float32(1e-45).to_string(), "1e-45");
        assert_eq!(Scalar::Float32(1e30).to_string(), "1e30");
        assert_eq!(Scalar::Float64(100000.0).to_string(), "1e5");
        assert_eq!(Scalar::Float64(3000.0).to_string(), "3000");
        assert_eq!(Scalar::Float32(0.25).to_string(), "0.25");
        assert_eq!(Scalar::Float32(-0.0).to_string(), "-0");
        assert_eq!(Scalar::Float64(f64::INFINITY).to_string(), "inf");
        assert_eq!(Scalar::Int32(-7).to_string(), "-7");
    }

    #[test]
    fn test_pod_kinds() {
        assert_eq!(<u8 as PlyPod>::KIND, ScalarKind::Uint8);
        assert_eq!(<f64 as PlyPod>::KIND, ScalarKind::Float64);
        assert_eq!(<i16 as PlyPod>::SIZE, 2);
        assert_eq!(Scalar::from(1.5f32).kind(), ScalarKind::Float32);
    }
}
