//! Row shapes and row containers for column bindings.
//!
//! A row is declared field by field through [`ScalarRow`] or [`ListRow`],
//! so the engine never reinterprets caller memory as a different type.

use smallvec::SmallVec;

use crate::core::Element;
use crate::util::{Error, PlyPod, Result};

/// A row made of a fixed number of scalar fields of one kind.
///
/// Implemented for the eight primitive kinds (arity 1), `[T; N]` and the
/// common `glam` vectors. Implement it for your own row structs to bind
/// them directly.
pub trait ScalarRow {
    /// Field type.
    type Value: PlyPod;

    /// Number of fields per row.
    const ARITY: usize;

    /// A fresh row used when an owned container grows.
    fn empty() -> Self;

    /// Read field `index`.
    fn get(&self, index: usize) -> Self::Value;

    /// Write field `index`.
    fn set(&mut self, index: usize, value: Self::Value);
}

macro_rules! impl_scalar_row_primitive {
    ($($ty:ty),*) => {
        $(
            impl ScalarRow for $ty {
                type Value = $ty;
                const ARITY: usize = 1;

                #[inline]
                fn empty() -> Self {
                    <$ty>::default()
                }

                #[inline]
                fn get(&self, _index: usize) -> $ty {
                    *self
                }

                #[inline]
                fn set(&mut self, _index: usize, value: $ty) {
                    *self = value;
                }
            }
        )*
    };
}

impl_scalar_row_primitive!(i8, u8, i16, u16, i32, u32, f32, f64);

impl<T: PlyPod, const N: usize> ScalarRow for [T; N] {
    type Value = T;
    const ARITY: usize = N;

    #[inline]
    fn empty() -> Self {
        [T::default(); N]
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self[index]
    }

    #[inline]
    fn set(&mut self, index: usize, value: T) {
        self[index] = value;
    }
}

macro_rules! impl_scalar_row_glam {
    ($($ty:ty => $value:ty, $arity:expr);* $(;)?) => {
        $(
            impl ScalarRow for $ty {
                type Value = $value;
                const ARITY: usize = $arity;

                #[inline]
                fn empty() -> Self {
                    <$ty>::ZERO
                }

                #[inline]
                fn get(&self, index: usize) -> $value {
                    self[index]
                }

                #[inline]
                fn set(&mut self, index: usize, value: $value) {
                    self[index] = value;
                }
            }
        )*
    };
}

impl_scalar_row_glam! {
    glam::Vec2 => f32, 2;
    glam::Vec3 => f32, 3;
    glam::Vec4 => f32, 4;
    glam::DVec3 => f64, 3;
    glam::UVec3 => u32, 3;
    glam::IVec3 => i32, 3;
}

/// A list-valued row: a length-prefixed run of scalars.
pub trait ListRow {
    /// Element type.
    type Value: PlyPod;

    /// `None` for open-ended lists, `Some(n)` for fixed-capacity lists.
    const CAPACITY: Option<usize>;

    /// A fresh row used when an owned container grows.
    fn empty() -> Self;

    /// Prepare to receive a list of `len` values.
    fn begin(&mut self, len: usize);

    /// Store value `index`; returns `false` if it does not fit.
    fn put(&mut self, index: usize, value: Self::Value) -> bool;

    /// Values to write.
    fn values(&self) -> &[Self::Value];
}

impl<T: PlyPod> ListRow for Vec<T> {
    type Value = T;
    const CAPACITY: Option<usize> = None;

    fn empty() -> Self {
        Vec::new()
    }

    fn begin(&mut self, len: usize) {
        self.clear();
        // The count comes from the file; do not trust it for allocation.
        self.reserve(len.min(1 << 16));
    }

    fn put(&mut self, _index: usize, value: T) -> bool {
        self.push(value);
        true
    }

    fn values(&self) -> &[T] {
        self
    }
}

impl<T: PlyPod, const N: usize> ListRow for SmallVec<[T; N]>
where
    [T; N]: smallvec::Array<Item = T>,
{
    type Value = T;
    const CAPACITY: Option<usize> = None;

    fn empty() -> Self {
        SmallVec::new()
    }

    fn begin(&mut self, len: usize) {
        self.clear();
        self.reserve(len.min(1 << 16));
    }

    fn put(&mut self, _index: usize, value: T) -> bool {
        self.push(value);
        true
    }

    fn values(&self) -> &[T] {
        self
    }
}

impl<T: PlyPod, const N: usize> ListRow for [T; N] {
    type Value = T;
    const CAPACITY: Option<usize> = Some(N);

    fn empty() -> Self {
        [T::default(); N]
    }

    fn begin(&mut self, _len: usize) {}

    fn put(&mut self, index: usize, value: T) -> bool {
        match self.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn values(&self) -> &[T] {
        self
    }
}

/// Caller-owned row storage bound to a column.
pub enum Rows<'a, R> {
    /// Resizable container; resized to the element's row count on read.
    Owned(&'a mut Vec<R>),
    /// Fixed-size view; its length must already equal the row count.
    Borrowed(&'a mut [R]),
    /// Read-only view, usable for writing only.
    View(&'a [R]),
}

impl<'a, R> Rows<'a, R> {
    /// Number of rows currently held.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Check if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the engine may resize the container.
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// All rows.
    pub fn as_slice(&self) -> &[R] {
        match self {
            Self::Owned(v) => &v[..],
            Self::Borrowed(s) => &s[..],
            Self::View(s) => &s[..],
        }
    }

    /// All rows, mutably; `None` for read-only views.
    pub fn as_mut_slice(&mut self) -> Option<&mut [R]> {
        match self {
            Self::Owned(v) => Some(&mut v[..]),
            Self::Borrowed(s) => Some(&mut s[..]),
            Self::View(_) => None,
        }
    }

    /// Fit the container to `element`: resize owned storage, check borrowed
    /// storage, reject views.
    pub(crate) fn attach(&mut self, element: &Element, empty: fn() -> R) -> Result<()> {
        match self {
            Self::Owned(v) => {
                v.truncate(element.count);
                v.resize_with(element.count, empty);
                Ok(())
            }
            Self::Borrowed(s) if s.len() == element.count => Ok(()),
            Self::Borrowed(s) => Err(Error::ElementCountMismatch {
                element: element.name.clone(),
                expected: element.count,
                actual: s.len(),
            }),
            Self::View(_) => Err(Error::ReadOnlyColumn(element.name.clone())),
        }
    }
}

impl<'a, R> From<&'a mut Vec<R>> for Rows<'a, R> {
    fn from(v: &'a mut Vec<R>) -> Self {
        Self::Owned(v)
    }
}

impl<'a, R> From<&'a mut [R]> for Rows<'a, R> {
    fn from(s: &'a mut [R]) -> Self {
        Self::Borrowed(s)
    }
}

impl<'a, R> From<&'a [R]> for Rows<'a, R> {
    fn from(s: &'a [R]) -> Self {
        Self::View(s)
    }
}

impl<'a, R> From<&'a Vec<R>> for Rows<'a, R> {
    fn from(v: &'a Vec<R>) -> Self {
        Self::View(v)
    }
}
