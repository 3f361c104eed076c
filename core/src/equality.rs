//! Shallow equality.
//!
//! The selector cache decides whether a freshly derived value can be replaced
//! by the previously cached one. That decision looks exactly one level deep:
//! the direct members of two values are compared by identity ([`SameValue`]),
//! never recursively.
//!
//! Identity for owned Rust values means:
//! - scalars and strings (owned or borrowed) compare by value
//! - floats compare by bit pattern (`NaN` equals itself, `0.0` differs from `-0.0`)
//! - `Arc` and `Rc` compare by pointer
//!
//! Nested structures that should take part in a shallow comparison therefore
//! belong behind an `Arc`.
//!
//! # Example
//!
//! ```
//! use bridged_store_core::equality::shallow_eq;
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! let a = Arc::new(BTreeMap::from([("a", 1)]));
//! let b = Arc::new(BTreeMap::from([("a", 1)]));
//! assert!(shallow_eq(&a, &b));
//!
//! let inner = Arc::new(vec![1]);
//! let x = vec![Arc::clone(&inner)];
//! let y = vec![Arc::new(vec![1])];
//! assert!(shallow_eq(&x, &vec![Arc::clone(&inner)]));
//! assert!(!shallow_eq(&x, &y));
//! ```

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

/// Identity comparison of a single member
pub trait SameValue {
    /// `true` if `self` and `other` are the same value
    fn same_value(&self, other: &Self) -> bool;
}

/// One-level structural comparison
pub trait ShallowEq {
    /// `true` if the direct members of `self` and `other` are the same values
    fn shallow_eq(&self, other: &Self) -> bool;
}

/// Default equality predicate for the selector cache
#[must_use]
pub fn shallow_eq<T: ShallowEq + ?Sized>(a: &T, b: &T) -> bool {
    a.shallow_eq(b)
}

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SameValue for $ty {
                #[inline]
                fn same_value(&self, other: &Self) -> bool {
                    self == other
                }
            }

            impl ShallowEq for $ty {
                #[inline]
                fn shallow_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

scalar!(
    (), bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, String, str,
);

macro_rules! float {
    ($($ty:ty),*) => {
        $(
            impl SameValue for $ty {
                #[inline]
                fn same_value(&self, other: &Self) -> bool {
                    self.to_bits() == other.to_bits()
                }
            }

            impl ShallowEq for $ty {
                #[inline]
                fn shallow_eq(&self, other: &Self) -> bool {
                    self.same_value(other)
                }
            }
        )*
    };
}

float!(f32, f64);

impl SameValue for &str {
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

impl ShallowEq for &str {
    fn shallow_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: ?Sized> SameValue for Arc<T> {
    fn same_value(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> SameValue for Rc<T> {
    fn same_value(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: SameValue> SameValue for Option<T> {
    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_value(b),
            (None, None) => true,
            _ => false,
        }
    }
}

// A shared pointer is shallow-equal to another if it is the same allocation,
// or if the pointees' direct members are the same values.
impl<T: ShallowEq + ?Sized> ShallowEq for Arc<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other) || (**self).shallow_eq(other)
    }
}

impl<T: ShallowEq + ?Sized> ShallowEq for Rc<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other) || (**self).shallow_eq(other)
    }
}

impl<T: SameValue> ShallowEq for Option<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

impl<T: SameValue> ShallowEq for [T] {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same_value(b))
    }
}

impl<T: SameValue, const N: usize> ShallowEq for [T; N] {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.as_slice().shallow_eq(other.as_slice())
    }
}

impl<T: SameValue> ShallowEq for Vec<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.as_slice().shallow_eq(other.as_slice())
    }
}

impl<T: SameValue> ShallowEq for VecDeque<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same_value(b))
    }
}

impl<K, V, H> ShallowEq for HashMap<K, V, H>
where
    K: Eq + Hash,
    V: SameValue,
    H: BuildHasher,
{
    fn shallow_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, a)| other.get(key).is_some_and(|b| a.same_value(b)))
    }
}

impl<K: Ord, V: SameValue> ShallowEq for BTreeMap<K, V> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, a)| other.get(key).is_some_and(|b| a.same_value(b)))
    }
}

macro_rules! tuple {
    ($(($($name:ident : $idx:tt),+)),* $(,)?) => {
        $(
            impl<$($name: SameValue),+> ShallowEq for ($($name,)+) {
                fn shallow_eq(&self, other: &Self) -> bool {
                    $(self.$idx.same_value(&other.$idx))&&+
                }
            }
        )*
    };
}

tuple!(
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3),
);

/// Implement [`ShallowEq`] for a struct by comparing the listed fields with
/// [`SameValue`]
///
/// Fields left out of the list are ignored by the comparison.
///
/// # Example
///
/// ```
/// use bridged_store_core::equality::shallow_eq;
/// use bridged_store_core::shallow_eq_fields;
/// use std::sync::Arc;
///
/// struct Summary {
///     total: u32,
///     titles: Arc<Vec<String>>,
/// }
///
/// shallow_eq_fields!(Summary { total, titles });
///
/// let titles = Arc::new(vec!["milk".to_string()]);
/// let a = Summary { total: 1, titles: Arc::clone(&titles) };
/// let b = Summary { total: 1, titles };
/// let c = Summary { total: 1, titles: Arc::new(vec!["milk".to_string()]) };
///
/// assert!(shallow_eq(&a, &b));
/// assert!(!shallow_eq(&a, &c));
/// ```
#[macro_export]
macro_rules! shallow_eq_fields {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::equality::ShallowEq for $ty {
            fn shallow_eq(&self, other: &Self) -> bool {
                $($crate::equality::SameValue::same_value(&self.$field, &other.$field))&&+
            }
        }
    };
}
