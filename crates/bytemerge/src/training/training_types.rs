//! # Training Types
//!
//! Bounds on the trainer's word key (`K`) and frequency (`C`) parameters.
use core::{
    borrow::Borrow,
    fmt::{Debug, Display},
    hash::Hash,
    ops::AddAssign,
};

use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

use crate::errors::{BMResult, BytemergeError};

/// An owned word key, built from each pattern match.
///
/// Keys are totally ordered; word ids follow key order.
pub trait StringChunkType:
    for<'a> From<&'a str> + AsRef<str> + Borrow<str> + Debug + Clone + Send + Sync + Eq + Hash + Ord
{
}

impl<K> StringChunkType for K where
    K: for<'a> From<&'a str>
        + AsRef<str>
        + Borrow<str>
        + Debug
        + Clone
        + Send
        + Sync
        + Eq
        + Hash
        + Ord
{
}

/// An unsigned word or pair frequency.
pub trait CountType:
    'static + PrimInt + Unsigned + FromPrimitive + ToPrimitive + Hash + Default + Debug + Display + Send + Sync + AddAssign
{
    /// Widen to ``u128``, for corpus totals.
    fn widen(self) -> u128 {
        self.to_u128().unwrap_or(u128::MAX)
    }

    /// The signed weight of one word in pair deltas.
    ///
    /// Fails with [`BytemergeError::CountOverflow`] past ``i64::MAX``.
    fn to_weight(self) -> BMResult<i64> {
        self.to_i64().ok_or_else(|| BytemergeError::CountOverflow {
            value: i128::try_from(self.widen()).unwrap_or(i128::MAX),
        })
    }

    /// ``self + other``; fails with [`BytemergeError::CountOverflow`] when
    /// the sum does not fit.
    fn try_add(
        self,
        other: Self,
    ) -> BMResult<Self> {
        self.checked_add(&other)
            .ok_or_else(|| BytemergeError::CountOverflow {
                value: i128::try_from(self.widen().saturating_add(other.widen()))
                    .unwrap_or(i128::MAX),
            })
    }
}

impl<C> CountType for C where
    C: 'static
        + PrimInt
        + Unsigned
        + FromPrimitive
        + ToPrimitive
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
        + AddAssign
{
}
