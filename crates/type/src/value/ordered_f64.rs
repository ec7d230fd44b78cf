// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt,
	hash::{Hash, Hasher},
};

/// An `f64` that is never NaN, so it can be compared, hashed and used as a
/// group key.
#[repr(transparent)]
#[derive(Copy, Clone, Default)]
pub struct OrderedF64(f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("NaN is not a valid ordered float")]
pub struct OrderedFloatError;

impl OrderedF64 {
	pub fn value(&self) -> f64 {
		self.0
	}
}

impl PartialEq for OrderedF64 {
	fn eq(&self, other: &Self) -> bool {
		self.0.to_bits() == other.0.to_bits()
	}
}

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for OrderedF64 {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.total_cmp(&other.0)
	}
}

impl Hash for OrderedF64 {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.to_bits().hash(state);
	}
}

impl fmt::Debug for OrderedF64 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl fmt::Display for OrderedF64 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl From<OrderedF64> for f64 {
	fn from(v: OrderedF64) -> Self {
		v.0
	}
}

impl TryFrom<f64> for OrderedF64 {
	type Error = OrderedFloatError;

	fn try_from(f: f64) -> Result<Self, Self::Error> {
		// -0.0 and 0.0 must hash alike
		let normalized = if f == 0.0 {
			0.0
		} else {
			f
		};
		if f.is_nan() {
			Err(OrderedFloatError)
		} else {
			Ok(OrderedF64(normalized))
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn test_sorting() {
		let mut values = vec![
			OrderedF64::try_from(10.0).unwrap(),
			OrderedF64::try_from(-2.5).unwrap(),
			OrderedF64::try_from(5.0).unwrap(),
		];
		values.sort();
		let sorted: Vec<f64> = values.into_iter().map(f64::from).collect();
		assert_eq!(sorted, vec![-2.5, 5.0, 10.0]);
	}

	#[test]
	fn test_nan_rejected() {
		assert_eq!(OrderedF64::try_from(f64::NAN), Err(OrderedFloatError));
	}

	#[test]
	fn test_signed_zero_hashes_alike() {
		let mut set = HashSet::new();
		set.insert(OrderedF64::try_from(0.0).unwrap());
		set.insert(OrderedF64::try_from(-0.0).unwrap());
		assert_eq!(set.len(), 1);
	}
}
