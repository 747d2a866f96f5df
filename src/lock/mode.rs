//! The lock mode lattice and its two tables, `Conv` and `Comp` (spec §4.9).
//!
//! Ten modes split into two families that never mix on one resource: the
//! data family `{NULL, IS, IX, S, SIX, U, X}` used on class/instance
//! resources, and the schema family `{SCH_S, SCH_IX, SCH_M}` used on schema
//! resources. `NULL` is the bottom of both. A `Conv` lookup that crosses
//! families is an `NA` entry — reaching one is an invariant violation.

use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LockMode {
	Null,
	Is,
	Ix,
	S,
	Six,
	U,
	X,
	SchS,
	SchIx,
	SchM,
}

impl LockMode {
	pub const ALL: [LockMode; 10] = [
		Self::Null,
		Self::Is,
		Self::Ix,
		Self::S,
		Self::Six,
		Self::U,
		Self::X,
		Self::SchS,
		Self::SchIx,
		Self::SchM,
	];

	#[must_use]
	pub fn is_schema(self) -> bool { matches!(self, Self::SchS | Self::SchIx | Self::SchM) }
}

impl fmt::Display for LockMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			| Self::Null => "NULL",
			| Self::Is => "IS",
			| Self::Ix => "IX",
			| Self::S => "S",
			| Self::Six => "SIX",
			| Self::U => "U",
			| Self::X => "X",
			| Self::SchS => "SCH_S",
			| Self::SchIx => "SCH_IX",
			| Self::SchM => "SCH_M",
		};
		f.write_str(s)
	}
}

/// Least upper bound of `requested` and `held`. Panics on an `NA` entry
/// (crossing the data/schema families) — this is the invariant-violation
/// panic spec.md §7 calls for.
#[must_use]
pub fn conv(requested: LockMode, held: LockMode) -> LockMode {
	use LockMode::{Ix, Null, SchIx, SchM, SchS, Six, S, U, X};

	if requested == Null {
		return held;
	}
	if held == Null {
		return requested;
	}
	if requested == X || held == X {
		return X;
	}
	if requested.is_schema() != held.is_schema() {
		panic!("NA lock conversion: {requested} and {held} belong to different lattice families");
	}

	if requested.is_schema() {
		return match (requested, held) {
			| (SchM, _) | (_, SchM) => SchM,
			| (SchS, SchS) => SchS,
			| (SchIx, SchIx) => SchIx,
			| (SchS, SchIx) | (SchIx, SchS) => SchM,
			| _ => unreachable!("schema family is exhaustively covered above"),
		};
	}

	// data family join, `requested`/`held` now both in {Is, Ix, S, Six, U}
	match (requested, held) {
		| (a, b) if a == b => a,
		| (LockMode::Is, other) | (other, LockMode::Is) => other,
		| (Ix, S) | (S, Ix) => Six,
		| (Ix, Six) | (Six, Ix) => Six,
		| (Ix, U) | (U, Ix) => X,
		| (S, Six) | (Six, S) => Six,
		| (S, U) | (U, S) => U,
		| (Six, U) | (U, Six) => X,
		| _ => unreachable!("data family is exhaustively covered above"),
	}
}

/// Whether a request for `requested` is compatible with a resource already
/// holding `held`. Within one family this mirrors the textbook
/// multi-granularity compatibility matrix (symmetric); across families the
/// two never co-occur on one resource, so it is conservatively `false`
/// unless either side is `NULL`.
#[must_use]
pub fn comp(requested: LockMode, held: LockMode) -> bool {
	use LockMode::{Ix, Null, SchIx, SchM, SchS, S, U, X};

	if requested == Null || held == Null {
		return true;
	}
	if requested.is_schema() != held.is_schema() {
		return false;
	}

	if requested.is_schema() {
		return matches!((requested, held), (SchS, SchS) | (SchS, SchIx) | (SchIx, SchS) | (SchIx, SchIx));
	}

	match (requested, held) {
		| (LockMode::Is, other) | (other, LockMode::Is) => other != X,
		| (Ix, Ix) => true,
		| (S, S) => true,
		| (S, U) | (U, S) => true,
		| _ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DATA_MODES: [LockMode; 7] = [LockMode::Null, LockMode::Is, LockMode::Ix, LockMode::S, LockMode::Six, LockMode::U, LockMode::X];
	const SCHEMA_MODES: [LockMode; 4] = [LockMode::Null, LockMode::SchS, LockMode::SchIx, LockMode::SchM];

	#[test]
	fn conv_null_is_identity() {
		for &m in &LockMode::ALL {
			assert_eq!(conv(m, LockMode::Null), m);
			assert_eq!(conv(LockMode::Null, m), m);
		}
	}

	#[test]
	fn conv_x_absorbs() {
		for &m in &DATA_MODES {
			assert_eq!(conv(LockMode::X, m), LockMode::X);
			assert_eq!(conv(m, LockMode::X), LockMode::X);
		}
	}

	#[test]
	fn conv_is_commutative_within_family() {
		for &a in &DATA_MODES {
			for &b in &DATA_MODES {
				assert_eq!(conv(a, b), conv(b, a), "conv not commutative for ({a}, {b})");
			}
		}
		for &a in &SCHEMA_MODES {
			for &b in &SCHEMA_MODES {
				assert_eq!(conv(a, b), conv(b, a), "conv not commutative for ({a}, {b})");
			}
		}
	}

	#[test]
	#[should_panic(expected = "NA lock conversion")]
	fn conv_cross_family_panics() {
		let _ = conv(LockMode::S, LockMode::SchS);
	}

	#[test]
	fn comp_is_symmetric_within_family() {
		for &a in &DATA_MODES {
			for &b in &DATA_MODES {
				assert_eq!(comp(a, b), comp(b, a), "comp not symmetric for ({a}, {b})");
			}
		}
		for &a in &SCHEMA_MODES {
			for &b in &SCHEMA_MODES {
				assert_eq!(comp(a, b), comp(b, a), "comp not symmetric for ({a}, {b})");
			}
		}
	}

	#[test]
	fn comp_x_is_exclusive() {
		for &m in &DATA_MODES {
			if m == LockMode::Null {
				continue;
			}
			assert_eq!(comp(LockMode::X, m), m == LockMode::Null);
		}
	}

	#[test]
	fn comp_six_excludes_ix_and_s() {
		assert!(!comp(LockMode::Six, LockMode::Ix));
		assert!(!comp(LockMode::Six, LockMode::S));
		assert!(!comp(LockMode::Ix, LockMode::Six));
	}
}
