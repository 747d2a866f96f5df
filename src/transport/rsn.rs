//! Atomic monotonically increasing response sequence number generator.
//! `0` is reserved as the fire-and-forget / NO_RESPONSE sentinel (spec §4.6).

use std::sync::atomic::{AtomicU64, Ordering};

pub struct SequenceNumberGenerator {
	next: AtomicU64,
}

impl Default for SequenceNumberGenerator {
	fn default() -> Self { Self::new() }
}

impl SequenceNumberGenerator {
	#[must_use]
	pub const fn new() -> Self {
		Self {
			next: AtomicU64::new(1),
		}
	}

	/// Returns a fresh, process-unique (for this generator) rsn, never `0`.
	pub fn get_unique_number(&self) -> u64 {
		let value = self.next.fetch_add(1, Ordering::Relaxed);
		if value == 0 {
			// wrapped past u64::MAX back to 0; skip it
			return self.get_unique_number();
		}
		value
	}
}

#[cfg(test)]
mod tests {
	use std::{collections::HashSet, sync::Arc, thread};

	use super::SequenceNumberGenerator;

	#[test]
	fn concurrent_generation_is_unique() {
		let gen = Arc::new(SequenceNumberGenerator::new());
		let threads: Vec<_> = (0..8)
			.map(|_| {
				let gen = Arc::clone(&gen);
				thread::spawn(move || (0..500).map(|_| gen.get_unique_number()).collect::<Vec<_>>())
			})
			.collect();

		let mut all = HashSet::new();
		let mut total = 0;
		for t in threads {
			for n in t.join().expect("thread panicked") {
				assert_ne!(n, 0, "rsn must never be 0");
				total += 1;
				all.insert(n);
			}
		}

		assert_eq!(all.len(), total, "all generated rsns must be unique");
	}
}
