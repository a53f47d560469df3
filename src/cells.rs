//! Timer behind the cells composition.
//!
//! There is at most one pending deadline. A request while one is pending
//! cancels it, grows a cell right away and arms a new deadline; nothing is
//! ever queued behind the pending one.

use std::time::{Duration, Instant};

use crate::random::RandomSource;

pub const DELAY_MS : (i64, i64) = (500, 7000);

#[derive(Debug, Default)]
pub struct CellTimer {
	armed     : bool,
	deadline  : Option<Instant>,
	num_cells : u32,
}

impl CellTimer {
	pub fn new() -> CellTimer {
		CellTimer::default()
	}

	pub fn num_cells(&self) -> u32 {
		self.num_cells
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Returns true when a cell must be created now. The first request only
	/// arms the timer.
	pub fn request<R: RandomSource>(&mut self, now : Instant, max_cells : u32, rng : &mut R) -> bool {
		let grow = self.armed;
		if grow {
			self.deadline = None;
			self.num_cells += 1;
		}
		if self.num_cells < max_cells {
			let delay = rng.int(DELAY_MS.0, DELAY_MS.1) as u64;
			self.deadline = Some(now + Duration::from_millis(delay));
			self.armed = true;
		}
		grow
	}

	/// Fires the pending deadline once it has passed.
	pub fn poll<R: RandomSource>(&mut self, now : Instant, max_cells : u32, rng : &mut R) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => self.request(now, max_cells, rng),
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::random::Seeded;

	#[test]
	fn first_request_only_arms() {
		let mut timer = CellTimer::new();
		let mut rng = Seeded::new(1);
		let now = Instant::now();
		assert!(!timer.request(now, 5, &mut rng));
		assert_eq!(timer.num_cells(), 0);
		let deadline = timer.deadline().unwrap();
		assert!(deadline >= now + Duration::from_millis(500));
		assert!(deadline <= now + Duration::from_millis(7000));
	}

	#[test]
	fn poll_waits_for_the_deadline() {
		let mut timer = CellTimer::new();
		let mut rng = Seeded::new(1);
		let now = Instant::now();
		timer.request(now, 5, &mut rng);
		assert!(!timer.poll(now, 5, &mut rng));
		assert!(timer.poll(now + Duration::from_secs(8), 5, &mut rng));
		assert_eq!(timer.num_cells(), 1);
	}

	#[test]
	fn request_preempts_the_pending_deadline() {
		let mut timer = CellTimer::new();
		let mut rng = Seeded::new(2);
		let start = Instant::now();
		timer.request(start, 5, &mut rng);

		let click = start + Duration::from_millis(100);
		assert!(timer.request(click, 5, &mut rng));
		assert_eq!(timer.num_cells(), 1);
		assert!(timer.deadline().unwrap() >= click + Duration::from_millis(500));

		// the old deadline no longer fires on its own
		assert!(!timer.poll(click + Duration::from_millis(400), 5, &mut rng));
	}

	#[test]
	fn stops_scheduling_at_max_cells() {
		let mut timer = CellTimer::new();
		let mut rng = Seeded::new(3);
		let mut now = Instant::now();
		timer.request(now, 2, &mut rng);
		for _ in 0..2 {
			now += Duration::from_secs(8);
			assert!(timer.poll(now, 2, &mut rng));
		}
		assert_eq!(timer.num_cells(), 2);
		assert!(timer.deadline().is_none());
		assert!(!timer.poll(now + Duration::from_secs(60), 2, &mut rng));
	}
}
