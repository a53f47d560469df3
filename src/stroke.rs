//! Strokes: moving sources of force and ink inside one layer.

use crate::config::{Options, StrokeRelation};
use crate::random::RandomSource;

const MIRRORS : [StrokeRelation; 3] = [StrokeRelation::Mirror, StrokeRelation::MirrorX, StrokeRelation::MirrorY];

/// Positions live in the unit square; speed is in units per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
	pub speed  : f64,
	pub pos    : [f64; 2],
	pub target : [f64; 2]
}

impl Stroke {
	pub fn random<R: RandomSource>(options : &Options, rng : &mut R) -> Stroke {
		let speed = random_speed(options, rng);
		let pos = [rng.num(0.0, 1.0), rng.num(0.0, 1.0)];
		let target = [rng.num(0.0, 1.0), rng.num(0.0, 1.0)];
		Stroke { speed, pos, target }
	}

	pub fn mirror(&self) -> Stroke {
		Stroke { speed: self.speed, pos: flip(self.pos, true, true), target: flip(self.target, true, true) }
	}

	pub fn mirror_x(&self) -> Stroke {
		Stroke { speed: self.speed, pos: flip(self.pos, true, false), target: flip(self.target, true, false) }
	}

	pub fn mirror_y(&self) -> Stroke {
		Stroke { speed: self.speed, pos: flip(self.pos, false, true), target: flip(self.target, false, true) }
	}

	fn length(&self) -> f64 {
		let dx = self.target[0] - self.pos[0];
		let dy = self.target[1] - self.pos[1];
		(dx * dx + dy * dy).sqrt()
	}

	/// Position and unit-scaled velocity after travelling `distance` along
	/// the stroke. The stroke runs to its target and back again.
	pub fn state_at(&self, distance : f64) -> ([f64; 2], [f64; 2]) {
		let length = self.length();
		if length < 1e-9 {
			return (self.pos, [0.0, 0.0]);
		}
		let phase = (distance / length).rem_euclid(2.0);
		let (t, sign) = if phase <= 1.0 { (phase, 1.0) } else { (2.0 - phase, -1.0) };
		let dir = [(self.target[0] - self.pos[0]) / length, (self.target[1] - self.pos[1]) / length];
		let position = [self.pos[0] + (self.target[0] - self.pos[0]) * t, self.pos[1] + (self.target[1] - self.pos[1]) * t];
		(position, [dir[0] * self.speed * sign, dir[1] * self.speed * sign])
	}
}

fn flip(p : [f64; 2], x : bool, y : bool) -> [f64; 2] {
	[if x { 1.0 - p[0] } else { p[0] }, if y { 1.0 - p[1] } else { p[1] }]
}

pub fn random_speed<R: RandomSource>(options : &Options, rng : &mut R) -> f64 {
	rng.num(options.min_speed, options.max_speed) * options.speed_mult
}

/// Stroke `j` of layer `layer_index`. Layer 0 and the `random` relation
/// draw fresh strokes; other layers derive from `reference`, the matching
/// stroke of layer 0, and fall back to a fresh stroke without one.
pub fn create_stroke<R: RandomSource>(layer_index : usize, options : &Options, reference : Option<&Stroke>, rng : &mut R) -> Stroke {
	if layer_index == 0 || options.strokes_rel == StrokeRelation::Random {
		return Stroke::random(options, rng);
	}
	let reference = match reference {
		Some(stroke) => stroke,
		None => return Stroke::random(options, rng),
	};
	let mut relation = options.strokes_rel;
	if relation == StrokeRelation::MirrorRand {
		relation = *rng.choice(&MIRRORS).unwrap_or(&StrokeRelation::Mirror);
	}
	match relation {
		StrokeRelation::Same => *reference,
		StrokeRelation::MirrorX => reference.mirror_x(),
		StrokeRelation::MirrorY => reference.mirror_y(),
		_ => reference.mirror(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::random::Seeded;
	use approx::assert_relative_eq;

	fn reference() -> Stroke {
		Stroke { speed: 0.02, pos: [0.2, 0.3], target: [0.6, 0.9] }
	}

	fn options(relation : StrokeRelation) -> Options {
		Options { strokes_rel: relation, ..Options::default() }
	}

	#[test]
	fn first_layer_ignores_the_relation() {
		let mut rng = Seeded::new(1);
		let stroke = create_stroke(0, &options(StrokeRelation::Same), Some(&reference()), &mut rng);
		assert_ne!(stroke, reference());
	}

	#[test]
	fn same_copies_the_reference() {
		let mut rng = Seeded::new(1);
		assert_eq!(create_stroke(2, &options(StrokeRelation::Same), Some(&reference()), &mut rng), reference());
	}

	#[test]
	fn mirrors_flip_the_right_axes() {
		let mut rng = Seeded::new(1);
		let both = create_stroke(1, &options(StrokeRelation::Mirror), Some(&reference()), &mut rng);
		assert_relative_eq!(both.pos[0], 0.8);
		assert_relative_eq!(both.pos[1], 0.7);

		let x = create_stroke(1, &options(StrokeRelation::MirrorX), Some(&reference()), &mut rng);
		assert_relative_eq!(x.target[0], 0.4);
		assert_relative_eq!(x.target[1], 0.9);

		let y = create_stroke(1, &options(StrokeRelation::MirrorY), Some(&reference()), &mut rng);
		assert_relative_eq!(y.target[0], 0.6);
		assert_relative_eq!(y.target[1], 0.1, epsilon = 1e-12);
	}

	#[test]
	fn mirror_rand_picks_one_of_the_mirrors() {
		let mut rng = Seeded::new(5);
		let candidates = [reference().mirror(), reference().mirror_x(), reference().mirror_y()];
		for _ in 0..20 {
			let stroke = create_stroke(1, &options(StrokeRelation::MirrorRand), Some(&reference()), &mut rng);
			assert!(candidates.contains(&stroke));
		}
	}

	#[test]
	fn missing_reference_falls_back_to_random() {
		let mut rng = Seeded::new(9);
		let options = options(StrokeRelation::Mirror);
		let stroke = create_stroke(1, &options, None, &mut rng);
		assert!(stroke.speed >= options.min_speed * options.speed_mult);
	}

	#[test]
	fn speed_is_scaled_by_the_multiplier() {
		let mut rng = Seeded::new(2);
		let options = Options { min_speed: 0.01, max_speed: 0.02, speed_mult: 10.0, ..Options::default() };
		let speed = random_speed(&options, &mut rng);
		assert!(speed >= 0.1 && speed <= 0.2);
	}

	#[test]
	fn motion_bounces_between_ends() {
		let stroke = Stroke { speed: 0.1, pos: [0.0, 0.0], target: [1.0, 0.0] };
		let (p, v) = stroke.state_at(0.25);
		assert_relative_eq!(p[0], 0.25);
		assert!(v[0] > 0.0);

		let (p, v) = stroke.state_at(1.5);
		assert_relative_eq!(p[0], 0.5);
		assert!(v[0] < 0.0);

		let (p, _) = stroke.state_at(2.0);
		assert_relative_eq!(p[0], 0.0);
	}

	#[test]
	fn degenerate_stroke_stays_put() {
		let stroke = Stroke { speed: 0.1, pos: [0.5, 0.5], target: [0.5, 0.5] };
		assert_eq!(stroke.state_at(3.0), ([0.5, 0.5], [0.0, 0.0]));
	}
}
