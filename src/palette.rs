//! Named color schemes and color generation.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StrataError};
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
	BlackWhite,
	Mono,
	Analogous,
	Complementary,
	Triadic,
}

impl Palette {
	pub const ALL : [Palette; 5] = [
		Palette::BlackWhite,
		Palette::Mono,
		Palette::Analogous,
		Palette::Complementary,
		Palette::Triadic,
	];

	pub fn name(self) -> &'static str {
		match self {
			Palette::BlackWhite => "Black&White",
			Palette::Mono => "Mono",
			Palette::Analogous => "Analogous",
			Palette::Complementary => "Complementary",
			Palette::Triadic => "Triadic",
		}
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Palette {
	type Err = StrataError;

	fn from_str(s : &str) -> Result<Palette> {
		Palette::ALL
			.iter()
			.copied()
			.find(|p| p.name().eq_ignore_ascii_case(s))
			.ok_or_else(|| StrataError::InvalidOption { name: "palette", value: s.to_string() })
	}
}

/// Hue in turns `[0, 1)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
	pub h : f64,
	pub s : f64,
	pub l : f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
	pub r : f32,
	pub g : f32,
	pub b : f32
}

impl Rgb {
	pub fn from_hsl(hsl : Hsl) -> Rgb {
		let h = hsl.h.rem_euclid(1.0);
		let s = hsl.s.max(0.0).min(1.0);
		let l = hsl.l.max(0.0).min(1.0);
		if s == 0.0 {
			return Rgb { r: l as f32, g: l as f32, b: l as f32 };
		}
		let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
		let p = 2.0 * l - q;
		Rgb {
			r: hue_to_channel(p, q, h + 1.0 / 3.0) as f32,
			g: hue_to_channel(p, q, h) as f32,
			b: hue_to_channel(p, q, h - 1.0 / 3.0) as f32
		}
	}

	pub fn with_alpha(self, a : f32) -> [f32; 4] {
		[self.r, self.g, self.b, a]
	}
}

fn hue_to_channel(p : f64, q : f64, t : f64) -> f64 {
	let t = t.rem_euclid(1.0);
	if t < 1.0 / 6.0 {
		p + (q - p) * 6.0 * t
	} else if t < 0.5 {
		q
	} else if t < 2.0 / 3.0 {
		p + (q - p) * (2.0 / 3.0 - t) * 6.0
	} else {
		p
	}
}

/// Base HSL entries for a run. The first entry also decides the background.
pub fn hsl_palette<R: RandomSource>(palette : Palette, rng : &mut R) -> Vec<Hsl> {
	let h = rng.unit();
	match palette {
		Palette::BlackWhite => {
			let l = if rng.boolean(0.5) { rng.num(0.02, 0.12) } else { rng.num(0.88, 0.98) };
			vec![Hsl { h: 0.0, s: 0.0, l }]
		}
		Palette::Mono => vec![Hsl { h, s: rng.num(0.4, 0.9), l: rng.num(0.15, 0.85) }],
		Palette::Analogous => (0..3)
			.map(|i| Hsl { h: h + (i as f64 - 1.0) / 12.0, s: rng.num(0.5, 0.9), l: rng.num(0.3, 0.7) })
			.collect(),
		Palette::Complementary => vec![
			Hsl { h, s: rng.num(0.5, 0.9), l: rng.num(0.3, 0.7) },
			Hsl { h: h + 0.5, s: rng.num(0.5, 0.9), l: rng.num(0.3, 0.7) },
		],
		Palette::Triadic => (0..3)
			.map(|i| Hsl { h: h + i as f64 / 3.0, s: rng.num(0.5, 0.9), l: rng.num(0.3, 0.7) })
			.collect(),
	}
}

/// A color that belongs to `palette`, derived from `base`.
pub fn generate_color<R: RandomSource>(palette : Palette, base : Hsl, rng : &mut R) -> Rgb {
	let hsl = match palette {
		Palette::BlackWhite => Hsl { h: 0.0, s: 0.0, l: 1.0 - base.l + rng.num(-0.05, 0.05) },
		Palette::Mono => Hsl { h: base.h, s: base.s, l: rng.num(0.1, 0.9) },
		Palette::Analogous => Hsl { h: base.h + rng.num(-1.0 / 12.0, 1.0 / 12.0), s: base.s, l: rng.num(0.2, 0.8) },
		Palette::Complementary => {
			let h = if rng.boolean(0.5) { base.h } else { base.h + 0.5 };
			Hsl { h, s: base.s, l: rng.num(0.2, 0.8) }
		}
		Palette::Triadic => Hsl { h: base.h + rng.int(0, 2) as f64 / 3.0, s: base.s, l: rng.num(0.2, 0.8) },
	};
	Rgb::from_hsl(hsl)
}
