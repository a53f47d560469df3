//! Variables derived once per run from the seed.

use log::info;

use crate::config::{CompositionKind, Options, Selection, Settings};
use crate::palette::{self, Hsl, Palette, Rgb};
use crate::random::RandomSource;

#[derive(Debug, Clone)]
pub struct Features {
	pub palette           : Palette,
	pub hsl_palette       : Vec<Hsl>,
	/// Background first, then the color of the initial layers.
	pub colors            : [Rgb; 2],
	pub composition       : CompositionKind,
	pub transparent       : bool,
	pub layers            : usize,
	pub strokes_per_layer : usize,
	pub color_weight      : f32,
}

impl Features {
	pub fn generate<R: RandomSource>(settings : &Settings, options : &Options, selection : &Selection, rng : &mut R) -> Features {
		let palette = match settings.palette {
			Some(p) => p,
			None => *rng.choice(&selection.enabled_palettes()).unwrap_or(&Palette::Mono),
		};
		let composition = match settings.composition {
			Some(c) => c,
			None => *rng.choice(&selection.enabled_compositions()).unwrap_or(&CompositionKind::Regenerate),
		};

		let hsl_palette = palette::hsl_palette(palette, rng);
		let base = hsl_palette[0];
		let background = Rgb::from_hsl(base);
		let foreground = palette::generate_color(palette, base, rng);

		let layers = rng.int(options.min_layers as i64, options.max_layers as i64).max(1) as usize;
		let strokes_per_layer = rng.int(options.min_strokes as i64, options.max_strokes as i64).max(1) as usize;
		let color_weight = rng.num(0.6, 1.0) as f32;

		let features = Features {
			palette,
			hsl_palette,
			colors: [background, foreground],
			composition,
			transparent: composition == CompositionKind::Cells,
			layers,
			strokes_per_layer,
			color_weight,
		};
		info!(
			"features: palette {} composition {} layers {} strokes {}",
			features.palette, features.composition, features.layers, features.strokes_per_layer
		);
		features
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::random::Seeded;

	#[test]
	fn forced_choices_win() {
		let settings = Settings {
			palette: Some(Palette::Triadic),
			composition: Some(CompositionKind::Box),
			..Settings::default()
		};
		let mut rng = Seeded::new(17);
		let features = Features::generate(&settings, &Options::default(), &Selection::default(), &mut rng);
		assert_eq!(features.palette, Palette::Triadic);
		assert_eq!(features.composition, CompositionKind::Box);
		assert!(!features.transparent);
	}

	#[test]
	fn counts_respect_option_bounds() {
		let options = Options { min_layers: 2, max_layers: 4, min_strokes: 3, max_strokes: 3, ..Options::default() };
		for seed in 0..50 {
			let mut rng = Seeded::new(seed);
			let features = Features::generate(&Settings::default(), &options, &Selection::default(), &mut rng);
			assert!(features.layers >= 2 && features.layers <= 4);
			assert_eq!(features.strokes_per_layer, 3);
		}
	}

	#[test]
	fn disabled_palettes_are_never_picked() {
		let mut selection = Selection::default();
		for entry in selection.palettes.iter_mut() {
			entry.1 = entry.0 == Palette::Analogous;
		}
		for seed in 0..20 {
			let mut rng = Seeded::new(seed);
			let features = Features::generate(&Settings::default(), &Options::default(), &selection, &mut rng);
			assert_eq!(features.palette, Palette::Analogous);
		}
	}

	#[test]
	fn cells_background_is_transparent() {
		let settings = Settings { composition: Some(CompositionKind::Cells), ..Settings::default() };
		let mut rng = Seeded::new(4);
		let features = Features::generate(&settings, &Options::default(), &Selection::default(), &mut rng);
		assert!(features.transparent);
	}
}
