//! Per-layer simulation parameters and the constrained generator that draws
//! them.

use log::debug;

use crate::error::{Result, StrataError};
use crate::palette::Palette;
use crate::random::RandomSource;

/// Attempts before the generator gives up on a layer.
pub const MAX_ATTEMPTS : usize = 1000;

/// Lower bound of `dt`, indexed by the pass blend mode.
pub const MIN_DT : [f64; 6] = [0.25, 0.25, 0.4, 0.1, 0.3, 0.1];
pub const MIN_DT_FALLBACK : f64 = 0.1;
pub const MAX_DT : f64 = 0.3;

pub const K_RANGE     : (f64, f64) = (0.2, 0.7);
pub const NU_RANGE    : (f64, f64) = (0.4, 0.6);
pub const KAPPA_RANGE : (f64, f64) = (0.1, 0.9);

const FORBIDDEN : [(u32, u32); 1] = [(4, 4)];
const FORBIDDEN_BLACK_WHITE : [(u32, u32); 1] = [(1, 2)];

/// Compositing operator selected by a blend-mode index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
	None,
	Normal,
	Additive,
	Subtractive,
	Multiply,
	Custom,
}

impl BlendMode {
	pub fn from_index(index : u32) -> BlendMode {
		match index {
			0 => BlendMode::None,
			1 => BlendMode::Normal,
			2 => BlendMode::Additive,
			3 => BlendMode::Subtractive,
			4 => BlendMode::Multiply,
			_ => BlendMode::Custom,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerParameters {
	pub visible         : bool,
	pub blend_mode_pass : u32,
	pub blend_mode_view : u32,
	pub dt              : f64,
	pub k               : f64,
	pub nu              : f64,
	pub kappa           : f64,
}

impl LayerParameters {
	pub fn pass_blend(&self) -> BlendMode {
		BlendMode::from_index(self.blend_mode_pass)
	}

	pub fn view_blend(&self) -> BlendMode {
		BlendMode::from_index(self.blend_mode_view)
	}

	/// `"{pass}-{view}"`, the key the validator rules are written against.
	pub fn blend_key(&self) -> String {
		format!("{}-{}", self.blend_mode_pass, self.blend_mode_view)
	}
}

/// What the generator and validator read besides the layer index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationContext {
	pub palette : Palette
}

pub fn min_dt(blend_mode_pass : u32) -> f64 {
	MIN_DT.get(blend_mode_pass as usize).copied().unwrap_or(MIN_DT_FALLBACK)
}

/// Draws parameters for layer `layer_index` until the validator accepts them.
///
/// `previous_visible` carries the visibility of the layer currently in that
/// slot, if any; a fresh slot starts visible.
pub fn generate<R: RandomSource>(
	context : &GenerationContext,
	layer_index : usize,
	previous_visible : Option<bool>,
	rng : &mut R,
) -> Result<LayerParameters> {
	for attempt in 1..=MAX_ATTEMPTS {
		let candidate = draw_candidate(layer_index, previous_visible, rng);
		if validate(context, &candidate, layer_index) {
			debug!("layer {}: blend {} dt {:.3} after {} attempt(s)", layer_index, candidate.blend_key(), candidate.dt, attempt);
			return Ok(candidate);
		}
	}
	Err(StrataError::ConstraintsUnsatisfiable { layer: layer_index, attempts: MAX_ATTEMPTS })
}

fn draw_candidate<R: RandomSource>(layer_index : usize, previous_visible : Option<bool>, rng : &mut R) -> LayerParameters {
	let blend_mode_pass = rng.int(0, if layer_index > 0 { 4 } else { 5 }) as u32;
	let blend_mode_view = rng.int(2, if blend_mode_pass == 3 { 3 } else { 5 }) as u32;
	let dt = rng.num(min_dt(blend_mode_pass), MAX_DT);
	let k = rng.num(K_RANGE.0, K_RANGE.1);
	let nu = rng.num(NU_RANGE.0, NU_RANGE.1);
	let kappa = rng.num(KAPPA_RANGE.0, KAPPA_RANGE.1);

	LayerParameters {
		visible: previous_visible.unwrap_or(true),
		blend_mode_pass,
		blend_mode_view,
		dt,
		k,
		nu,
		kappa,
	}
}

/// Whether `params` may be used for layer `layer_index` under the context's
/// palette. No rule depends on the index yet.
pub fn validate(context : &GenerationContext, params : &LayerParameters, _layer_index : usize) -> bool {
	let blends = (params.blend_mode_pass, params.blend_mode_view);
	if FORBIDDEN.contains(&blends) {
		return false;
	}
	match context.palette {
		Palette::BlackWhite => !FORBIDDEN_BLACK_WHITE.contains(&blends),
		_ => true,
	}
}
