//! Run settings and the user-tunable options.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrataError};
use crate::palette::Palette;

pub const DEFAULT_SCREEN_SIZE : (u32, u32) = (1024, 768);

/// How the strokes of layers after the first relate to layer 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeRelation {
	#[serde(rename = "same")]
	Same,
	#[serde(rename = "mirror")]
	Mirror,
	#[serde(rename = "mirrorX")]
	MirrorX,
	#[serde(rename = "mirrorY")]
	MirrorY,
	#[serde(rename = "mirrorRand")]
	MirrorRand,
	#[serde(rename = "random")]
	Random,
}

impl StrokeRelation {
	pub const ALL : [StrokeRelation; 6] = [
		StrokeRelation::Same,
		StrokeRelation::Mirror,
		StrokeRelation::MirrorX,
		StrokeRelation::MirrorY,
		StrokeRelation::MirrorRand,
		StrokeRelation::Random,
	];

	pub fn name(self) -> &'static str {
		match self {
			StrokeRelation::Same => "same",
			StrokeRelation::Mirror => "mirror",
			StrokeRelation::MirrorX => "mirrorX",
			StrokeRelation::MirrorY => "mirrorY",
			StrokeRelation::MirrorRand => "mirrorRand",
			StrokeRelation::Random => "random",
		}
	}
}

/// Scene layout, which also selects what a click does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositionKind {
	#[serde(rename = "addnew")]
	AddNew,
	#[serde(rename = "reset")]
	Reset,
	#[serde(rename = "regenerate")]
	Regenerate,
	#[serde(rename = "cells")]
	Cells,
	#[serde(rename = "box")]
	Box,
}

impl CompositionKind {
	pub const ALL : [CompositionKind; 5] = [
		CompositionKind::AddNew,
		CompositionKind::Reset,
		CompositionKind::Regenerate,
		CompositionKind::Cells,
		CompositionKind::Box,
	];

	pub fn name(self) -> &'static str {
		match self {
			CompositionKind::AddNew => "addnew",
			CompositionKind::Reset => "reset",
			CompositionKind::Regenerate => "regenerate",
			CompositionKind::Cells => "cells",
			CompositionKind::Box => "box",
		}
	}
}

impl fmt::Display for CompositionKind {
	fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for CompositionKind {
	type Err = StrataError;

	fn from_str(s : &str) -> Result<CompositionKind> {
		CompositionKind::ALL
			.iter()
			.copied()
			.find(|kind| kind.name().eq_ignore_ascii_case(s))
			.ok_or_else(|| StrataError::InvalidOption { name: "composition", value: s.to_string() })
	}
}

/// Options exposed through the debug panel. Edits take effect on the next
/// regeneration or frame that reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
	pub min_layers     : u32,
	pub max_layers     : u32,
	pub min_strokes    : u32,
	pub max_strokes    : u32,
	pub strokes_rel    : StrokeRelation,
	pub max_cells      : u32,
	pub min_speed      : f64,
	pub max_speed      : f64,
	pub speed_mult     : f64,
	pub max_iterations : u32,
	pub show_debug     : bool,
}

impl Default for Options {
	fn default() -> Options {
		Options {
			min_layers: 1,
			max_layers: 3,
			min_strokes: 1,
			max_strokes: 5,
			strokes_rel: StrokeRelation::MirrorRand,
			max_cells: 12,
			min_speed: 0.005,
			max_speed: 0.05,
			speed_mult: 1.0,
			max_iterations: 10,
			show_debug: false,
		}
	}
}

impl Options {
	pub fn load(path : &Path) -> Result<Options> {
		let text = fs::read_to_string(path)?;
		serde_json::from_str(&text).map_err(|source| StrataError::Config {
			path: path.display().to_string(),
			source,
		})
	}
}

/// Per-run settings, fixed once the window is open.
#[derive(Debug, Clone)]
pub struct Settings {
	pub name        : String,
	pub dev_mode    : bool,
	/// Reloads draw a fresh seed unless one was given.
	pub seed        : Option<u64>,
	pub screen_size : (u32, u32),
	pub palette     : Option<Palette>,
	pub composition : Option<CompositionKind>,
}

impl Default for Settings {
	fn default() -> Settings {
		Settings {
			name: "fluid-strata".to_string(),
			dev_mode: false,
			seed: None,
			screen_size: DEFAULT_SCREEN_SIZE,
			palette: None,
			composition: None,
		}
	}
}

/// Palettes and compositions that may be picked for a run. Toggled from the
/// debug panel; survives reloads.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
	pub palettes     : Vec<(Palette, bool)>,
	pub compositions : Vec<(CompositionKind, bool)>,
}

impl Default for Selection {
	fn default() -> Selection {
		Selection {
			palettes: Palette::ALL.iter().map(|p| (*p, true)).collect(),
			compositions: CompositionKind::ALL.iter().map(|c| (*c, true)).collect(),
		}
	}
}

impl Selection {
	pub fn enabled_palettes(&self) -> Vec<Palette> {
		let enabled : Vec<Palette> = self.palettes.iter().filter(|(_, on)| *on).map(|(p, _)| *p).collect();
		if enabled.is_empty() { Palette::ALL.to_vec() } else { enabled }
	}

	pub fn enabled_compositions(&self) -> Vec<CompositionKind> {
		let enabled : Vec<CompositionKind> = self.compositions.iter().filter(|(_, on)| *on).map(|(c, _)| *c).collect();
		if enabled.is_empty() { CompositionKind::ALL.to_vec() } else { enabled }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn partial_options_file_keeps_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, r#"{{ "max_cells": 7, "strokes_rel": "mirrorX" }}"#).unwrap();

		let options = Options::load(file.path()).unwrap();
		assert_eq!(options.max_cells, 7);
		assert_eq!(options.strokes_rel, StrokeRelation::MirrorX);
		assert_eq!(options.max_layers, Options::default().max_layers);
	}

	#[test]
	fn malformed_options_file_reports_path() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "{{ not json").unwrap();

		match Options::load(file.path()) {
			Err(StrataError::Config { path, .. }) => assert_eq!(path, file.path().display().to_string()),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn composition_names_parse() {
		assert_eq!("cells".parse::<CompositionKind>().unwrap(), CompositionKind::Cells);
		assert_eq!("AddNew".parse::<CompositionKind>().unwrap(), CompositionKind::AddNew);
		assert!("spiral".parse::<CompositionKind>().is_err());
	}

	#[test]
	fn empty_selection_falls_back_to_everything() {
		let mut selection = Selection::default();
		for entry in selection.compositions.iter_mut() {
			entry.1 = false;
		}
		assert_eq!(selection.enabled_compositions().len(), CompositionKind::ALL.len());
	}
}
