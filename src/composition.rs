//! Scene orchestration: owns the layers and their parameters, reacts to
//! input and drives the per-frame update.
//!
//! Rendering is reached through [`Backend`] and [`FluidLayer`] so that the
//! composition can run against the glium backend or a recording double.

use std::time::Instant;

use log::{debug, info, warn};

use crate::cells::CellTimer;
use crate::config::{CompositionKind, Options, Selection, Settings};
use crate::error::{Result, StrataError};
use crate::features::Features;
use crate::gui::{Bound, Gui, GuiEvent, Key, PanelFrame};
use crate::palette::{self, Rgb};
use crate::params::{self, GenerationContext, LayerParameters};
use crate::random::Seeded;
use crate::stroke::{self, Stroke};

/// Layers are always resized with this pixel ratio.
pub const PIXEL_RATIO : u32 = 1;

/// Everything a backend needs to build a layer.
#[derive(Debug, Clone)]
pub struct LayerConfig {
	pub params      : LayerParameters,
	pub num_strokes : usize,
	pub background  : Rgb,
}

/// One simulated layer.
pub trait FluidLayer {
	fn num_strokes(&self) -> usize;
	fn init_stroke(&mut self, index : usize, stroke : Stroke);
	fn stroke(&self, index : usize) -> Option<&Stroke>;
	fn set_speed(&mut self, index : usize, speed : f64);
	fn set_options(&mut self, params : &LayerParameters);
	fn set_color(&mut self, color : [f32; 4]);
	fn is_visible(&self) -> bool;
	fn set_visible(&mut self, visible : bool);
	/// Clears the simulation state.
	fn reset(&mut self) -> Result<()>;
	fn resize(&mut self, width : u32, height : u32, pixel_ratio : u32) -> Result<()>;
	/// Advances the simulation by `dt` seconds. `frame` counts the frames
	/// since the scene started or was last reset.
	fn update(&mut self, dt : f64, max_iterations : u32, frame : u64) -> Result<()>;
}

pub trait Backend {
	type Layer : FluidLayer;

	fn create_layer(&mut self, config : &LayerConfig) -> Result<Self::Layer>;
	fn resize(&mut self, width : u32, height : u32) -> Result<()>;
	/// Turns the history layer of the cells composition on or off.
	fn set_history(&mut self, enabled : bool) -> Result<()>;
	/// Renders the current layers into the history layer and swaps its
	/// buffers.
	fn capture_history(&mut self, layers : &[Self::Layer]) -> Result<()>;
}

/// What a frame shows, handed to the renderer.
pub struct SceneView<'a, L> {
	pub background : Option<Rgb>,
	pub layers     : &'a [L],
	pub boxed      : bool,
	pub history    : bool,
	pub markers    : &'a [[f64; 2]],
	pub panel      : Option<&'a PanelFrame>,
}

pub struct Composition<B: Backend> {
	settings     : Settings,
	options      : Options,
	selection    : Selection,
	features     : Features,
	context      : GenerationContext,
	rng          : Seeded,
	backend      : B,
	layers       : Vec<B::Layer>,
	layer_params : Vec<LayerParameters>,
	markers      : Vec<[f64; 2]>,
	gui          : Option<Gui>,
	panel        : Option<PanelFrame>,
	cells        : CellTimer,
	history      : bool,
	frame        : u64,
	screen_size  : (u32, u32),
}

impl<B: Backend> Composition<B> {
	pub fn new(settings : Settings, options : Options, selection : Selection, backend : B, now : Instant) -> Result<Composition<B>> {
		let seed = settings.seed.unwrap_or_else(Seeded::random_seed);
		info!("{}: seed {}", settings.name, seed);
		let mut rng = Seeded::new(seed);
		let features = Features::generate(&settings, &options, &selection, &mut rng);
		let gui = if settings.dev_mode { Some(Gui::new()) } else { None };

		let mut composition = Composition {
			context: GenerationContext { palette: features.palette },
			screen_size: settings.screen_size,
			settings,
			options,
			selection,
			features,
			rng,
			backend,
			layers: Vec::new(),
			layer_params: Vec::new(),
			markers: Vec::new(),
			gui,
			panel: None,
			cells: CellTimer::new(),
			history: false,
			frame: 0,
		};
		composition.create_scene(now)?;
		Ok(composition)
	}

	/// Hands back what survives a reload.
	pub fn into_parts(self) -> (Settings, Options, Selection, B) {
		(self.settings, self.options, self.selection, self.backend)
	}

	fn create_scene(&mut self, now : Instant) -> Result<()> {
		self.backend.set_history(false)?;
		match self.features.composition {
			CompositionKind::Cells => self.create_cells(now),
			CompositionKind::Box => self.create_box(),
			_ => self.create_layers(),
		}
	}

	fn create_layers(&mut self) -> Result<()> {
		for _ in 0..self.features.layers {
			self.add_layer(self.features.strokes_per_layer)?;
		}
		Ok(())
	}

	fn create_cells(&mut self, now : Instant) -> Result<()> {
		self.create_layers()?;
		self.backend.set_history(true)?;
		self.history = true;
		self.request_cell(now)
	}

	fn create_box(&mut self) -> Result<()> {
		let params = params::generate(&self.context, 0, None, &mut self.rng)?;
		self.layer_params.push(params);
		let layer = self.create_layer(self.features.strokes_per_layer)?;
		self.create_strokes(layer)
	}

	/// Appends a layer with fresh parameters and strokes.
	pub fn add_layer(&mut self, num_strokes : usize) -> Result<()> {
		let index = self.layers.len();
		let params = params::generate(&self.context, index, None, &mut self.rng)?;
		self.layer_params.push(params);
		if let Some(gui) = self.gui.as_mut() {
			gui.add_layer_folder(index);
		}
		let layer = self.create_layer(num_strokes)?;
		self.create_strokes(layer)?;
		info!("layer {} added ({} strokes)", index, num_strokes);
		Ok(())
	}

	fn create_layer(&mut self, num_strokes : usize) -> Result<usize> {
		let index = self.layers.len();
		let config = LayerConfig {
			params: self.layer_params[index].clone(),
			num_strokes,
			background: self.features.colors[0],
		};
		let mut layer = self.backend.create_layer(&config)?;
		layer.set_visible(config.params.visible);
		layer.set_color(self.features.colors[1].with_alpha(self.features.color_weight));
		layer.resize(self.screen_size.0, self.screen_size.1, PIXEL_RATIO)?;
		self.layers.push(layer);
		Ok(index)
	}

	fn create_strokes(&mut self, index : usize) -> Result<()> {
		for j in 0..self.layers[index].num_strokes() {
			let reference = if index > 0 { self.layers[0].stroke(j).copied() } else { None };
			let stroke = stroke::create_stroke(index, &self.options, reference.as_ref(), &mut self.rng);
			self.markers.push(stroke.pos);
			self.layers[index].init_stroke(j, stroke);
		}
		Ok(())
	}

	/// Draws new parameters for layer `index`, keeping its visibility.
	fn regenerate_layer(&mut self, index : usize) -> Result<()> {
		let visible = self.layers[index].is_visible();
		let params = params::generate(&self.context, index, Some(visible), &mut self.rng)?;
		self.layers[index].set_options(&params);
		debug!("layer {} regenerated: {}", index, params.blend_key());
		self.layer_params[index] = params;
		Ok(())
	}

	pub fn regenerate_all(&mut self) -> Result<()> {
		for i in 0..self.layers.len() {
			self.regenerate_layer(i)?;
		}
		Ok(())
	}

	/// Clears a layer and gives it new parameters, stroke speeds and color.
	fn reset_layer(&mut self, index : usize) -> Result<()> {
		self.layers[index].reset()?;
		self.regenerate_layer(index)?;
		for j in 0..self.layers[index].num_strokes() {
			let speed = stroke::random_speed(&self.options, &mut self.rng);
			self.layers[index].set_speed(j, speed);
		}
		let color = palette::generate_color(self.features.palette, self.features.hsl_palette[0], &mut self.rng);
		self.layers[index].set_color(color.with_alpha(self.features.color_weight));
		Ok(())
	}

	fn create_cell(&mut self) -> Result<()> {
		info!("cell {}", self.cells.num_cells());
		self.backend.capture_history(&self.layers)?;
		self.regenerate_all()
	}

	/// Grows a cell now if the timer is running, then schedules the next.
	pub fn request_cell(&mut self, now : Instant) -> Result<()> {
		if self.cells.request(now, self.options.max_cells, &mut self.rng) {
			self.create_cell()?;
		}
		Ok(())
	}

	/// Per-frame step: fires a due cell, advances visible layers and lays
	/// out the debug panel.
	pub fn update(&mut self, now : Instant, dt : f64) -> Result<()> {
		if self.cells.poll(now, self.options.max_cells, &mut self.rng) {
			self.create_cell()?;
		}
		self.frame += 1;
		let (max_iterations, frame) = (self.options.max_iterations, self.frame);
		for layer in self.layers.iter_mut().filter(|l| l.is_visible()) {
			layer.update(dt, max_iterations, frame)?;
		}
		self.run_panel(now)
	}

	fn run_panel(&mut self, now : Instant) -> Result<()> {
		let gui = match self.gui.as_mut() {
			Some(gui) => gui,
			None => return Ok(()),
		};
		let bound = Bound { options: &mut self.options, layers: &mut self.layer_params, selection: &mut self.selection };
		let (edits, panel) = gui.run(now, self.screen_size, bound);
		self.panel = panel;
		for edit in edits {
			self.apply(edit)?;
		}
		Ok(())
	}

	/// Applies a panel edit. Layer edits reach the layer and restart every
	/// layer.
	fn apply(&mut self, edit : GuiEvent) -> Result<()> {
		match edit {
			GuiEvent::Layer(index) => self.apply_layer_edit(index),
			GuiEvent::Option(name) => {
				debug!("option {} edited", name);
				Ok(())
			}
			GuiEvent::Selection => Ok(()),
		}
	}

	/// Clicks on the debug panel belong to the panel.
	pub fn on_click(&mut self, now : Instant, x : i32, y : i32) -> Result<()> {
		if self.on_panel(x, y) {
			debug!("click on the debug panel");
			return Ok(());
		}
		debug!("click: {}", self.features.composition);
		match self.features.composition {
			CompositionKind::AddNew => self.add_layer(self.features.strokes_per_layer),
			CompositionKind::Reset => {
				for i in 0..self.layers.len() {
					self.reset_layer(i)?;
				}
				self.frame = 0;
				Ok(())
			}
			CompositionKind::Regenerate => self.regenerate_all(),
			CompositionKind::Cells => self.request_cell(now),
			CompositionKind::Box => Ok(()),
		}
	}

	/// Keys only reach the debug panel in developer mode.
	pub fn on_key(&mut self, key : Key) {
		if let Some(gui) = self.gui.as_mut() {
			gui.key_down(key);
		}
	}

	pub fn on_pointer_move(&mut self, x : i32, y : i32) {
		if let Some(gui) = self.gui.as_mut() {
			gui.pointer_moved(x, y);
		}
	}

	pub fn on_pointer_button(&mut self, x : i32, y : i32, pressed : bool) {
		if let Some(gui) = self.gui.as_mut() {
			gui.pointer_button(x, y, pressed);
		}
	}

	fn on_panel(&self, x : i32, y : i32) -> bool {
		self.gui.as_ref().map_or(false, |gui| gui.contains(x, y))
	}

	/// Edits layer `index` the way its panel folder does.
	pub fn edit_layer<E: FnOnce(&mut LayerParameters)>(&mut self, index : usize, edit : E) -> Result<()> {
		match self.layer_params.get_mut(index) {
			Some(params) => edit(params),
			None => return Err(StrataError::InvalidOption { name: "layer", value: index.to_string() }),
		}
		self.apply(GuiEvent::Layer(index))
	}

	/// Edits the options the way the panel's options folder does.
	pub fn edit_options<E: FnOnce(&mut Options)>(&mut self, edit : E) {
		edit(&mut self.options);
	}

	fn apply_layer_edit(&mut self, index : usize) -> Result<()> {
		let (params, layer) = match (self.layer_params.get(index), self.layers.get_mut(index)) {
			(Some(params), Some(layer)) => (params, layer),
			_ => return Err(StrataError::InvalidOption { name: "layer", value: index.to_string() }),
		};
		layer.set_visible(params.visible);
		layer.set_options(params);
		info!("layer {} edited: {}", index, params.blend_key());
		for layer in self.layers.iter_mut() {
			layer.reset()?;
		}
		Ok(())
	}

	pub fn on_resize(&mut self, width : u32, height : u32) -> Result<()> {
		self.screen_size = (width, height);
		self.backend.resize(width, height)?;
		for layer in self.layers.iter_mut() {
			layer.resize(width, height, PIXEL_RATIO)?;
		}
		Ok(())
	}

	/// True when the caller should reload: developer mode and the click was
	/// not on the debug panel.
	pub fn on_double_click(&self, x : i32, y : i32) -> bool {
		if !self.settings.dev_mode {
			return false;
		}
		let on_panel = self.on_panel(x, y);
		if on_panel {
			warn!("double click on the debug panel ignored");
		}
		!on_panel
	}

	pub fn render_parts(&mut self) -> (&mut B, SceneView<'_, B::Layer>) {
		let background = if self.features.transparent { None } else { Some(self.features.colors[0]) };
		let markers : &[[f64; 2]] = if self.options.show_debug { &self.markers } else { &[] };
		let visible = self.gui.as_ref().map_or(false, |gui| gui.is_visible());
		let panel = if visible { self.panel.as_ref() } else { None };
		let view = SceneView {
			background,
			layers: &self.layers,
			boxed: self.features.composition == CompositionKind::Box,
			history: self.history,
			markers,
			panel,
		};
		(&mut self.backend, view)
	}

	pub fn features(&self) -> &Features {
		&self.features
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	pub fn layers(&self) -> &[B::Layer] {
		&self.layers
	}

	pub fn layer_params(&self) -> &[LayerParameters] {
		&self.layer_params
	}

	pub fn backend(&self) -> &B {
		&self.backend
	}

	pub fn markers(&self) -> &[[f64; 2]] {
		&self.markers
	}

	pub fn markers_visible(&self) -> bool {
		self.options.show_debug
	}

	pub fn num_cells(&self) -> u32 {
		self.cells.num_cells()
	}

	pub fn frame(&self) -> u64 {
		self.frame
	}

	pub fn gui(&self) -> Option<&Gui> {
		self.gui.as_ref()
	}
}
