//! Composition behaviour against a recording backend.

use std::time::{Duration, Instant};

use fluid_strata::composition::{Backend, Composition, FluidLayer, LayerConfig, PIXEL_RATIO};
use fluid_strata::config::{CompositionKind, Options, Selection, Settings, StrokeRelation};
use fluid_strata::gui::Key;
use fluid_strata::palette::Palette;
use fluid_strata::params::{self, GenerationContext, LayerParameters};
use fluid_strata::stroke::Stroke;
use fluid_strata::Result;

struct MockLayer {
	strokes     : Vec<Stroke>,
	params      : LayerParameters,
	color       : [f32; 4],
	visible     : bool,
	resets      : usize,
	updates     : usize,
	options_set : usize,
	size        : Option<(u32, u32, u32)>,
	last_frame  : Option<u64>,
}

impl FluidLayer for MockLayer {
	fn num_strokes(&self) -> usize {
		self.strokes.len()
	}

	fn init_stroke(&mut self, index : usize, stroke : Stroke) {
		self.strokes[index] = stroke;
	}

	fn stroke(&self, index : usize) -> Option<&Stroke> {
		self.strokes.get(index)
	}

	fn set_speed(&mut self, index : usize, speed : f64) {
		self.strokes[index].speed = speed;
	}

	fn set_options(&mut self, params : &LayerParameters) {
		self.params = params.clone();
		self.options_set += 1;
	}

	fn set_color(&mut self, color : [f32; 4]) {
		self.color = color;
	}

	fn is_visible(&self) -> bool {
		self.visible
	}

	fn set_visible(&mut self, visible : bool) {
		self.visible = visible;
	}

	fn reset(&mut self) -> Result<()> {
		self.resets += 1;
		Ok(())
	}

	fn resize(&mut self, width : u32, height : u32, pixel_ratio : u32) -> Result<()> {
		self.size = Some((width, height, pixel_ratio));
		Ok(())
	}

	fn update(&mut self, _dt : f64, _max_iterations : u32, frame : u64) -> Result<()> {
		self.updates += 1;
		self.last_frame = Some(frame);
		Ok(())
	}
}

#[derive(Default)]
struct MockBackend {
	history  : bool,
	captures : usize,
	resized  : Option<(u32, u32)>,
}

impl Backend for MockBackend {
	type Layer = MockLayer;

	fn create_layer(&mut self, config : &LayerConfig) -> Result<MockLayer> {
		let idle = Stroke { speed: 0.0, pos: [0.0, 0.0], target: [0.0, 0.0] };
		Ok(MockLayer {
			strokes: vec![idle; config.num_strokes],
			params: config.params.clone(),
			color: [0.0; 4],
			visible: true,
			resets: 0,
			updates: 0,
			options_set: 0,
			size: None,
			last_frame: None,
		})
	}

	fn resize(&mut self, width : u32, height : u32) -> Result<()> {
		self.resized = Some((width, height));
		Ok(())
	}

	fn set_history(&mut self, enabled : bool) -> Result<()> {
		self.history = enabled;
		Ok(())
	}

	fn capture_history(&mut self, _layers : &[MockLayer]) -> Result<()> {
		self.captures += 1;
		Ok(())
	}
}

fn settings(kind : CompositionKind, dev_mode : bool) -> Settings {
	Settings {
		seed: Some(1234),
		dev_mode,
		palette: Some(Palette::BlackWhite),
		composition: Some(kind),
		..Settings::default()
	}
}

fn options() -> Options {
	Options { min_layers: 2, max_layers: 2, min_strokes: 3, max_strokes: 3, ..Options::default() }
}

fn build(kind : CompositionKind, dev_mode : bool) -> Composition<MockBackend> {
	Composition::new(settings(kind, dev_mode), options(), Selection::default(), MockBackend::default(), Instant::now()).unwrap()
}

#[test]
fn default_scene_builds_valid_layers() {
	let composition = build(CompositionKind::Regenerate, false);
	let context = GenerationContext { palette: Palette::BlackWhite };

	assert_eq!(composition.layers().len(), 2);
	for (i, p) in composition.layer_params().iter().enumerate() {
		assert!(params::validate(&context, p, i));
	}
	for layer in composition.layers() {
		assert_eq!(layer.num_strokes(), 3);
		assert_eq!(layer.size, Some((1024, 768, PIXEL_RATIO)));
	}
	assert_eq!(composition.markers().len(), 6);
	assert!(!composition.backend().history);
}

#[test]
fn same_relation_copies_first_layer_strokes() {
	let options = Options { strokes_rel: StrokeRelation::Same, ..options() };
	let composition = Composition::new(settings(CompositionKind::Regenerate, false), options, Selection::default(), MockBackend::default(), Instant::now()).unwrap();
	let layers = composition.layers();
	assert_eq!(layers[0].strokes, layers[1].strokes);
}

#[test]
fn regenerate_click_redraws_every_layer() {
	let mut composition = build(CompositionKind::Regenerate, false);
	composition.on_click(Instant::now(), 10, 10).unwrap();
	for (layer, p) in composition.layers().iter().zip(composition.layer_params()) {
		assert_eq!(layer.options_set, 1);
		assert_eq!(&layer.params, p);
	}
}

#[test]
fn addnew_click_appends_a_layer() {
	let mut composition = build(CompositionKind::AddNew, true);
	composition.on_click(Instant::now(), 10, 10).unwrap();
	assert_eq!(composition.layers().len(), 3);
	assert_eq!(composition.layer_params().len(), 3);

	assert!(composition.gui().unwrap().folder_names().contains(&"Layer 2".to_string()));
}

#[test]
fn reset_click_clears_layers_and_frame_counter() {
	let mut composition = build(CompositionKind::Reset, false);
	let now = Instant::now();
	composition.update(now, 0.016).unwrap();
	composition.update(now, 0.016).unwrap();
	assert_eq!(composition.frame(), 2);

	composition.on_click(now, 10, 10).unwrap();
	assert_eq!(composition.frame(), 0);
	composition.update(now, 0.016).unwrap();
	assert!(composition.layers().iter().filter(|l| l.visible).all(|l| l.last_frame == Some(1)));
	let options = composition.options().clone();
	for layer in composition.layers() {
		assert_eq!(layer.resets, 1);
		assert_eq!(layer.options_set, 1);
		for stroke in layer.strokes.iter() {
			assert!(stroke.speed >= options.min_speed * options.speed_mult);
			assert!(stroke.speed <= options.max_speed * options.speed_mult);
		}
		// Black&White colors are grey
		assert_eq!(layer.color[0], layer.color[1]);
	}
}

#[test]
fn cells_grow_on_click_and_on_timer() {
	let mut composition = build(CompositionKind::Cells, false);
	assert!(composition.backend().history);
	assert_eq!(composition.num_cells(), 0);

	let start = Instant::now();
	composition.on_click(start, 10, 10).unwrap();
	assert_eq!(composition.num_cells(), 1);
	assert_eq!(composition.backend().captures, 1);
	assert!(composition.layers().iter().all(|l| l.options_set == 1));

	composition.update(start + Duration::from_secs(8), 0.016).unwrap();
	assert_eq!(composition.num_cells(), 2);
	assert_eq!(composition.backend().captures, 2);
}

#[test]
fn box_scene_has_one_layer_and_ignores_clicks() {
	let mut composition = build(CompositionKind::Box, false);
	assert_eq!(composition.layers().len(), 1);
	composition.on_click(Instant::now(), 10, 10).unwrap();
	assert_eq!(composition.layers().len(), 1);
	assert_eq!(composition.layers()[0].options_set, 0);
}

#[test]
fn resize_reaches_backend_and_layers() {
	let mut composition = build(CompositionKind::Regenerate, false);
	composition.on_resize(800, 600).unwrap();
	assert_eq!(composition.backend().resized, Some((800, 600)));
	for layer in composition.layers() {
		assert_eq!(layer.size, Some((800, 600, 1)));
	}
}

#[test]
fn only_visible_layers_update() {
	let mut composition = build(CompositionKind::Regenerate, true);
	composition.edit_layer(0, |params| params.visible = false).unwrap();

	assert!(!composition.layers()[0].visible);
	assert!(composition.layers().iter().all(|l| l.resets == 1));

	composition.update(Instant::now(), 0.016).unwrap();
	assert_eq!(composition.layers()[0].updates, 0);
	assert_eq!(composition.layers()[1].updates, 1);

	composition.regenerate_all().unwrap();
	assert!(!composition.layer_params()[0].visible);
}

#[test]
fn layer_edit_reaches_its_layer() {
	let mut composition = build(CompositionKind::Regenerate, true);
	composition.edit_layer(1, |params| params.kappa = 0.9).unwrap();
	assert_eq!(composition.layers()[1].params.kappa, 0.9);
	assert_eq!(composition.layers()[0].options_set, 0);
	assert!(composition.edit_layer(5, |params| params.kappa = 0.9).is_err());
}

#[test]
fn keys_are_ignored_outside_developer_mode() {
	let mut composition = build(CompositionKind::Regenerate, false);
	let before = composition.options().clone();
	for _ in 0..5 {
		composition.on_key(Key::Right);
	}
	composition.update(Instant::now(), 0.016).unwrap();
	assert_eq!(composition.options(), &before);
	assert!(composition.gui().is_none());
	let (_, view) = composition.render_parts();
	assert!(view.panel.is_none());
}

#[test]
fn show_debug_toggles_markers() {
	let mut composition = build(CompositionKind::Regenerate, true);
	assert!(!composition.markers_visible());
	composition.edit_options(|options| options.show_debug = true);
	assert!(composition.markers_visible());

	let (_, view) = composition.render_parts();
	assert_eq!(view.markers.len(), 6);
}

#[test]
fn panel_is_drawn_with_text_in_developer_mode() {
	let mut composition = build(CompositionKind::Regenerate, true);
	let now = Instant::now();
	composition.update(now, 0.016).unwrap();
	{
		let (_, view) = composition.render_parts();
		let panel = view.panel.expect("debug panel");
		// the font atlas
		assert!(!panel.textures.set.is_empty());
	}
	composition.update(now + Duration::from_millis(16), 0.016).unwrap();
	let (_, view) = composition.render_parts();
	assert!(!view.panel.expect("debug panel").primitives.is_empty());

	composition.on_key(Key::H);
	composition.update(now + Duration::from_millis(32), 0.016).unwrap();
	let (_, view) = composition.render_parts();
	assert!(view.panel.is_none());
}

#[test]
fn clicks_on_the_panel_do_not_reach_the_scene() {
	let mut composition = build(CompositionKind::AddNew, true);
	let now = Instant::now();
	composition.update(now, 0.016).unwrap();
	let rect = composition.gui().unwrap().rect().expect("panel rectangle");
	let (x, y) = (rect.min.x as i32 + 2, rect.min.y as i32 + 2);

	composition.on_click(now, x, y).unwrap();
	assert_eq!(composition.layers().len(), 2);

	composition.on_click(now, 10, 10).unwrap();
	assert_eq!(composition.layers().len(), 3);
}

#[test]
fn cells_past_the_cap_grow_without_scheduling() {
	let options = Options { max_cells: 5, ..options() };
	let start = Instant::now();
	let mut composition = Composition::new(settings(CompositionKind::Cells, false), options, Selection::default(), MockBackend::default(), start).unwrap();

	for i in 1..=7 {
		composition.on_click(start, 10, 10).unwrap();
		assert_eq!(composition.num_cells(), i);
	}
	assert_eq!(composition.backend().captures, 7);

	// nothing is pending past the cap
	composition.update(start + Duration::from_secs(60), 0.016).unwrap();
	assert_eq!(composition.num_cells(), 7);
}

#[test]
fn double_click_reloads_only_in_developer_mode_off_the_panel() {
	assert!(!build(CompositionKind::Regenerate, false).on_double_click(10, 10));

	let mut composition = build(CompositionKind::Regenerate, true);
	composition.update(Instant::now(), 0.016).unwrap();
	assert!(composition.on_double_click(10, 10));
	let rect = composition.gui().unwrap().rect().expect("panel rectangle");
	assert!(!composition.on_double_click(rect.min.x as i32 + 2, rect.min.y as i32 + 2));
}

#[test]
fn reload_keeps_options_and_reproduces_seeded_scene() {
	let mut composition = build(CompositionKind::Regenerate, true);
	composition.edit_options(|options| options.max_cells += 1);
	let first = composition.layer_params().to_vec();

	let (settings, options, selection, backend) = composition.into_parts();
	assert_eq!(options.max_cells, Options::default().max_cells + 1);

	let reloaded = Composition::new(settings, options, selection, backend, Instant::now()).unwrap();
	assert_eq!(reloaded.layer_params(), &first[..]);
}
