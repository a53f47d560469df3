//! Developer panel drawn with egui.
//!
//! Folders of controls are bound to the options, to each layer's parameters
//! and to the palette/composition selection. Input is queued as egui events
//! between frames; [`Gui::run`] lays the panel out once per frame, returns
//! what was edited and the tessellated panel for the renderer.

use std::mem;
use std::ops::RangeInclusive;
use std::time::Instant;

use egui::emath::Numeric;
use egui::{Align2, ClippedPrimitive, Modifiers, PointerButton, Pos2, Rect, TexturesDelta, Ui, Vec2};
use log::info;

use crate::config::{Options, Selection, StrokeRelation};
use crate::params::LayerParameters;

pub const PANEL_WIDTH  : f32 = 240.0;
pub const PANEL_MARGIN : f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
	Up,
	Down,
	Left,
	Right,
	Space,
	Tab,
	Enter,
	H,
	Other,
}

impl Key {
	fn to_egui(self) -> Option<egui::Key> {
		Some(match self {
			Key::Up => egui::Key::ArrowUp,
			Key::Down => egui::Key::ArrowDown,
			Key::Left => egui::Key::ArrowLeft,
			Key::Right => egui::Key::ArrowRight,
			Key::Space => egui::Key::Space,
			Key::Tab => egui::Key::Tab,
			Key::Enter => egui::Key::Enter,
			Key::H | Key::Other => return None,
		})
	}
}

/// Mutable state the panel edits.
pub struct Bound<'a> {
	pub options   : &'a mut Options,
	pub layers    : &'a mut [LayerParameters],
	pub selection : &'a mut Selection,
}

/// An edit the composition has to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuiEvent {
	Option(&'static str),
	Layer(usize),
	Selection,
}

/// One frame of the panel, ready to paint.
pub struct PanelFrame {
	pub primitives       : Vec<ClippedPrimitive>,
	pub textures         : TexturesDelta,
	pub pixels_per_point : f32,
}

pub struct Gui {
	context : egui::Context,
	visible : bool,
	layers  : usize,
	events  : Vec<egui::Event>,
	rect    : Option<Rect>,
	started : Option<Instant>,
}

impl Gui {
	pub fn new() -> Gui {
		Gui {
			context: egui::Context::default(),
			visible: true,
			layers: 0,
			events: Vec::new(),
			rect: None,
			started: None,
		}
	}

	pub fn add_layer_folder(&mut self, index : usize) {
		self.layers = self.layers.max(index + 1);
	}

	pub fn folder_names(&self) -> Vec<String> {
		let mut names = vec!["Options".to_string(), "Compositions".to_string(), "Palettes".to_string()];
		names.extend((0..self.layers).map(|i| format!("Layer {}", i)));
		names
	}

	pub fn is_visible(&self) -> bool {
		self.visible
	}

	/// `H` shows or hides the panel, other keys go to the focused control.
	pub fn key_down(&mut self, key : Key) {
		if key == Key::H {
			self.visible = !self.visible;
			info!("gui: {}", if self.visible { "shown" } else { "hidden" });
			return;
		}
		if let Some(key) = key.to_egui() {
			for pressed in [true, false].iter() {
				self.events.push(egui::Event::Key { key, physical_key: None, pressed: *pressed, repeat: false, modifiers: Modifiers::NONE });
			}
		}
	}

	pub fn pointer_moved(&mut self, x : i32, y : i32) {
		self.events.push(egui::Event::PointerMoved(Pos2::new(x as f32, y as f32)));
	}

	pub fn pointer_button(&mut self, x : i32, y : i32, pressed : bool) {
		let pos = Pos2::new(x as f32, y as f32);
		self.events.push(egui::Event::PointerMoved(pos));
		self.events.push(egui::Event::PointerButton { pos, button: PointerButton::Primary, pressed, modifiers: Modifiers::NONE });
	}

	/// Panel rectangle of the last frame, in window pixels.
	pub fn rect(&self) -> Option<Rect> {
		if self.visible { self.rect } else { None }
	}

	pub fn contains(&self, x : i32, y : i32) -> bool {
		self.rect().map_or(false, |rect| rect.contains(Pos2::new(x as f32, y as f32)))
	}

	/// Lays the panel out over a `screen_size` window, applying queued input
	/// to `bound`. Nothing is drawn while the panel is hidden.
	pub fn run(&mut self, now : Instant, screen_size : (u32, u32), mut bound : Bound<'_>) -> (Vec<GuiEvent>, Option<PanelFrame>) {
		let queued = mem::replace(&mut self.events, Vec::new());
		if !self.visible {
			return (Vec::new(), None);
		}
		let started = *self.started.get_or_insert(now);
		let input = egui::RawInput {
			screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(screen_size.0 as f32, screen_size.1 as f32))),
			time: Some((now - started).as_secs_f64()),
			events: queued,
			..Default::default()
		};

		let layers = self.layers;
		let mut edits = Vec::new();
		let mut rect = None;
		let output = self.context.run(input, |ctx| {
			let shown = egui::Window::new("Debug")
				.anchor(Align2::RIGHT_TOP, [-PANEL_MARGIN, PANEL_MARGIN])
				.default_width(PANEL_WIDTH)
				.resizable(false)
				.show(ctx, |ui| {
					egui::ScrollArea::vertical()
						.max_height(screen_size.1 as f32 - 4.0 * PANEL_MARGIN)
						.show(ui, |ui| panel(ui, layers, &mut bound, &mut edits));
				});
			rect = shown.map(|response| response.response.rect);
		});
		self.rect = rect;

		for edit in edits.iter() {
			info!("gui: {:?}", edit);
		}
		let primitives = self.context.tessellate(output.shapes, output.pixels_per_point);
		let frame = PanelFrame { primitives, textures: output.textures_delta, pixels_per_point: output.pixels_per_point };
		(edits, Some(frame))
	}
}

impl Default for Gui {
	fn default() -> Gui {
		Gui::new()
	}
}

fn slider<N: Numeric>(ui : &mut Ui, value : &mut N, range : RangeInclusive<N>, step : f64, label : &str) -> bool {
	ui.add(egui::Slider::new(value, range).step_by(step).text(label)).changed()
}

fn panel(ui : &mut Ui, layers : usize, bound : &mut Bound<'_>, edits : &mut Vec<GuiEvent>) {
	ui.collapsing("Options", |ui| options_folder(ui, bound.options, edits));

	ui.collapsing("Compositions", |ui| {
		for (kind, enabled) in bound.selection.compositions.iter_mut() {
			if ui.checkbox(enabled, kind.name()).changed() {
				edits.push(GuiEvent::Selection);
			}
		}
	});
	ui.collapsing("Palettes", |ui| {
		for (palette, enabled) in bound.selection.palettes.iter_mut() {
			if ui.checkbox(enabled, palette.name()).changed() {
				edits.push(GuiEvent::Selection);
			}
		}
	});

	for (index, params) in bound.layers.iter_mut().enumerate().take(layers) {
		egui::CollapsingHeader::new(format!("Layer {}", index)).show(ui, |ui| {
			if layer_folder(ui, params) {
				edits.push(GuiEvent::Layer(index));
			}
		});
	}
}

fn options_folder(ui : &mut Ui, options : &mut Options, edits : &mut Vec<GuiEvent>) {
	let mut changed = |name : &'static str, edited : bool| {
		if edited {
			edits.push(GuiEvent::Option(name));
		}
	};
	changed("min_layers", slider(ui, &mut options.min_layers, 1..=5, 1.0, "minLayers"));
	changed("max_layers", slider(ui, &mut options.max_layers, 1..=5, 1.0, "maxLayers"));
	changed("min_strokes", slider(ui, &mut options.min_strokes, 1..=22, 1.0, "minStrokes"));
	changed("max_strokes", slider(ui, &mut options.max_strokes, 1..=22, 1.0, "maxStrokes"));

	let mut relation = options.strokes_rel;
	egui::ComboBox::from_label("strokesRel")
		.selected_text(relation.name())
		.show_ui(ui, |ui| {
			for candidate in StrokeRelation::ALL.iter() {
				ui.selectable_value(&mut relation, *candidate, candidate.name());
			}
		});
	if relation != options.strokes_rel {
		options.strokes_rel = relation;
		changed("strokes_rel", true);
	}

	changed("max_cells", slider(ui, &mut options.max_cells, 5..=20, 1.0, "maxCells"));
	changed("min_speed", slider(ui, &mut options.min_speed, 0.001..=0.01, 0.001, "minSpeed"));
	changed("max_speed", slider(ui, &mut options.max_speed, 0.01..=0.1, 0.001, "maxSpeed"));
	changed("speed_mult", slider(ui, &mut options.speed_mult, 0.1..=10.0, 0.1, "speedMult"));
	changed("max_iterations", slider(ui, &mut options.max_iterations, 1..=20, 1.0, "maxIterations"));
	changed("show_debug", ui.checkbox(&mut options.show_debug, "showDebug").changed());
}

fn layer_folder(ui : &mut Ui, params : &mut LayerParameters) -> bool {
	let mut edited = ui.checkbox(&mut params.visible, "visible").changed();
	edited |= slider(ui, &mut params.blend_mode_pass, 0..=5, 1.0, "blendModePass");
	edited |= slider(ui, &mut params.blend_mode_view, 2..=5, 1.0, "blendModeView");
	edited |= slider(ui, &mut params.dt, 0.0..=1.0, 0.01, "dt");
	edited |= slider(ui, &mut params.k, 0.0..=1.0, 0.01, "K");
	edited |= slider(ui, &mut params.nu, 0.0..=1.0, 0.01, "nu");
	edited |= slider(ui, &mut params.kappa, 0.0..=1.0, 0.01, "kappa");
	edited
}

#[cfg(test)]
mod tests {
	use super::*;

	const SCREEN : (u32, u32) = (1024, 768);

	fn layer() -> LayerParameters {
		LayerParameters { visible: true, blend_mode_pass: 1, blend_mode_view: 3, dt: 0.25, k: 0.4, nu: 0.5, kappa: 0.5 }
	}

	fn run(gui : &mut Gui, options : &mut Options, layers : &mut [LayerParameters]) -> (Vec<GuiEvent>, Option<PanelFrame>) {
		let mut selection = Selection::default();
		gui.run(Instant::now(), SCREEN, Bound { options, layers, selection: &mut selection })
	}

	#[test]
	fn layer_folders_follow_layers() {
		let mut gui = Gui::new();
		gui.add_layer_folder(0);
		gui.add_layer_folder(1);
		assert_eq!(gui.folder_names(), vec!["Options", "Compositions", "Palettes", "Layer 0", "Layer 1"]);
	}

	#[test]
	fn panel_sits_in_the_top_right_corner() {
		let mut gui = Gui::new();
		let mut options = Options::default();
		assert!(gui.rect().is_none());

		let (edits, frame) = run(&mut gui, &mut options, &mut [layer()]);
		assert!(edits.is_empty());
		assert!(!frame.expect("panel frame").textures.set.is_empty());

		let rect = gui.rect().expect("panel rectangle");
		assert!(rect.max.x <= SCREEN.0 as f32);
		assert!(rect.min.x > SCREEN.0 as f32 / 2.0);
		assert!(gui.contains(rect.min.x as i32 + 2, rect.min.y as i32 + 2));
		assert!(!gui.contains(0, 0));
	}

	#[test]
	fn hidden_panel_is_neither_drawn_nor_hit() {
		let mut gui = Gui::new();
		let mut options = Options::default();
		run(&mut gui, &mut options, &mut []);
		let rect = gui.rect().expect("panel rectangle");

		gui.key_down(Key::H);
		assert!(!gui.is_visible());
		assert!(!gui.contains(rect.min.x as i32 + 2, rect.min.y as i32 + 2));
		gui.pointer_button(rect.min.x as i32 + 2, rect.min.y as i32 + 2, true);
		let (edits, frame) = run(&mut gui, &mut options, &mut []);
		assert!(edits.is_empty());
		assert!(frame.is_none());

		gui.key_down(Key::H);
		assert!(gui.is_visible());
	}

	#[test]
	fn untouched_panel_leaves_values_alone() {
		let mut gui = Gui::new();
		gui.add_layer_folder(0);
		let mut options = Options::default();
		let mut layers = vec![layer()];
		for _ in 0..3 {
			run(&mut gui, &mut options, &mut layers);
		}
		assert_eq!(options, Options::default());
		assert_eq!(layers[0], layer());
	}
}
