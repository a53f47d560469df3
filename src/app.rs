use std::time::{Duration, Instant};

use glium_sdl2::DisplayBuild;
use log::{error, info};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;

use fluid_strata::composition::Composition;
use fluid_strata::config::{Options, Selection, Settings};
use fluid_strata::fluid::GlBackend;
use fluid_strata::gui::Key;
use fluid_strata::{Result, StrataError};

const MAX_FRAME_TIME : Duration = Duration::from_millis(30);

type Artwork = Composition<GlBackend<glium_sdl2::Display>>;

pub struct App {
	sdl_context : sdl2::Sdl,
	display     : glium_sdl2::Display,
	composition : Option<Artwork>,
	last_frame  : Instant,
}

fn window_error(e : impl ToString) -> StrataError {
	StrataError::Window(e.to_string())
}

fn map_key(keycode : Keycode) -> Key {
	match keycode {
		Keycode::Up => Key::Up,
		Keycode::Down => Key::Down,
		Keycode::Left => Key::Left,
		Keycode::Right => Key::Right,
		Keycode::Space => Key::Space,
		Keycode::Tab => Key::Tab,
		Keycode::Return => Key::Enter,
		Keycode::H => Key::H,
		_ => Key::Other,
	}
}

impl App {
	pub fn new(settings : Settings, options : Options) -> Result<App> {
		let sdl_context = sdl2::init().map_err(window_error)?;
		let video_subsystem = sdl_context.video().map_err(window_error)?;
		let gl_attr = video_subsystem.gl_attr();
		gl_attr.set_context_version(3, 0);
		gl_attr.set_context_profile(sdl2::video::GLProfile::GLES);
		let display = video_subsystem.window(&settings.name, settings.screen_size.0, settings.screen_size.1)
			.resizable()
			.build_glium()
			.map_err(|e| StrataError::Window(format!("{:?}", e)))?;
		info!("window {}x{}", settings.screen_size.0, settings.screen_size.1);

		let backend = GlBackend::new(&display, settings.screen_size)?;
		let composition = Composition::new(settings, options, Selection::default(), backend, Instant::now())?;

		Ok(App {
			sdl_context,
			display,
			composition: Some(composition),
			last_frame: Instant::now(),
		})
	}

	/// Rebuilds the artwork, keeping options, selection and GL programs.
	fn reload(&mut self) -> Result<()> {
		let composition = match self.composition.take() {
			Some(composition) => composition,
			None => return Ok(()),
		};
		let (settings, options, selection, backend) = composition.into_parts();
		info!("reloading");
		self.composition = Some(Composition::new(settings, options, selection, backend, Instant::now())?);
		Ok(())
	}

	fn frame(&mut self) -> Result<()> {
		let now = Instant::now();
		let dt = std::cmp::min(now - self.last_frame, MAX_FRAME_TIME).as_secs_f64();
		self.last_frame = now;

		let composition = match self.composition.as_mut() {
			Some(composition) => composition,
			None => return Ok(()),
		};
		composition.update(now, dt)?;

		let mut target = self.display.draw();
		let (backend, view) = composition.render_parts();
		let drawn = backend.present(&mut target, &view);
		target.finish()?;
		drawn
	}

	fn handle(&mut self, event : Event) -> Result<()> {
		let now = Instant::now();
		let composition = match self.composition.as_mut() {
			Some(composition) => composition,
			None => return Ok(()),
		};
		match event {
			Event::MouseMotion { x, y, .. } => composition.on_pointer_move(x, y),
			Event::MouseButtonDown { mouse_btn: MouseButton::Left, x, y, .. } => composition.on_pointer_button(x, y, true),
			Event::MouseButtonUp { mouse_btn: MouseButton::Left, clicks, x, y, .. } => {
				composition.on_pointer_button(x, y, false);
				composition.on_click(now, x, y)?;
				if clicks == 2 && composition.on_double_click(x, y) {
					self.reload()?;
				}
			}
			Event::KeyDown { keycode: Some(keycode), .. } => composition.on_key(map_key(keycode)),
			Event::Window { win_event: WindowEvent::Resized(w, h), .. } => {
				composition.on_resize(w.max(1) as u32, h.max(1) as u32)?;
			}
			_ => (),
		}
		Ok(())
	}
}

impl emscripten_main_loop::MainLoop for App {
	fn main_loop(&mut self) -> emscripten_main_loop::MainLoopEvent {
		let mut running = emscripten_main_loop::MainLoopEvent::Continue;
		let mut event_pump = match self.sdl_context.event_pump() {
			Ok(pump) => pump,
			Err(e) => {
				error!("event pump: {}", e);
				return emscripten_main_loop::MainLoopEvent::Terminate;
			}
		};

		if let Err(e) = self.frame() {
			error!("frame: {}", e);
			return emscripten_main_loop::MainLoopEvent::Terminate;
		}

		let events : Vec<Event> = event_pump.poll_iter().collect();
		for event in events {
			match event {
				Event::Quit { .. } | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => {
					running = emscripten_main_loop::MainLoopEvent::Terminate;
				}
				event => {
					if let Err(e) = self.handle(event) {
						error!("{}", e);
						running = emscripten_main_loop::MainLoopEvent::Terminate;
					}
				}
			}
		}
		running
	}
}
