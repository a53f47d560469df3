use std::mem::swap;
use std::rc::Rc;

use glium::backend::Facade;
use glium::{texture, Surface};

use super::{blend, boundary_sampler, empty_texture, Programs, SIMULATION_SIZE};
use crate::composition::{FluidLayer, LayerConfig};
use crate::error::Result;
use crate::palette::Rgb;
use crate::params::LayerParameters;
use crate::stroke::Stroke;

const INK_DRAG   : f32 = 7.0;
const INK_SPREAD : f32 = 50.0;
const INK_SIZE   : f32 = 15.0;
const VORTICITY  : f32 = 5.0;

/// Frames over which ink fades in after the scene starts or is reset.
const INK_WARMUP_FRAMES : f32 = 60.0;

/// Unit-square distance a stroke of speed 1 covers per second.
const STROKE_PACE : f64 = 6.0;
/// `dt` at which the simulation runs in real time.
const REFERENCE_DT : f64 = 0.25;

struct Textures {
	color         : texture::Texture2d,
	color_work    : texture::Texture2d,
	velocity      : texture::Texture2d,
	velocity_work : texture::Texture2d,
	divergence    : texture::Texture2d,
	curl          : texture::Texture2d,
	pressure      : texture::Texture2d,
	pressure_work : texture::Texture2d,
}

impl Textures {
	fn new<F: Facade>(facade : &F, color_size : (u32, u32)) -> Result<Textures> {
		Ok(Textures {
			color: empty_texture(facade, color_size)?,
			color_work: empty_texture(facade, color_size)?,
			velocity: empty_texture(facade, SIMULATION_SIZE)?,
			velocity_work: empty_texture(facade, SIMULATION_SIZE)?,
			divergence: empty_texture(facade, SIMULATION_SIZE)?,
			curl: empty_texture(facade, SIMULATION_SIZE)?,
			pressure: empty_texture(facade, SIMULATION_SIZE)?,
			pressure_work: empty_texture(facade, SIMULATION_SIZE)?,
		})
	}
}

/// Fluid simulation of one layer: velocity and pressure at simulation
/// resolution, ink at window resolution.
pub struct GlFluidLayer<F: Facade + Clone> {
	facade      : F,
	programs    : Rc<Programs>,
	params      : LayerParameters,
	color       : [f32; 4],
	visible     : bool,
	background  : Rgb,
	strokes     : Vec<Stroke>,
	travelled   : Vec<f64>,
	color_size  : (u32, u32),
	textures    : Textures,
}

impl<F: Facade + Clone> GlFluidLayer<F> {
	pub(super) fn new(facade : &F, programs : Rc<Programs>, config : &LayerConfig, color_size : (u32, u32)) -> Result<GlFluidLayer<F>> {
		let idle = Stroke { speed: 0.0, pos: [0.5, 0.5], target: [0.5, 0.5] };
		let mut layer = GlFluidLayer {
			facade: facade.clone(),
			programs,
			params: config.params.clone(),
			color: [1.0, 1.0, 1.0, 1.0],
			visible: config.params.visible,
			background: config.background,
			strokes: vec![idle; config.num_strokes],
			travelled: vec![0.0; config.num_strokes],
			color_size,
			textures: Textures::new(facade, color_size)?,
		};
		layer.reset()?;
		Ok(layer)
	}

	pub fn params(&self) -> &LayerParameters {
		&self.params
	}

	pub fn color_texture(&self) -> &texture::Texture2d {
		&self.textures.color
	}

	fn clear_color(&self) -> (f32, f32, f32, f32) {
		(self.background.r, self.background.g, self.background.b, 0.0)
	}
}

impl<F: Facade + Clone> FluidLayer for GlFluidLayer<F> {
	fn num_strokes(&self) -> usize {
		self.strokes.len()
	}

	fn init_stroke(&mut self, index : usize, stroke : Stroke) {
		if let Some(slot) = self.strokes.get_mut(index) {
			*slot = stroke;
			self.travelled[index] = 0.0;
		}
	}

	fn stroke(&self, index : usize) -> Option<&Stroke> {
		self.strokes.get(index)
	}

	fn set_speed(&mut self, index : usize, speed : f64) {
		if let Some(stroke) = self.strokes.get_mut(index) {
			stroke.speed = speed;
		}
	}

	fn set_options(&mut self, params : &LayerParameters) {
		self.params = params.clone();
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
		let (r, g, b, a) = self.clear_color();
		self.textures.color.as_surface().clear_color(r, g, b, a);
		self.textures.color_work.as_surface().clear_color(r, g, b, a);
		for texture in [
			&self.textures.velocity,
			&self.textures.velocity_work,
			&self.textures.divergence,
			&self.textures.curl,
			&self.textures.pressure,
			&self.textures.pressure_work,
		].iter() {
			texture.as_surface().clear_color(0.0, 0.0, 0.0, 0.0);
		}
		for distance in self.travelled.iter_mut() {
			*distance = 0.0;
		}
		Ok(())
	}

	fn resize(&mut self, width : u32, height : u32, pixel_ratio : u32) -> Result<()> {
		let size = ((width * pixel_ratio).max(1), (height * pixel_ratio).max(1));
		if size == self.color_size {
			return Ok(());
		}
		self.textures.color = empty_texture(&self.facade, size)?;
		self.textures.color_work = empty_texture(&self.facade, size)?;
		self.color_size = size;
		let (r, g, b, a) = self.clear_color();
		self.textures.color.as_surface().clear_color(r, g, b, a);
		Ok(())
	}

	fn update(&mut self, dt : f64, max_iterations : u32, frame : u64) -> Result<()> {
		let step = (dt * self.params.dt / REFERENCE_DT) as f32;
		let warmup = (frame as f32 / INK_WARMUP_FRAMES).min(1.0);
		let programs = &*self.programs;
		let textures = &mut self.textures;

		let simulation_viewport = glium::Rect { left: 0, bottom: 0, width: SIMULATION_SIZE.0, height: SIMULATION_SIZE.1 };
		let simulation_parameters = glium::DrawParameters { viewport: Some(simulation_viewport), ..Default::default() };
		let texelsize = (1.0 / (SIMULATION_SIZE.0 as f32), 1.0 / (SIMULATION_SIZE.1 as f32));
		let sim = (SIMULATION_SIZE.0 as f64, SIMULATION_SIZE.1 as f64);

		let mut states = Vec::with_capacity(self.strokes.len());
		for (stroke, travelled) in self.strokes.iter().zip(self.travelled.iter_mut()) {
			*travelled += stroke.speed * STROKE_PACE * dt;
			let (pos, vel) = stroke.state_at(*travelled);
			states.push((
				((pos[0] * sim.0) as f32, (pos[1] * sim.1) as f32),
				((vel[0] * STROKE_PACE * sim.0) as f32, (vel[1] * STROKE_PACE * sim.1) as f32),
			));
		}

		textures.curl.as_surface().draw(&programs.quad_vertices, &programs.quad_indices, &programs.curl,
			&uniform! {
				velocity: boundary_sampler(&textures.velocity),
				texelsize: texelsize },
			&simulation_parameters)?;

		textures.velocity_work.as_surface().draw(&programs.quad_vertices, &programs.quad_indices, &programs.vorticity,
			&uniform! {
				velocity: boundary_sampler(&textures.velocity),
				curl: boundary_sampler(&textures.curl),
				texelsize: texelsize, vorticity: VORTICITY, dt: step },
			&simulation_parameters)?;
		swap(&mut textures.velocity, &mut textures.velocity_work);

		textures.divergence.as_surface().draw(&programs.quad_vertices, &programs.quad_indices, &programs.divergence,
			&uniform! {
				velocity: boundary_sampler(&textures.velocity),
				texelsize: texelsize },
			&simulation_parameters)?;

		for _ in 0..max_iterations.max(1) {
			textures.pressure_work.as_surface().draw(&programs.quad_vertices, &programs.quad_indices, &programs.pressure,
				&uniform! {
					divergence: boundary_sampler(&textures.divergence),
					pressure: boundary_sampler(&textures.pressure),
					texelsize: texelsize },
				&simulation_parameters)?;
			swap(&mut textures.pressure, &mut textures.pressure_work);
		}

		textures.velocity_work.as_surface().draw(&programs.quad_vertices, &programs.quad_indices, &programs.gradient,
			&uniform! {
				velocity: boundary_sampler(&textures.velocity),
				pressure: boundary_sampler(&textures.pressure),
				texelsize: texelsize, k: self.params.k as f32 },
			&simulation_parameters)?;
		swap(&mut textures.velocity, &mut textures.velocity_work);

		for (position, velocity) in states.iter() {
			textures.velocity.as_surface().draw(&programs.quad_vertices, &programs.quad_indices, &programs.force,
				&uniform! {
					ink_position: *position,
					ink_velocity: *velocity,
					ink_size: INK_SIZE,
					ink_drag: INK_DRAG,
					ink_spread: INK_SPREAD,
					texelsize: texelsize,
					dt: step },
				&glium::DrawParameters {
					viewport: Some(simulation_viewport),
					blend: glium::Blend::alpha_blending(),
					..Default::default() })?;
		}

		let ink_parameters = glium::DrawParameters { blend: blend(self.params.pass_blend()), ..Default::default() };
		let ink_color = (self.color[0], self.color[1], self.color[2], self.color[3]);
		for (position, _) in states.iter() {
			textures.color.as_surface().draw(&programs.quad_vertices, &programs.quad_indices, &programs.ink,
				&uniform! {
					ink_position: *position,
					ink_color: ink_color,
					ink_size: INK_SIZE,
					warmup: warmup,
					texelsize: texelsize },
				&ink_parameters)?;
		}

		textures.velocity_work.as_surface().draw(&programs.quad_vertices, &programs.quad_indices, &programs.advection,
			&uniform! {
				image: boundary_sampler(&textures.velocity),
				velocity: boundary_sampler(&textures.velocity),
				texelsize: texelsize, dt: step,
				dissipation: (1.0 - 0.01 * self.params.nu) as f32 },
			&simulation_parameters)?;
		swap(&mut textures.velocity, &mut textures.velocity_work);

		textures.color_work.as_surface().draw(&programs.quad_vertices, &programs.quad_indices, &programs.advection,
			&uniform! {
				image: boundary_sampler(&textures.color),
				velocity: boundary_sampler(&textures.velocity),
				texelsize: texelsize, dt: step,
				dissipation: (1.0 - 0.005 * self.params.kappa) as f32 },
			&Default::default())?;
		swap(&mut textures.color, &mut textures.color_work);

		Ok(())
	}
}
