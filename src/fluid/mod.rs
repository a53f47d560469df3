//! glium backend: per-layer fluid simulation and the display compositor.

mod layer;
mod panel;
pub mod shaders;

use std::mem::swap;
use std::rc::Rc;

use glium::backend::Facade;
use glium::index::{NoIndices, PrimitiveType};
use glium::uniforms::{MagnifySamplerFilter, MinifySamplerFilter, Sampler, SamplerWrapFunction};
use glium::{texture, Blend, BlendingFunction, LinearBlendingFactor, Program, Surface};
use log::debug;

pub use self::layer::GlFluidLayer;
use self::panel::PanelPainter;
use crate::composition::{Backend, FluidLayer, LayerConfig, SceneView};
use crate::error::Result;
use crate::params::BlendMode;

pub const SIMULATION_SIZE : (u32, u32) = (320, 240);

/// Side of the box composition's square, relative to the shorter screen side.
const BOX_SCALE  : f32 = 0.6;
const CROSS_SIZE : f32 = 0.015;

const OUTLINE_COLOR : (f32, f32, f32, f32) = (1.0, 1.0, 1.0, 0.6);
const MARKER_COLOR  : (f32, f32, f32, f32) = (1.0, 0.2, 0.2, 1.0);

#[derive(Copy, Clone)]
pub struct Vertex {
	position : [f32; 2]
}

implement_vertex!(Vertex, position);

/// Shared geometry and shader programs.
pub struct Programs {
	quad_vertices : glium::VertexBuffer<Vertex>,
	quad_indices  : glium::IndexBuffer<u16>,

	advection  : Program,
	divergence : Program,
	pressure   : Program,
	gradient   : Program,
	curl       : Program,
	vorticity  : Program,
	force      : Program,
	ink        : Program,
	output     : Program,
	flat       : Program,
}

impl Programs {
	pub fn new<F: Facade>(facade : &F) -> Result<Programs> {
		let vertices = vec![
			Vertex { position: [-1.0, -1.0] },
			Vertex { position: [ 1.0, -1.0] },
			Vertex { position: [ 1.0,  1.0] },
			Vertex { position: [-1.0,  1.0] }];

		Ok(Programs {
			quad_vertices: glium::VertexBuffer::new(facade, &vertices)?,
			quad_indices: glium::IndexBuffer::new(facade, PrimitiveType::TriangleFan, &[0u16, 1, 2, 3])?,

			advection:  Program::from_source(facade, shaders::QUAD_VERTEX, shaders::ADVECTION, None)?,
			divergence: Program::from_source(facade, shaders::QUAD_VERTEX, shaders::DIVERGENCE, None)?,
			pressure:   Program::from_source(facade, shaders::QUAD_VERTEX, shaders::PRESSURE, None)?,
			gradient:   Program::from_source(facade, shaders::QUAD_VERTEX, shaders::GRADIENT, None)?,
			curl:       Program::from_source(facade, shaders::QUAD_VERTEX, shaders::CURL, None)?,
			vorticity:  Program::from_source(facade, shaders::QUAD_VERTEX, shaders::VORTICITY, None)?,
			force:      Program::from_source(facade, shaders::STROKE_VERTEX, shaders::FORCE, None)?,
			ink:        Program::from_source(facade, shaders::STROKE_VERTEX, shaders::INK, None)?,
			output:     Program::from_source(facade, shaders::QUAD_VERTEX, shaders::OUTPUT, None)?,
			flat:       Program::from_source(facade, shaders::FLAT_VERTEX, shaders::FLAT, None)?,
		})
	}
}

fn empty_data(size : (u32, u32)) -> texture::RawImage2d<'static, f32> {
	let pixels : Vec<f32> = vec![0.0; (size.0 * size.1 * 4) as usize];
	texture::RawImage2d::from_raw_rgba(pixels, size)
}

pub(crate) fn empty_texture<F: Facade>(facade : &F, size : (u32, u32)) -> Result<texture::Texture2d> {
	Ok(texture::Texture2d::with_format(facade, empty_data(size),
		texture::UncompressedFloatFormat::F32F32F32F32, texture::MipmapsOption::NoMipmap)?)
}

pub(crate) fn boundary_sampler(texture : &texture::Texture2d) -> Sampler<texture::Texture2d> {
	Sampler::new(texture)
		.magnify_filter(MagnifySamplerFilter::Linear)
		.minify_filter(MinifySamplerFilter::Linear)
		.wrap_function(SamplerWrapFunction::Clamp)
}

fn add(source : LinearBlendingFactor, destination : LinearBlendingFactor) -> BlendingFunction {
	BlendingFunction::Addition { source, destination }
}

/// GL blend state for a compositing mode.
pub fn blend(mode : BlendMode) -> Blend {
	use LinearBlendingFactor::*;

	let (color, alpha) = match mode {
		BlendMode::None => return Blend::default(),
		BlendMode::Normal => return Blend::alpha_blending(),
		BlendMode::Additive => (add(SourceAlpha, One), add(SourceAlpha, One)),
		BlendMode::Subtractive => (add(Zero, OneMinusSourceColor), add(Zero, One)),
		BlendMode::Multiply => (add(Zero, SourceColor), add(Zero, SourceAlpha)),
		BlendMode::Custom => (add(One, OneMinusSourceAlpha), add(One, OneMinusSourceAlpha)),
	};
	Blend { color, alpha, constant_value: (0.0, 0.0, 0.0, 0.0) }
}

/// Backend drawing into any glium facade, typically the SDL window.
pub struct GlBackend<F: Facade + Clone> {
	facade       : F,
	programs     : Rc<Programs>,
	screen_size  : (u32, u32),
	history      : Option<(texture::Texture2d, texture::Texture2d)>,
	panel        : PanelPainter,
}

impl<F: Facade + Clone> GlBackend<F> {
	pub fn new(facade : &F, screen_size : (u32, u32)) -> Result<GlBackend<F>> {
		Ok(GlBackend {
			facade: facade.clone(),
			programs: Rc::new(Programs::new(facade)?),
			screen_size,
			history: None,
			panel: PanelPainter::new(facade)?,
		})
	}

	fn box_viewport(&self) -> glium::Rect {
		let (w, h) = self.screen_size;
		let side = (w.min(h) as f32 * BOX_SCALE) as u32;
		glium::Rect { left: (w - side) / 2, bottom: (h - side) / 2, width: side, height: side }
	}

	fn composite<S: Surface>(&self, target : &mut S, layers : &[GlFluidLayer<F>], viewport : Option<glium::Rect>) -> Result<()> {
		let texelsize = (1.0 / self.screen_size.0 as f32, 1.0 / self.screen_size.1 as f32);
		for layer in layers.iter().filter(|l| l.is_visible()) {
			target.draw(&self.programs.quad_vertices, &self.programs.quad_indices, &self.programs.output,
				&uniform! { image: boundary_sampler(layer.color_texture()), texelsize: texelsize },
				&glium::DrawParameters { blend: blend(layer.params().view_blend()), viewport, ..Default::default() })?;
		}
		Ok(())
	}

	fn draw_flat<S: Surface>(&self, target : &mut S, points : &[[f32; 2]], primitive : PrimitiveType, color : (f32, f32, f32, f32)) -> Result<()> {
		if points.is_empty() {
			return Ok(());
		}
		let vertices : Vec<Vertex> = points.iter().map(|p| Vertex { position: *p }).collect();
		let buffer = glium::VertexBuffer::new(&self.facade, &vertices)?;
		target.draw(&buffer, &NoIndices(primitive), &self.programs.flat,
			&uniform! { color: color },
			&glium::DrawParameters { blend: Blend::alpha_blending(), ..Default::default() })?;
		Ok(())
	}

	/// Draws one frame of `view` into `target`.
	pub fn present<S: Surface>(&mut self, target : &mut S, view : &SceneView<'_, GlFluidLayer<F>>) -> Result<()> {
		match view.background {
			Some(color) => target.clear_color(color.r, color.g, color.b, 1.0),
			None => target.clear_color(0.0, 0.0, 0.0, 0.0),
		}

		let viewport = if view.boxed { Some(self.box_viewport()) } else { None };
		self.composite(target, view.layers, viewport)?;

		if view.history {
			if let Some((history, _)) = self.history.as_ref() {
				target.draw(&self.programs.quad_vertices, &self.programs.quad_indices, &self.programs.output,
					&uniform! { image: boundary_sampler(history) },
					&glium::DrawParameters { blend: blend(BlendMode::Subtractive), ..Default::default() })?;
			}
		}

		// maps the unit square onto the clip space of the drawn area
		let (scale, offset) = match viewport {
			Some(rect) => {
				let (w, h) = (self.screen_size.0 as f32, self.screen_size.1 as f32);
				let scale = [rect.width as f32 / w, rect.height as f32 / h];
				let offset = [rect.left as f32 / w * 2.0 - 1.0, rect.bottom as f32 / h * 2.0 - 1.0];
				(scale, offset)
			}
			None => ([1.0, 1.0], [-1.0, -1.0]),
		};
		let to_clip = |x : f32, y : f32| [offset[0] + 2.0 * x * scale[0], offset[1] + 2.0 * y * scale[1]];

		if view.boxed {
			let outline = [to_clip(0.0, 0.0), to_clip(1.0, 0.0), to_clip(1.0, 1.0), to_clip(0.0, 1.0)];
			self.draw_flat(target, &outline, PrimitiveType::LineLoop, OUTLINE_COLOR)?;
		}

		let mut crosses = Vec::with_capacity(view.markers.len() * 4);
		for marker in view.markers.iter() {
			let (x, y) = (marker[0] as f32, marker[1] as f32);
			crosses.push(to_clip(x - CROSS_SIZE, y));
			crosses.push(to_clip(x + CROSS_SIZE, y));
			crosses.push(to_clip(x, y - CROSS_SIZE));
			crosses.push(to_clip(x, y + CROSS_SIZE));
		}
		self.draw_flat(target, &crosses, PrimitiveType::LinesList, MARKER_COLOR)?;

		if let Some(panel) = view.panel {
			self.panel.paint(&self.facade, target, panel)?;
		}
		Ok(())
	}
}

impl<F: Facade + Clone> Backend for GlBackend<F> {
	type Layer = GlFluidLayer<F>;

	fn create_layer(&mut self, config : &LayerConfig) -> Result<GlFluidLayer<F>> {
		GlFluidLayer::new(&self.facade, self.programs.clone(), config, self.screen_size)
	}

	fn resize(&mut self, width : u32, height : u32) -> Result<()> {
		self.screen_size = (width.max(1), height.max(1));
		if self.history.is_some() {
			self.set_history(true)?;
		}
		Ok(())
	}

	fn set_history(&mut self, enabled : bool) -> Result<()> {
		self.history = if enabled {
			let front = empty_texture(&self.facade, self.screen_size)?;
			let back = empty_texture(&self.facade, self.screen_size)?;
			front.as_surface().clear_color(0.0, 0.0, 0.0, 0.0);
			back.as_surface().clear_color(0.0, 0.0, 0.0, 0.0);
			Some((front, back))
		} else {
			None
		};
		Ok(())
	}

	fn capture_history(&mut self, layers : &[GlFluidLayer<F>]) -> Result<()> {
		let mut history = match self.history.take() {
			Some(history) => history,
			None => return Ok(()),
		};
		{
			let mut surface = history.1.as_surface();
			surface.clear_color(0.0, 0.0, 0.0, 0.0);
			self.composite(&mut surface, layers, None)?;
		}
		swap(&mut history.0, &mut history.1);
		debug!("history captured from {} layer(s)", layers.len());
		self.history = Some(history);
		Ok(())
	}
}
