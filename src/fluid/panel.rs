use std::collections::HashMap;

use egui::epaint::Primitive;
use egui::{ImageData, TextureId};
use glium::backend::Facade;
use glium::index::PrimitiveType;
use glium::uniforms::{MagnifySamplerFilter, MinifySamplerFilter, Sampler, SamplerWrapFunction};
use glium::{texture, Program, Surface};
use log::debug;

use super::{blend, shaders};
use crate::error::Result;
use crate::gui::PanelFrame;
use crate::params::BlendMode;

#[derive(Copy, Clone)]
struct PanelVertex {
	position  : [f32; 2],
	tex_coord : [f32; 2],
	srgba     : [u8; 4],
}

implement_vertex!(PanelVertex, position, tex_coord, srgba);

/// Paints tessellated egui output and keeps the textures it refers to.
pub struct PanelPainter {
	program  : Program,
	textures : HashMap<TextureId, texture::Texture2d>,
}

fn pixels(image : &ImageData) -> Vec<u8> {
	match image {
		ImageData::Color(image) => image.pixels.iter().flat_map(|c| c.to_array()).collect(),
		ImageData::Font(image) => image.srgba_pixels(None).flat_map(|c| c.to_array()).collect(),
	}
}

impl PanelPainter {
	pub fn new<F: Facade>(facade : &F) -> Result<PanelPainter> {
		Ok(PanelPainter {
			program: Program::from_source(facade, shaders::PANEL_VERTEX, shaders::PANEL, None)?,
			textures: HashMap::new(),
		})
	}

	fn set_texture<F: Facade>(&mut self, facade : &F, id : TextureId, delta : &egui::epaint::ImageDelta) -> Result<()> {
		let [width, height] = delta.image.size();
		let image = texture::RawImage2d::from_raw_rgba(pixels(&delta.image), (width as u32, height as u32));
		match (delta.pos, self.textures.get(&id)) {
			(Some([x, y]), Some(texture)) => {
				texture.write(glium::Rect { left: x as u32, bottom: y as u32, width: width as u32, height: height as u32 }, image);
			}
			_ => {
				let texture = texture::Texture2d::with_format(facade, image,
					texture::UncompressedFloatFormat::U8U8U8U8, texture::MipmapsOption::NoMipmap)?;
				debug!("panel texture {:?}: {}x{}", id, width, height);
				self.textures.insert(id, texture);
			}
		}
		Ok(())
	}

	pub fn paint<F: Facade, S: Surface>(&mut self, facade : &F, target : &mut S, frame : &PanelFrame) -> Result<()> {
		for (id, delta) in frame.textures.set.iter() {
			self.set_texture(facade, *id, delta)?;
		}

		let (width, height) = target.get_dimensions();
		let ppp = frame.pixels_per_point;
		let screen_size = [width as f32 / ppp, height as f32 / ppp];

		for clipped in frame.primitives.iter() {
			let mesh = match &clipped.primitive {
				Primitive::Mesh(mesh) => mesh,
				Primitive::Callback(_) => continue,
			};
			let texture = match self.textures.get(&mesh.texture_id) {
				Some(texture) => texture,
				None => continue,
			};

			// clip rectangle in points to a scissor box in pixels, origin bottom-left
			let clip = clipped.clip_rect;
			let left = (clip.min.x * ppp).round().max(0.0).min(width as f32) as u32;
			let right = (clip.max.x * ppp).round().max(0.0).min(width as f32) as u32;
			let top = (clip.min.y * ppp).round().max(0.0).min(height as f32) as u32;
			let bottom = (clip.max.y * ppp).round().max(0.0).min(height as f32) as u32;
			if right <= left || bottom <= top || mesh.indices.is_empty() {
				continue;
			}
			let scissor = glium::Rect { left, bottom: height - bottom, width: right - left, height: bottom - top };

			let vertices : Vec<PanelVertex> = mesh.vertices.iter().map(|v| PanelVertex {
				position: [v.pos.x, v.pos.y],
				tex_coord: [v.uv.x, v.uv.y],
				srgba: v.color.to_array(),
			}).collect();
			let vertex_buffer = glium::VertexBuffer::new(facade, &vertices)?;
			let index_buffer = glium::IndexBuffer::new(facade, PrimitiveType::TrianglesList, &mesh.indices)?;

			let image = Sampler::new(texture)
				.magnify_filter(MagnifySamplerFilter::Linear)
				.minify_filter(MinifySamplerFilter::Linear)
				.wrap_function(SamplerWrapFunction::Clamp);
			target.draw(&vertex_buffer, &index_buffer, &self.program,
				&uniform! { screen_size: screen_size, image: image },
				&glium::DrawParameters { blend: blend(BlendMode::Custom), scissor: Some(scissor), ..Default::default() })?;
		}

		for id in frame.textures.free.iter() {
			self.textures.remove(id);
		}
		Ok(())
	}
}
