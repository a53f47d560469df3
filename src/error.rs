use thiserror::Error;

pub type Result<T> = std::result::Result<T, StrataError>;

#[derive(Error, Debug)]
pub enum StrataError {
	/// The rejection sampler ran out of attempts for one layer.
	#[error("no valid parameters for layer {layer} after {attempts} attempts")]
	ConstraintsUnsatisfiable { layer: usize, attempts: usize },

	#[error("invalid value {value:?} for {name}")]
	InvalidOption { name: &'static str, value: String },

	#[error("window error: {0}")]
	Window(String),

	#[error("shader program: {0}")]
	Program(#[from] glium::ProgramCreationError),

	#[error("draw call failed: {0}")]
	Draw(#[from] glium::DrawError),

	#[error("texture creation failed: {0}")]
	Texture(#[from] glium::texture::TextureCreationError),

	#[error("vertex buffer creation failed: {0:?}")]
	VertexBuffer(#[from] glium::vertex::BufferCreationError),

	#[error("index buffer creation failed: {0:?}")]
	IndexBuffer(#[from] glium::index::BufferCreationError),

	#[error("swap buffers failed: {0}")]
	SwapBuffers(#[from] glium::SwapBuffersError),

	#[error("could not read options from {path}: {source}")]
	Config {
		path: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}
