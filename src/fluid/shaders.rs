//! GLSL sources. Everything targets GLES 3.0.

pub const QUAD_VERTEX : &str = r#"#version 300 es
	precision mediump float;
	in vec2 position;
	out vec2 lpos, rpos, tpos, bpos, mpos;
	uniform vec2 texelsize;
	void main() {
		gl_Position = vec4(position.x, position.y, 0.0, 1.0);
		mpos = 0.5 * position + 0.5;
		lpos = mpos - vec2(texelsize.x, 0.0);
		rpos = mpos + vec2(texelsize.x, 0.0);
		bpos = mpos - vec2(0.0, texelsize.y);
		tpos = mpos + vec2(0.0, texelsize.y);
	}"#;

pub const STROKE_VERTEX : &str = r#"#version 300 es
	precision mediump float;
	in vec2 position;
	out vec2 mpos;
	uniform vec2 ink_position;
	uniform float ink_size;
	uniform vec2 texelsize;

	void main() {
		mpos = (ink_position + position * ink_size) * texelsize;
		gl_Position = vec4(2.0 * mpos - 1.0, 0.0, 1.0);
	}"#;

/// Moves `image` along `velocity`, losing a little each step.
pub const ADVECTION : &str = r#"#version 300 es
	precision mediump float;
	in vec2 mpos;
	uniform sampler2D image;
	uniform sampler2D velocity;
	uniform vec2 texelsize;
	uniform float dt;
	uniform float dissipation;
	out vec4 fragment;

	void main() {
		vec2 vel = texture(velocity, mpos).xy;
		fragment = dissipation * texture(image, mpos - vel * texelsize * dt);
	}"#;

pub const DIVERGENCE : &str = r#"#version 300 es
	precision mediump float;
	in vec2 mpos, lpos, rpos, tpos, bpos;
	uniform sampler2D velocity;
	out vec4 fragment;

	void main() {
		float l = texture(velocity, lpos).x;
		float r = texture(velocity, rpos).x;
		float t = texture(velocity, tpos).y;
		float b = texture(velocity, bpos).y;

		vec2 m = texture(velocity, mpos).xy;
		if (lpos.x < 0.0) { l = -m.x; }
		if (rpos.x > 1.0) { r = -m.x; }
		if (tpos.y > 1.0) { t = -m.y; }
		if (bpos.y < 0.0) { b = -m.y; }

		fragment = vec4(0.5 * (r - l + t - b), 0.0, 0.0, 1.0);
	}"#;

/// One Jacobi iteration.
pub const PRESSURE : &str = r#"#version 300 es
	precision mediump float;
	in vec2 mpos, lpos, rpos, tpos, bpos;
	uniform sampler2D divergence;
	uniform sampler2D pressure;
	out vec4 fragment;

	void main() {
		float l = texture(pressure, lpos).x;
		float r = texture(pressure, rpos).x;
		float t = texture(pressure, tpos).x;
		float b = texture(pressure, bpos).x;
		float d = texture(divergence, mpos).x;
		fragment = vec4(0.25 * (l + r + t + b - d), 0.0, 0.0, 1.0);
	}"#;

/// Subtracts the pressure gradient, scaled by the layer's K.
pub const GRADIENT : &str = r#"#version 300 es
	precision mediump float;
	in vec2 mpos, lpos, rpos, tpos, bpos;
	uniform sampler2D pressure;
	uniform sampler2D velocity;
	uniform float k;
	out vec4 fragment;

	void main() {
		float l = texture(pressure, lpos).x;
		float r = texture(pressure, rpos).x;
		float t = texture(pressure, tpos).x;
		float b = texture(pressure, bpos).x;

		vec2 vel = texture(velocity, mpos).xy;
		vel -= vec2(r - l, t - b) * 0.5 * k;
		fragment = vec4(vel, 0.0, 1.0);
	}"#;

pub const CURL : &str = r#"#version 300 es
	precision mediump float;
	in vec2 mpos, lpos, rpos, tpos, bpos;
	uniform sampler2D velocity;
	out vec4 fragment;

	void main() {
		float l = texture(velocity, lpos).y;
		float r = texture(velocity, rpos).y;
		float t = texture(velocity, tpos).x;
		float b = texture(velocity, bpos).x;
		fragment = vec4(0.5 * (r - l - t + b), 0.0, 0.0, 1.0);
	}"#;

pub const VORTICITY : &str = r#"#version 300 es
	precision mediump float;
	in vec2 mpos, lpos, rpos, tpos, bpos;
	uniform sampler2D velocity;
	uniform sampler2D curl;
	uniform float dt;
	uniform float vorticity;
	out vec4 fragment;

	void main() {
		float l = texture(curl, lpos).x;
		float r = texture(curl, rpos).x;
		float t = texture(curl, tpos).x;
		float b = texture(curl, bpos).x;
		float m = texture(curl, mpos).x;

		vec2 force = 0.5 * vec2(abs(t) - abs(b), abs(l) - abs(r));
		force /= length(force) + 0.0001;
		force *= vorticity * m;

		vec2 vel = texture(velocity, mpos).xy + force * dt;
		fragment = vec4(vel, 0.0, 1.0);
	}"#;

/// Velocity splat of one stroke; alpha carries the blend weight.
pub const FORCE : &str = r#"#version 300 es
	precision mediump float;
	in vec2 mpos;
	uniform vec2 ink_position;
	uniform vec2 ink_velocity;
	uniform float ink_drag;
	uniform float ink_spread;
	uniform float ink_size;
	uniform vec2 texelsize;
	uniform float dt;
	out vec4 fragment;

	void main() {
		vec2 ink_ortho = vec2(ink_velocity.y, -ink_velocity.x);
		vec2 direction = mpos / texelsize - ink_position;
		float distance = length(direction) + 1e-5;

		float fade = pow(max(1.0 - distance / ink_size, 0.0), 2.0);
		float dx = dot(ink_velocity, direction) / (length(ink_velocity) * ink_size + 1e-5);
		float dy = dot(ink_ortho, direction) / (length(ink_ortho) * ink_size + 1e-5);

		vec2 drag = ((1.0 - dx * dx - dy * dy) * ink_velocity - 2.0 * dx * dy * ink_ortho) * ink_drag;
		vec2 spread = direction / distance * ink_spread * 100.0;
		fragment = vec4(drag + spread, 0.0, fade * dt);
	}"#;

pub const INK : &str = r#"#version 300 es
	precision mediump float;
	in vec2 mpos;
	uniform vec2 ink_position;
	uniform vec4 ink_color;
	uniform float ink_size;
	uniform float warmup;
	uniform vec2 texelsize;
	out vec4 fragment;

	void main() {
		float distance = length(ink_position - mpos / texelsize);
		float fade = pow(max(1.0 - distance / ink_size * 3.0, 0.0), 0.3);
		vec3 color = pow(ink_color.rgb, vec3(2.2));
		fragment = vec4(color, fade * ink_color.a * warmup);
	}"#;

pub const OUTPUT : &str = r#"#version 300 es
	precision mediump float;
	in vec2 mpos;
	uniform sampler2D image;
	out vec4 fragment;

	void main() {
		fragment = pow(texture(image, mpos), vec4(1.0 / 2.2));
	}"#;

pub const FLAT_VERTEX : &str = r#"#version 300 es
	precision mediump float;
	in vec2 position;
	void main() {
		gl_Position = vec4(position, 0.0, 1.0);
	}"#;

pub const FLAT : &str = r#"#version 300 es
	precision mediump float;
	uniform vec4 color;
	out vec4 fragment;
	void main() {
		fragment = color;
	}"#;

/// egui meshes: positions in points, premultiplied sRGB vertex colors.
pub const PANEL_VERTEX : &str = r#"#version 300 es
	precision mediump float;
	uniform vec2 screen_size;
	in vec2 position;
	in vec2 tex_coord;
	in vec4 srgba;
	out vec2 uv;
	out vec4 tint;
	void main() {
		gl_Position = vec4(2.0 * position.x / screen_size.x - 1.0, 1.0 - 2.0 * position.y / screen_size.y, 0.0, 1.0);
		uv = tex_coord;
		tint = srgba / 255.0;
	}"#;

pub const PANEL : &str = r#"#version 300 es
	precision mediump float;
	uniform sampler2D image;
	in vec2 uv;
	in vec4 tint;
	out vec4 fragment;
	void main() {
		fragment = tint * texture(image, uv);
	}"#;
