extern crate emscripten_main_loop;
extern crate glium_sdl2;
extern crate sdl2;

mod app;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use env_logger::Env;
use log::error;

use fluid_strata::config::{CompositionKind, Options, Settings, DEFAULT_SCREEN_SIZE};
use fluid_strata::palette::Palette;
use fluid_strata::Result;

/// Layered fluid artwork.
#[derive(Parser, Debug)]
#[command(name = "fluid-strata", version)]
struct Cli {
	/// Seed of the run; a random one is drawn when omitted
	#[arg(long)]
	seed : Option<u64>,

	/// Developer mode: debug panel, key handling and double-click reload
	#[arg(long)]
	dev : bool,

	/// Force a palette (Black&White, Mono, Analogous, Complementary, Triadic)
	#[arg(long)]
	palette : Option<String>,

	/// Force a composition (addnew, reset, regenerate, cells, box)
	#[arg(long)]
	composition : Option<String>,

	/// JSON file overriding the default options
	#[arg(long)]
	options : Option<PathBuf>,

	#[arg(long, default_value_t = DEFAULT_SCREEN_SIZE.0)]
	width : u32,

	#[arg(long, default_value_t = DEFAULT_SCREEN_SIZE.1)]
	height : u32,

	/// Window title
	#[arg(long, default_value = "Fluid strata")]
	name : String,
}

fn settings(cli : &Cli) -> Result<(Settings, Options)> {
	let palette = cli.palette.as_deref().map(str::parse::<Palette>).transpose()?;
	let composition = cli.composition.as_deref().map(str::parse::<CompositionKind>).transpose()?;
	let options = match cli.options.as_ref() {
		Some(path) => Options::load(path)?,
		None => Options::default(),
	};
	let settings = Settings {
		name: cli.name.clone(),
		dev_mode: cli.dev,
		seed: cli.seed,
		screen_size: (cli.width.max(1), cli.height.max(1)),
		palette,
		composition,
	};
	Ok((settings, options))
}

fn main() {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	let result = settings(&cli).and_then(|(settings, options)| app::App::new(settings, options));
	match result {
		Ok(app) => emscripten_main_loop::run(app),
		Err(e) => {
			error!("{}", e);
			process::exit(1);
		}
	}
}
