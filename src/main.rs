use std::path::PathBuf;
use std::{fs, process};

use anyhow::{bail, Context, Result};

use kinetic_title::{
    config::TitleConfig,
    content::{self, HeroContent},
    engine::{geometry::Viewport, Engine},
    player::{ContentSource, Player},
    renderer::Renderer,
    types::{Marker, TerminalContract},
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str =
    "kinetic-title play [--config <path>] [--content <path> | --content-cmd <command>]";
const EXPORT_USAGE: &str = "kinetic-title export <output.json> [--frames <n>] [--size <cols>x<rows>] [--config <path>] [--content <path>]";

const DEFAULT_EXPORT_FRAMES: usize = 240;
const DEFAULT_EXPORT_SIZE: (u16, u16) = (100, 30);

#[derive(Default)]
struct Options {
    config: Option<PathBuf>,
    content: Option<PathBuf>,
    content_cmd: Option<String>,
    frames: Option<usize>,
    size: Option<(u16, u16)>,
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("play") => {
            let opts = parse_options(args, PLAY_USAGE)?;
            play(opts)
        }
        Some("export") => {
            let output = args.next().context(EXPORT_USAGE)?;
            let opts = parse_options(args, EXPORT_USAGE)?;
            export(&output, opts)
        }
        _ => bail!(
            "Kinetic Title: gear-driven light-sweep title sequence\n\nUsage:\n  {PLAY_USAGE}\n  {EXPORT_USAGE}"
        ),
    }
}

fn parse_options(mut args: impl Iterator<Item = String>, usage: &str) -> Result<Options> {
    let mut opts = Options::default();
    while let Some(flag) = args.next() {
        let value = args
            .next()
            .with_context(|| format!("{flag} needs a value\n\nUsage: {usage}"))?;
        match flag.as_str() {
            "--config" => opts.config = Some(value.into()),
            "--content" => opts.content = Some(value.into()),
            "--content-cmd" => opts.content_cmd = Some(value),
            "--frames" => {
                opts.frames = Some(value.parse().with_context(|| format!("Bad frame count {value}"))?)
            }
            "--size" => opts.size = Some(parse_size(&value)?),
            other => bail!("Unknown option {other}\n\nUsage: {usage}"),
        }
    }
    Ok(opts)
}

fn parse_size(value: &str) -> Result<(u16, u16)> {
    let (cols, rows) = value
        .split_once('x')
        .with_context(|| format!("Bad size {value}, expected <cols>x<rows>"))?;
    Ok((
        cols.parse().with_context(|| format!("Bad column count {cols}"))?,
        rows.parse().with_context(|| format!("Bad row count {rows}"))?,
    ))
}

fn load_content(opts: &Options) -> Option<HeroContent> {
    opts.content.as_deref().and_then(content::read)
}

fn play(opts: Options) -> Result<()> {
    let config = TitleConfig::load(opts.config.as_deref())?;
    let source = match &opts.content_cmd {
        Some(command) => ContentSource::Generator(command.clone()),
        None => ContentSource::Fixed(load_content(&opts)),
    };
    Player::new(config, source).play()
}

fn export(output_path: &str, opts: Options) -> Result<()> {
    let config = TitleConfig::load(opts.config.as_deref())?;
    let (cols, rows) = opts.size.unwrap_or(DEFAULT_EXPORT_SIZE);
    let frames = opts.frames.unwrap_or(DEFAULT_EXPORT_FRAMES);

    let compiled = Engine::compile(
        config,
        load_content(&opts),
        Viewport::from_cells(cols, rows),
        frames,
    )?;
    let markers = compiled
        .reveal_frame
        .map(|frame_index| Marker {
            frame_index,
            label: "reveal complete".to_string(),
        })
        .into_iter()
        .collect();
    let contract = TerminalContract {
        width: cols,
        height: rows,
    };
    let presentation = Renderer::render(&compiled.scenes, contract, markers);

    let output_json = serde_json::to_string_pretty(&presentation)?;
    fs::write(output_path, &output_json)
        .with_context(|| format!("Failed to write {output_path}"))?;

    eprintln!(
        "Exported {} frames ({}x{}) -> {}",
        presentation.frames.len(),
        cols,
        rows,
        output_path,
    );

    Ok(())
}
