use std::path::PathBuf;

use anyhow::Context;
use dmglcd::dump::{dump, DumpFormat, DumpOptions};
use dmglcd_common::ColorMap;

const USAGE: &str = "Usage: lcd_frame_dump <out_path> [frames] [palette]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let out_path: PathBuf = args.next().map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("{USAGE}");
        std::process::exit(2);
    });
    let frames: u32 = match args.next() {
        Some(frames) => frames
            .parse()
            .with_context(|| format!("invalid frame count '{frames}'"))?,
        None => 1,
    };
    let colors = match args.next() {
        Some(name) => name
            .parse::<ColorMap>()
            .with_context(|| format!("invalid palette '{name}'"))?,
        None => palette_from_env(),
    };

    let options = DumpOptions::builder()
        .format(DumpFormat::from_path(&out_path))
        .out_path(out_path)
        .frames(frames)
        .colors(colors)
        .build();
    let written = dump(&options)?;

    println!(
        "Wrote {} bytes ({:?}, {:?}) after {} frames to '{}'",
        written,
        options.format,
        options.colors,
        options.frames,
        options.out_path.display()
    );
    Ok(())
}

fn palette_from_env() -> ColorMap {
    match std::env::var("DMGLCD_PALETTE") {
        Ok(name) => name.parse().unwrap_or_else(|err| {
            log::warn!("{}; falling back to {:?}", err, ColorMap::default());
            ColorMap::default()
        }),
        Err(_) => ColorMap::default(),
    }
}
