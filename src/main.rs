use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod icon_gen;
mod manifest;

#[derive(Debug, Parser)]
#[clap(
    name = "favicon-gen",
    about = "Generate favicon and app icon PNGs from public/icon.svg"
)]
struct Args {
    /// Asset directory holding icon.svg; generated icons are written next to it.
    #[clap(short, long, value_name = "DIR", default_value = "public")]
    dir: PathBuf,

    /// Opaque background for apple-touch-icon.png (CSS color format, alpha must be 1)
    #[clap(short, long, value_name = "COLOR")]
    background: Option<String>,

    /// Also write manifest-icons.json for the web app manifest
    #[clap(long)]
    manifest: bool,

    /// Do nothing when every icon already exists
    #[clap(long)]
    skip_existing: bool,
}

impl From<Args> for icon_gen::Options {
    fn from(args: Args) -> Self {
        Self {
            asset_dir: args.dir,
            background: args.background,
            manifest: args.manifest,
            skip_existing: args.skip_existing,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(&args.into())?;
    Ok(())
}
