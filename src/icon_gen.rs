use crate::manifest::{write_manifest_icons, MANIFEST_FILENAME};
use anyhow::{anyhow, bail, Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    io::Reader as ImageReader,
    ColorType, DynamicImage, ImageEncoder, ImageFormat, Rgba, RgbaImage,
};
use resvg::{tiny_skia, usvg};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

/// Name of the vector source inside the asset directory
pub const SOURCE_FILENAME: &str = "icon.svg";

/// A fixed output: square pixel size and the file it is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub filename: &'static str,
    /// Listed in the web app manifest icons
    pub in_manifest: bool,
    /// Served as the Apple touch icon, which iOS shows without transparency
    pub touch_icon: bool,
}

pub const ICON_SPECS: [IconSpec; 4] = [
    IconSpec {
        size: 32,
        filename: "favicon-32.png",
        in_manifest: false,
        touch_icon: false,
    },
    IconSpec {
        size: 180,
        filename: "apple-touch-icon.png",
        in_manifest: false,
        touch_icon: true,
    },
    IconSpec {
        size: 192,
        filename: "icon-192.png",
        in_manifest: true,
        touch_icon: false,
    },
    IconSpec {
        size: 512,
        filename: "icon-512.png",
        in_manifest: true,
        touch_icon: false,
    },
];

#[derive(Debug)]
pub struct Options {
    pub asset_dir: PathBuf,
    pub background: Option<String>,
    pub manifest: bool,
    pub skip_existing: bool,
}

/// Rasterize `<asset_dir>/icon.svg` into every entry of [`ICON_SPECS`].
///
/// Returns the written paths in order. Files written before a failure are
/// left in place.
pub fn generate_icons(options: &Options) -> Result<Vec<PathBuf>> {
    let source_path = options.asset_dir.join(SOURCE_FILENAME);
    if !source_path.exists() {
        bail!("{} not found", source_path.display());
    }

    // A bad color must fail before anything is written
    let background = options
        .background
        .as_deref()
        .map(parse_color)
        .transpose()?;

    if options.skip_existing && outputs_exist(&options.asset_dir) {
        println!("Icons already exist, skipping generation");
        return Ok(Vec::new());
    }

    let tree = load_svg(&source_path)?;

    println!("Generating icons...");
    let mut written = Vec::with_capacity(ICON_SPECS.len());
    for spec in &ICON_SPECS {
        let mut icon = render_icon(&tree, spec.size)?;

        if spec.touch_icon {
            if let Some(color) = background {
                icon = fill_background(&icon, color);
            }
        }

        let output_path = options.asset_dir.join(spec.filename);
        save_png(&icon, &output_path)?;
        verify_png(&output_path, spec.size)?;
        println!("✓ Generated {} ({}x{})", spec.filename, spec.size, spec.size);

        written.push(output_path);
    }

    if options.manifest {
        write_manifest_icons(&options.asset_dir, &ICON_SPECS)?;
        println!("✓ Generated {MANIFEST_FILENAME}");
    }

    println!("\nAll icons generated successfully!");
    Ok(written)
}

fn outputs_exist(asset_dir: &Path) -> bool {
    ICON_SPECS
        .iter()
        .all(|spec| asset_dir.join(spec.filename).exists())
}

fn load_svg(path: &Path) -> Result<usvg::Tree> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    // Relative <image> hrefs resolve against the asset directory
    let mut opt = usvg::Options {
        resources_dir: path.parent().map(Path::to_path_buf),
        ..usvg::Options::default()
    };
    Arc::make_mut(&mut opt.fontdb).load_system_fonts();

    usvg::Tree::from_data(&data, &opt)
        .with_context(|| format!("Failed to parse SVG: {}", path.display()))
}

/// Render the whole SVG viewport into a `size`x`size` image.
///
/// Each axis is scaled on its own, so a non-square drawing is stretched to
/// fill the square.
fn render_icon(tree: &usvg::Tree, size: u32) -> Result<DynamicImage> {
    let mut pixmap = tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| anyhow!("Failed to allocate {size}x{size} pixmap"))?;

    let svg_size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        size as f32 / svg_size.width(),
        size as f32 / svg_size.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    // tiny-skia keeps premultiplied alpha, PNG wants straight alpha
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let buffer = RgbaImage::from_raw(size, size, rgba)
        .ok_or_else(|| anyhow!("Rendered buffer does not match {size}x{size}"))?;
    Ok(DynamicImage::ImageRgba8(buffer))
}

fn parse_color(color: &str) -> Result<Rgba<u8>> {
    let srgb = css_color::Srgb::from_str(color)
        .map_err(|_| anyhow!("Invalid background color: {color}"))?;

    // The background has to be opaque, there is nothing behind it to blend with
    if srgb.alpha < 1.0 {
        bail!("Background color must be opaque: {color}");
    }

    Ok(Rgba([
        (srgb.red * 255.) as u8,
        (srgb.green * 255.) as u8,
        (srgb.blue * 255.) as u8,
        255,
    ]))
}

/// Composite the icon over an opaque background; every output pixel has alpha 255
fn fill_background(icon: &DynamicImage, color: Rgba<u8>) -> DynamicImage {
    let mut rgba_img = icon.to_rgba8();

    for pixel in rgba_img.pixels_mut() {
        let alpha = pixel[3] as u32;
        for channel in 0..3 {
            let blended = pixel[channel] as u32 * alpha + color[channel] as u32 * (255 - alpha);
            pixel[channel] = ((blended + 127) / 255) as u8;
        }
        pixel[3] = 255;
    }

    DynamicImage::ImageRgba8(rgba_img)
}

fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file: {}", path.display()))?;
    let mut out_file = BufWriter::new(file);

    let rgba_image = image.to_rgba8();
    write_png(rgba_image.as_raw(), &mut out_file, image.width())
        .with_context(|| format!("Failed to write PNG: {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, size: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, size, size, ColorType::Rgba8)?;
    Ok(())
}

/// Re-open a written file and check it decodes as a PNG of `size`x`size`
fn verify_png(path: &Path, size: u32) -> Result<()> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .with_context(|| format!("Failed to reopen {}", path.display()))?;

    if reader.format() != Some(ImageFormat::Png) {
        bail!("{} is not a PNG file", path.display());
    }

    let (width, height) = reader
        .into_dimensions()
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    if width != size || height != size {
        bail!(
            "{} is {width}x{height}, expected {size}x{size}",
            path.display()
        );
    }

    Ok(())
}
