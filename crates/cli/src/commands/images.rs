//! Image optimization command.
//!
//! Walks a directory for JPEG and PNG product photos, scales anything wider
//! than `max_width` down (keeping the aspect ratio, never enlarging),
//! re-encodes it and replaces the file when the result is smaller.
//!
//! JPEGs are written at the configured quality without metadata. PNGs stay
//! lossless and are recompressed at the highest compression level.

use std::ffi::OsString;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageReader};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Widest image kept as-is.
pub const DEFAULT_MAX_WIDTH: u32 = 1400;

/// JPEG re-encode quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Errors that can occur while optimizing images.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("Image directory not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Encoder task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Unsupported image: {0}")]
    Unsupported(PathBuf),
}

/// Options for [`optimize`].
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    pub root: PathBuf,
    pub max_width: u32,
    pub quality: u8,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets/images"),
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Outcome for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReport {
    pub file: PathBuf,
    /// Dimensions before resizing.
    pub width: u32,
    pub height: u32,
    pub before: u64,
    pub after: u64,
}

impl ImageReport {
    /// Bytes saved. Zero when the file was left untouched.
    #[must_use]
    pub const fn saved(&self) -> u64 {
        self.before.saturating_sub(self.after)
    }

    /// Whether the file was rewritten.
    #[must_use]
    pub const fn rewritten(&self) -> bool {
        self.after < self.before
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Jpeg,
    Png,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

struct Encoded {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

/// Optimize every supported image under `options.root`.
///
/// Files that fail to decode or encode are logged and skipped.
///
/// # Errors
///
/// Returns `NotFound` if the root does not exist, or an I/O error if the
/// directory tree cannot be read.
pub async fn optimize(options: &OptimizeOptions) -> Result<Vec<ImageReport>, OptimizeError> {
    if !tokio::fs::try_exists(&options.root).await? {
        return Err(OptimizeError::NotFound(options.root.clone()));
    }

    let files = collect_images(&options.root).await?;
    if files.is_empty() {
        info!("No images found under {}", options.root.display());
        return Ok(Vec::new());
    }

    info!("Found {} images. Optimizing...", files.len());

    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        match optimize_one(file, options).await {
            Ok(report) => reports.push(report),
            Err(e) => error!(file = %file.display(), "Failed to optimize: {e}"),
        }
    }

    reports.sort_by(|a, b| b.saved().cmp(&a.saved()));
    log_reports(&reports);

    Ok(reports)
}

async fn collect_images(root: &Path) -> Result<Vec<PathBuf>, OptimizeError> {
    let mut pending = vec![root.to_path_buf()];
    let mut found = Vec::new();

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && Format::from_path(&path).is_some() {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

async fn optimize_one(
    path: &Path,
    options: &OptimizeOptions,
) -> Result<ImageReport, OptimizeError> {
    let format =
        Format::from_path(path).ok_or_else(|| OptimizeError::Unsupported(path.to_path_buf()))?;

    // Read fully so the original handle is closed before the rename
    let input = tokio::fs::read(path).await?;
    let before = input.len() as u64;

    let (max_width, quality) = (options.max_width, options.quality);
    let encoded =
        tokio::task::spawn_blocking(move || reencode(&input, format, max_width, quality)).await??;
    let after = encoded.bytes.len() as u64;

    let mut report = ImageReport {
        file: path.to_path_buf(),
        width: encoded.width,
        height: encoded.height,
        before,
        after: before,
    };

    if after >= before {
        debug!(
            file = %path.display(),
            before,
            after,
            "Re-encoded image is not smaller, keeping original"
        );
        return Ok(report);
    }

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, &encoded.bytes).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        warn!(file = %tmp.display(), "Rename failed, removing temporary file");
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    report.after = after;
    Ok(report)
}

fn reencode(
    bytes: &[u8],
    format: Format,
    max_width: u32,
    quality: u8,
) -> Result<Encoded, OptimizeError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);

    let (width, height) = (img.width(), img.height());
    let (target_width, target_height) = target_size(width, height, max_width);
    if (target_width, target_height) != (width, height) {
        img = img.resize_exact(target_width, target_height, FilterType::Lanczos3);
    }

    let mut out = Vec::new();
    match format {
        Format::Jpeg => {
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality).write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        Format::Png => {
            PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilter::Adaptive)
                .write_image(img.as_bytes(), img.width(), img.height(), img.color().into())?;
        }
    }

    Ok(Encoded {
        bytes: out,
        width,
        height,
    })
}

/// Size that fits `max_width` while keeping the aspect ratio. Never enlarges.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn target_size(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }

    let scaled = (f64::from(height) * f64::from(max_width) / f64::from(width)).round() as u32;
    (max_width, scaled.max(1))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{kb:.1} KB")
    } else {
        format!("{:.2} MB", kb / 1024.0)
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(saved: u64, before: u64) -> f64 {
    if before == 0 {
        0.0
    } else {
        saved as f64 / before as f64 * 100.0
    }
}

fn log_reports(reports: &[ImageReport]) {
    for r in reports {
        info!(
            "{} ({}x{}): {} -> {} (saved {} / {:.1}%)",
            r.file.display(),
            r.width,
            r.height,
            format_bytes(r.before),
            format_bytes(r.after),
            format_bytes(r.saved()),
            percent(r.saved(), r.before)
        );
    }

    let before: u64 = reports.iter().map(|r| r.before).sum();
    let after: u64 = reports.iter().map(|r| r.after).sum();
    info!(
        "TOTAL: {} -> {} (saved {})",
        format_bytes(before),
        format_bytes(after),
        format_bytes(before.saturating_sub(after))
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    // Noise keeps encoded size proportional to pixel count.
    #[allow(clippy::cast_possible_truncation)]
    fn noise(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let h = (x * 7919 + y * 104_729).wrapping_mul(2_654_435_761);
            Rgb([(h >> 24) as u8, (h >> 16) as u8, (h >> 8) as u8])
        }))
    }

    fn write_jpeg(path: &Path, img: &DynamicImage) {
        let rgb = img.to_rgb8();
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, 100)
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .unwrap();
        std::fs::write(path, out).unwrap();
    }

    #[test]
    fn test_target_size() {
        assert_eq!(target_size(2000, 1000, 1400), (1400, 700));
        assert_eq!(target_size(1400, 900, 1400), (1400, 900));
        assert_eq!(target_size(800, 600, 1400), (800, 600));
        assert_eq!(target_size(3000, 1, 1400), (1400, 1));
        assert_eq!(target_size(1401, 1000, 1400), (1400, 999));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 / 2), "2.50 MB");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/b.JPG")), Some(Format::Jpeg));
        assert_eq!(Format::from_path(Path::new("a/b.jpeg")), Some(Format::Jpeg));
        assert_eq!(Format::from_path(Path::new("logo.png")), Some(Format::Png));
        assert_eq!(Format::from_path(Path::new("icon.svg")), None);
        assert_eq!(Format::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_tmp_path() {
        assert_eq!(
            tmp_path(Path::new("assets/calot-1.jpeg")),
            PathBuf::from("assets/calot-1.jpeg.tmp")
        );
    }

    #[tokio::test]
    async fn test_optimize_downscales_wide_images() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("calots");
        std::fs::create_dir_all(&nested).unwrap();

        let img = noise(2000, 1000);
        let jpeg = nested.join("calot-1.jpeg");
        write_jpeg(&jpeg, &img);
        let png = dir.path().join("banner.png");
        img.save(&png).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let options = OptimizeOptions {
            root: dir.path().to_path_buf(),
            ..OptimizeOptions::default()
        };
        let reports = optimize(&options).await.unwrap();

        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert_eq!((report.width, report.height), (2000, 1000));
            assert!(report.rewritten());
            assert!(report.saved() > 0);
        }
        assert!(reports.first().unwrap().saved() >= reports.get(1).unwrap().saved());

        for path in [&jpeg, &png] {
            let reloaded = image::open(path).unwrap();
            assert_eq!((reloaded.width(), reloaded.height()), (1400, 700));
            assert!(!tmp_path(path).exists());
        }
    }

    #[tokio::test]
    async fn test_optimize_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let options = OptimizeOptions {
            root: dir.path().to_path_buf(),
            ..OptimizeOptions::default()
        };
        assert!(optimize(&options).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_optimize_missing_root() {
        let options = OptimizeOptions {
            root: PathBuf::from("/definitely/not/here"),
            ..OptimizeOptions::default()
        };
        assert!(matches!(
            optimize(&options).await,
            Err(OptimizeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_optimize_skips_undecodable_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.jpg");
        std::fs::write(&broken, b"not really a jpeg").unwrap();

        let options = OptimizeOptions {
            root: dir.path().to_path_buf(),
            ..OptimizeOptions::default()
        };
        let reports = optimize(&options).await.unwrap();

        assert!(reports.is_empty());
        assert_eq!(std::fs::read(&broken).unwrap(), b"not really a jpeg");
    }
}
