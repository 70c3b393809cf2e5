use std::error::Error;
use std::ops::Range;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, error::ErrorKind};

use crate::adapter::DatasetAdapter;
use crate::adapter::adapters::{
    CsvJpegAdapter, ImageFolderAdapter, ImageListAdapter, JsonVideoAdapter,
};
use crate::config::{
    CsvJpegConfig, ImageFolderConfig, ImageListConfig, JsonVideoConfig, ShuffleMode,
};
use crate::constants::frames::{DEFAULT_FRAME_RATE, DEFAULT_SHM_DIR, NATIVE_FRAME_SIZE};
use crate::data::IterationResult;
use crate::labels::LabelIndex;

#[derive(Debug, Parser)]
#[command(
    name = "ingest_demo",
    disable_help_subcommand = true,
    about = "Normalize a labeled video or image dataset",
    long_about = "Build the label index for a dataset, iterate its records with resized frames, and write label2idx.json once the selected window is fully consumed.",
    after_help = "Set RUST_LOG=debug to see manifest, scan, and burst-directory details."
)]
/// CLI for `ingest_demo`.
///
/// Common usage:
/// - Whole CSV/JPEG dataset: `csv-jpeg train.csv frames/ --output-folder out/`
/// - Shuffled, reproducible window: `image-folder data/ --output-folder out/ --shuffle --seed 7 --start 10 --stop 20`
/// - Peek at a few records without writing the label file: `json-video train.json.gz videos/ --output-folder out/ --limit 3`
struct IngestCli {
    #[command(subcommand)]
    dataset: DatasetCommand,
}

#[derive(Debug, Subcommand)]
enum DatasetCommand {
    /// JSON (or .json.gz) manifest with one MP4 video per record.
    JsonVideo {
        #[arg(value_name = "JSON_FILE", help = "Manifest ending in .json or .json.gz")]
        json_file: PathBuf,
        #[arg(value_name = "FOLDER", help = "Folder with one <id>/ subfolder per record")]
        folder: PathBuf,
        #[arg(
            long = "frame-rate",
            default_value_t = DEFAULT_FRAME_RATE,
            help = "Frames per second extracted from each video"
        )]
        frame_rate: u32,
        #[arg(
            long = "shm-dir",
            value_name = "DIR",
            default_value = DEFAULT_SHM_DIR,
            help = "Base directory for per-record burst directories"
        )]
        shm_dir: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// `id;label` CSV with pre-extracted JPEG frames per record.
    CsvJpeg {
        #[arg(value_name = "CSV_FILE")]
        csv_file: PathBuf,
        #[arg(value_name = "FOLDER", help = "Folder with one <id>/ frame folder per record")]
        folder: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// `image_path,label` list with one image per record.
    ImageList {
        #[arg(value_name = "INPUT_FILE")]
        input_file: PathBuf,
        #[arg(
            long = "root-folder",
            value_name = "DIR",
            help = "Prefix joined onto every listed image path"
        )]
        root_folder: Option<PathBuf>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// `<label>/<image>` directory tree.
    ImageFolder {
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,
        #[arg(
            long = "extensions",
            value_name = "EXT,EXT",
            value_delimiter = ',',
            help = "Image extensions to collect (defaults to .jpg,.png)"
        )]
        extensions: Vec<String>,
        #[arg(long = "follow-links", help = "Follow symlinks while scanning")]
        follow_links: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Debug, Args)]
struct CommonArgs {
    #[arg(
        long = "output-folder",
        value_name = "DIR",
        help = "Folder that receives label2idx.json"
    )]
    output_folder: PathBuf,
    #[arg(long, help = "Shuffle the record order once at construction")]
    shuffle: bool,
    #[arg(long, help = "Seed for a reproducible shuffle (implies --shuffle)")]
    seed: Option<u64>,
    #[arg(
        long,
        default_value_t = NATIVE_FRAME_SIZE,
        allow_hyphen_values = true,
        help = "Short-edge size of emitted frames (<= 0 keeps native size)"
    )]
    size: i32,
    #[arg(long, help = "First record of the iteration window")]
    start: Option<usize>,
    #[arg(long, help = "End (exclusive) of the iteration window")]
    stop: Option<usize>,
    #[arg(
        long,
        value_parser = parse_positive_usize,
        help = "Stop after this many emitted records (skips writing label2idx.json)"
    )]
    limit: Option<usize>,
}

impl CommonArgs {
    fn shuffle_mode(&self) -> ShuffleMode {
        match self.seed {
            Some(seed) => ShuffleMode::seeded(seed),
            None => ShuffleMode {
                enabled: self.shuffle,
                seed: None,
            },
        }
    }

    fn window(&self, len: usize) -> Option<Range<usize>> {
        if self.start.is_none() && self.stop.is_none() {
            return None;
        }
        Some(self.start.unwrap_or(0)..self.stop.unwrap_or(len))
    }
}

#[derive(Debug, Default)]
struct IngestSummary {
    emitted: usize,
    frames: usize,
    stopped_early: bool,
}

/// Parse `args_iter` (without the program name), build the selected adapter,
/// and print every record in the requested window.
pub fn run_ingest<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<IngestCli, _>(std::iter::once("ingest_demo".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let (adapter, common): (Box<dyn DatasetAdapter>, CommonArgs) = match cli.dataset {
        DatasetCommand::JsonVideo {
            json_file,
            folder,
            frame_rate,
            shm_dir,
            common,
        } => {
            let mut config = JsonVideoConfig::new(json_file, folder, &common.output_folder)
                .with_frame_size(common.size)
                .with_frame_rate(frame_rate)
                .with_shm_dir(shm_dir);
            config.shuffle = common.shuffle_mode();
            let adapter: Box<dyn DatasetAdapter> = Box::new(JsonVideoAdapter::new(config)?);
            (adapter, common)
        }
        DatasetCommand::CsvJpeg {
            csv_file,
            folder,
            common,
        } => {
            let mut config = CsvJpegConfig::new(csv_file, folder, &common.output_folder)
                .with_frame_size(common.size);
            config.shuffle = common.shuffle_mode();
            let adapter: Box<dyn DatasetAdapter> = Box::new(CsvJpegAdapter::new(config)?);
            (adapter, common)
        }
        DatasetCommand::ImageList {
            input_file,
            root_folder,
            common,
        } => {
            let mut config =
                ImageListConfig::new(input_file, &common.output_folder).with_img_size(common.size);
            if let Some(root_folder) = root_folder {
                config = config.with_root_folder(root_folder);
            }
            config.shuffle = common.shuffle_mode();
            let adapter: Box<dyn DatasetAdapter> = Box::new(ImageListAdapter::new(config)?);
            (adapter, common)
        }
        DatasetCommand::ImageFolder {
            folder,
            extensions,
            follow_links,
            common,
        } => {
            let mut config = ImageFolderConfig::new(folder, &common.output_folder)
                .with_follow_links(follow_links)
                .with_img_size(common.size);
            if !extensions.is_empty() {
                config = config.with_file_extensions(extensions);
            }
            config.shuffle = common.shuffle_mode();
            let adapter: Box<dyn DatasetAdapter> = Box::new(ImageFolderAdapter::new(config)?);
            (adapter, common)
        }
    };

    println!("=== dataset ===");
    println!("records: {}", adapter.len());
    println!("labels: {}", adapter.label_index().len());
    for (label, idx) in adapter.label_index().iter() {
        println!("  [{idx}] {label}");
    }
    println!();

    let window = common.window(adapter.len());
    if let Some(window) = &window {
        println!("window: {}..{}", window.start, window.end);
    }
    let summary = drain(adapter.as_ref(), window, common.limit)?;

    println!();
    println!("=== summary ===");
    println!("emitted records: {}", summary.emitted);
    println!("emitted frames: {}", summary.frames);
    if summary.stopped_early {
        println!("stopped at --limit; label2idx.json not written");
    } else {
        println!(
            "label index: {}",
            LabelIndex::file_path(&common.output_folder).display()
        );
    }
    Ok(())
}

fn drain(
    adapter: &dyn DatasetAdapter,
    window: Option<Range<usize>>,
    limit: Option<usize>,
) -> Result<IngestSummary, Box<dyn Error>> {
    let mut summary = IngestSummary::default();
    for item in adapter.iter_data(window) {
        let result = item?;
        print_result(&result);
        summary.emitted += 1;
        summary.frames += result.frames.len();
        if limit.is_some_and(|limit| summary.emitted >= limit) {
            summary.stopped_early = true;
            break;
        }
    }
    Ok(summary)
}

fn print_result(result: &IterationResult) {
    let dims = result
        .frames
        .first()
        .map(|frame| format!("{}x{}", frame.width(), frame.height()))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{:<24} label={} idx={} frames={} size={}",
        result.id,
        result.meta.label,
        result.meta.idx,
        result.frames.len(),
        dims
    );
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse --limit value '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("--limit must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Frame;
    use std::fs;
    use tempfile::tempdir;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    fn write_tree(root: &std::path::Path) {
        for (label, name) in [("cat", "a.png"), ("dog", "b.png"), ("cat", "c.png")] {
            fs::create_dir_all(root.join(label)).unwrap();
            Frame::from_pixel(4, 4, image::Rgb([0, 0, 0]))
                .save(root.join(label).join(name))
                .unwrap();
        }
    }

    #[test]
    fn parses_negative_size_and_window() {
        let cli = IngestCli::try_parse_from(args(&[
            "ingest_demo",
            "csv-jpeg",
            "train.csv",
            "frames",
            "--output-folder",
            "out",
            "--size",
            "-1",
            "--start",
            "2",
        ]))
        .unwrap();
        let DatasetCommand::CsvJpeg { common, .. } = cli.dataset else {
            panic!("expected csv-jpeg subcommand");
        };
        assert_eq!(common.size, -1);
        assert_eq!(common.window(5), Some(2..5));
    }

    #[test]
    fn seed_implies_shuffle() {
        let cli = IngestCli::try_parse_from(args(&[
            "ingest_demo",
            "image-folder",
            "data",
            "--output-folder",
            "out",
            "--seed",
            "3",
        ]))
        .unwrap();
        let DatasetCommand::ImageFolder { common, .. } = cli.dataset else {
            panic!("expected image-folder subcommand");
        };
        assert_eq!(common.shuffle_mode(), ShuffleMode::seeded(3));
    }

    #[test]
    fn full_run_writes_label_index() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("data");
        let out = temp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        write_tree(&root);

        run_ingest(
            args(&[
                "image-folder",
                root.to_str().unwrap(),
                "--output-folder",
                out.to_str().unwrap(),
            ])
            .into_iter(),
        )
        .unwrap();
        assert_eq!(
            LabelIndex::load(&out).unwrap(),
            LabelIndex::from_labels(["cat", "dog"])
        );
    }

    #[test]
    fn limited_run_skips_label_index() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("data");
        let out = temp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        write_tree(&root);

        run_ingest(
            args(&[
                "image-folder",
                root.to_str().unwrap(),
                "--output-folder",
                out.to_str().unwrap(),
                "--limit",
                "1",
            ])
            .into_iter(),
        )
        .unwrap();
        assert!(!LabelIndex::file_path(&out).exists());
    }
}
