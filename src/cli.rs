use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pixel-squeeze",
    about = "Batch size reduction for images and documents",
    long_about = "pixel-squeeze shrinks a set of files in one pass. JPEG, PNG and WebP images are \
                  resized into a bounding box (800x600 by default) and re-encoded, PDFs and other \
                  files are carried through unchanged. Results are written as compressed_<name> \
                  files or packed into a single zip archive.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    pixel-squeeze batch ./photos ./out -r\n  \
    pixel-squeeze batch \"./scans/*.png\" ./out --archive\n  \
    pixel-squeeze compress photo.jpg ./out -w 1024 -H 768\n  \
    pixel-squeeze info photo.png"
)]
pub struct Args {
    #[arg(
        short = 'q',
        long,
        global = true,
        help = "Only print errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Print per-file details",
        long_help = "Print per-file details and enable debug logging. \
                     RUST_LOG still overrides the log level."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Reduce every file in a directory, glob or file list",
        long_about = "Process a set of files one after another. Files that cannot be decoded \
                      are kept as they are and reported at the end; the batch never stops early."
    )]
    Batch {
        #[arg(
            help = "Input directory, file, or glob",
            long_help = "Input can be a directory path, a single file, or a glob expression. \
                         Examples: './images', 'report.pdf', './scans/*.png'"
        )]
        input: String,

        #[arg(help = "Output directory path")]
        output: PathBuf,

        #[arg(
            short = 'r',
            long,
            help = "Process subdirectories recursively",
            long_help = "Recursively process all subdirectories when input is a directory."
        )]
        recursive: bool,

        #[arg(
            short = 'a',
            long,
            help = "Write one zip archive instead of separate files",
            long_help = "Pack every reduced file into compressed_files.zip inside the output \
                         directory. Entries are named compressed_<name>."
        )]
        archive: bool,

        #[arg(
            short = 'w',
            long,
            help = "Maximum width in pixels (default: 800)",
            long_help = "Bounding box width. Landscape images wider than this are scaled down \
                         with their aspect ratio preserved."
        )]
        max_width: Option<u32>,

        #[arg(
            short = 'H',
            long,
            help = "Maximum height in pixels (default: 600)",
            long_help = "Bounding box height. Portrait and square images taller than this are \
                         scaled down with their aspect ratio preserved."
        )]
        max_height: Option<u32>,

        #[arg(
            short = 'j',
            long,
            help = "Number of worker threads (default: auto)",
            long_help = "Number of runtime worker threads. Files are still processed one at a \
                         time; this bounds the threads used for reading and encoding."
        )]
        threads: Option<usize>,
    },

    #[command(
        about = "Reduce a single file",
        long_about = "Reduce one file with the same rules as a batch and write \
                      compressed_<name> into the output directory."
    )]
    Compress {
        #[arg(help = "Input file path")]
        input: PathBuf,

        #[arg(help = "Output directory path")]
        output: PathBuf,

        #[arg(short = 'w', long, help = "Maximum width in pixels (default: 800)")]
        max_width: Option<u32>,

        #[arg(short = 'H', long, help = "Maximum height in pixels (default: 600)")]
        max_height: Option<u32>,
    },

    #[command(
        about = "Show how a file would be reduced",
        long_about = "Display the media type, dimensions and the reduction rule that applies \
                      to a file, without writing anything."
    )]
    Info {
        #[arg(help = "File path to analyze")]
        input: PathBuf,

        #[arg(short = 'w', long, help = "Maximum width in pixels (default: 800)")]
        max_width: Option<u32>,

        #[arg(short = 'H', long, help = "Maximum height in pixels (default: 600)")]
        max_height: Option<u32>,
    },
}
