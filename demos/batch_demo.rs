//! Runs a small in-memory batch through a session and prints progress events.
//!
//! `cargo run --example batch_demo`

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pixel_squeeze::codec::{ImageCodec, ImageCrateCodec};
use pixel_squeeze::processing::ReductionOptions;
use pixel_squeeze::progress::ProgressEvent;
use pixel_squeeze::session::SessionController;
use pixel_squeeze::source::SourceFile;
use pixel_squeeze::utils::format_file_size;
use tokio::sync::mpsc;

fn sample_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 96])
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pixel_squeeze::logger::init(false, false);

    let codec = ImageCrateCodec::new();
    let photo = codec.encode(&sample_image(1600, 1200), ImageFormat::Jpeg, 95)?;
    let screenshot = codec.encode(&sample_image(640, 480), ImageFormat::Png, 70)?;

    let files = vec![
        SourceFile::from_bytes("photo.jpg", "image/jpeg", photo),
        SourceFile::from_bytes("screenshot.png", "image/png", screenshot),
        SourceFile::from_bytes("broken.webp", "image/webp", b"not an image".to_vec()),
        SourceFile::from_bytes("report.pdf", "application/pdf", vec![0u8; 250_000]),
        SourceFile::from_bytes("notes.txt", "text/plain", b"remember the milk".to_vec()),
    ];

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ProgressEvent::FileStarted { file, index } => {
                    println!("[{}] optimizing {}", index, file.name());
                }
                ProgressEvent::FileFinished {
                    outcome,
                    processed,
                    total,
                } => {
                    let status = outcome.error.as_deref().unwrap_or("ok");
                    println!(
                        "    {}/{} {} -> {} ({})",
                        processed,
                        total,
                        format_file_size(outcome.original_size()),
                        format_file_size(outcome.reduced_size),
                        status
                    );
                }
                ProgressEvent::BatchComplete { totals, .. } => {
                    println!(
                        "done: {} -> {} ({:.1}% smaller)",
                        format_file_size(totals.original_bytes),
                        format_file_size(totals.reduced_bytes),
                        totals.reduction_percent()
                    );
                }
            }
        }
    });

    let mut session = SessionController::new(&ReductionOptions::default());
    session.submit(files)?;
    session.start(&tx).await?;
    drop(tx);
    printer.await?;

    let first = session.export_one(0)?;
    println!("single export: {} ({} bytes)", first.name, first.bytes.len());

    let archive = session.export_all()?;
    println!("archive: {}", format_file_size(archive.len() as u64));

    session.clear();
    println!("session is {}", session.state());
    Ok(())
}
