use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pixel_squeeze::batch::{BatchProcessor, BatchState};
use pixel_squeeze::codec::{ImageCodec, ImageCrateCodec};
use pixel_squeeze::export::export_all;
use pixel_squeeze::policy::ReductionPolicy;
use pixel_squeeze::processing::{fit_within, rescale_image, BoundingBox, ReductionOptions};
use pixel_squeeze::progress::NoopObserver;
use pixel_squeeze::source::SourceFile;

fn create_test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    }))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn bench_fit_within(c: &mut Criterion) {
    let bounds = BoundingBox::default();
    c.bench_function("fit_within", |b| {
        b.iter(|| fit_within(black_box(3000), black_box(1000), black_box(bounds)))
    });
}

fn bench_image_rescaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_rescaling");
    let bounds = BoundingBox::default();

    for size in [Small, Medium, Large].iter() {
        let (width, height) = match size {
            Small => (1024, 768),
            Medium => (1920, 1080),
            Large => (3840, 2160),
        };
        let img = create_test_image(width, height);

        group.bench_with_input(
            BenchmarkId::new("rescale", format!("{}x{}", width, height)),
            &img,
            |b, img| b.iter(|| rescale_image(black_box(img), black_box(bounds))),
        );
    }

    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    let codec = ImageCrateCodec::new();
    let img = create_test_image(800, 600);

    for (format, quality) in [
        (ImageFormat::Jpeg, 70),
        (ImageFormat::Png, 70),
        (ImageFormat::WebP, 80),
    ] {
        group.bench_with_input(
            BenchmarkId::new("encode", format!("{:?}", format)),
            &img,
            |b, img| b.iter(|| codec.encode(black_box(img), format, quality)),
        );
    }

    group.finish();
}

fn bench_batch_processing(c: &mut Criterion) {
    let rt = runtime();
    let codec = ImageCrateCodec::new();
    let jpeg = codec
        .encode(&create_test_image(1600, 1200), ImageFormat::Jpeg, 90)
        .unwrap();

    let files: Vec<SourceFile> = (0..5)
        .flat_map(|i| {
            [
                SourceFile::from_bytes(format!("photo_{}.jpg", i), "image/jpeg", jpeg.clone()),
                SourceFile::from_bytes(format!("doc_{}.pdf", i), "application/pdf", vec![0u8; 100_000]),
            ]
        })
        .collect();
    let processor = BatchProcessor::new(ReductionPolicy::new(&ReductionOptions::default()));

    c.bench_function("batch_processing", |b| {
        b.iter(|| {
            let mut state = BatchState::new();
            rt.block_on(processor.process_batch(black_box(files.clone()), &mut state, &NoopObserver));
            state
        })
    });
}

fn bench_archive_export(c: &mut Criterion) {
    let rt = runtime();
    let files: Vec<SourceFile> = (0..20)
        .map(|i| SourceFile::from_bytes(format!("file_{}.txt", i), "text/plain", vec![b'x'; 50_000]))
        .collect();
    let processor = BatchProcessor::new(ReductionPolicy::new(&ReductionOptions::default()));
    let mut state = BatchState::new();
    rt.block_on(processor.process_batch(files, &mut state, &NoopObserver));

    c.bench_function("archive_export", |b| {
        b.iter(|| export_all(black_box(state.results().outcomes())))
    });
}

enum ImageSize {
    Small,
    Medium,
    Large,
}

use ImageSize::*;

criterion_group!(
    benches,
    bench_fit_within,
    bench_image_rescaling,
    bench_encoding,
    bench_batch_processing,
    bench_archive_export
);
criterion_main!(benches);
