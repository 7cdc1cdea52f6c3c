pub mod batch;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod export;
pub mod formats;
pub mod info;
pub mod logger;
pub mod policy;
pub mod processing;
pub mod progress;
pub mod session;
pub mod source;
pub mod store;
pub mod utils;
pub mod validation;

pub use batch::{collect_input_files, validate_batch_limits, BatchProcessor, BatchState, CancelFlag};
pub use codec::{ImageCodec, ImageCrateCodec};
pub use error::{Result, SqueezeError};
pub use export::{export_all, export_all_with, export_one, ArchiveBuilder, ExportedFile, ZipArchiveBuilder};
pub use formats::MediaKind;
pub use info::{inspect_file, print_file_info, FileReport};
pub use policy::{Reduced, ReductionPolicy, ReductionRule};
pub use processing::{fit_within, rescale_image, BoundingBox, ReductionOptions};
pub use progress::{BatchObserver, NoopObserver, ProgressBarObserver, ProgressEvent};
pub use session::{SessionController, SessionState};
pub use source::{FileContent, SourceFile};
pub use store::{ReductionOutcome, ResultStore, Totals};
pub use utils::{format_bytes, format_file_size};
