//! Service layer: I/O, output-format handling, and progress reporting
//!
//! These modules separate frontend-facing concerns from the filter
//! pipeline so the processor stays a pure image-in/image-out core.

pub mod format;
pub mod io;
pub mod progress;

pub use format::OutputFormatHandler;
pub use io::ImageIOService;
pub use progress::{
    ConsoleProgressReporter, NoOpProgressReporter, ProcessingStage, ProgressReporter,
    ProgressTracker,
};
