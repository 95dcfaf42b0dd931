pub mod dots;
pub use dots::{DetectionError, DotConfig, DotDetection, annotate_dots, detect_dots};
