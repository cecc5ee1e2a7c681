pub mod data_matrix;
pub mod matrix;
pub mod qr_code;
pub mod segment;

pub use data_matrix::DataMatrixCode;
pub use matrix::BitMatrix;
pub use qr_code::{ECLevel, MaskPattern, QRCode, StructuredAppend, Version};
pub use segment::ModeRun;
