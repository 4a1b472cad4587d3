pub mod assembler;
pub mod pipeline;

pub use assembler::AssemblyError;
pub use pipeline::{export_resume, ExportFormat};
