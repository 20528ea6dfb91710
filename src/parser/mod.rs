// Parser module for extracting documentation facts from Python files

pub mod complexity;
mod python;
pub mod records;
pub mod syntax;

pub use complexity::Complexity;
pub use python::PythonParser;
pub use records::*;
