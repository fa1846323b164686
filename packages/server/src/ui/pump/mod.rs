//! Connection pump pair: one reader and one writer task per client.

pub mod reader;
pub mod writer;

pub use reader::{ReaderContext, ReaderExit, run_reader};
pub use writer::{WriterExit, WriterSettings, run_writer};
