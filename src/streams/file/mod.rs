mod text_file_stream;

pub use text_file_stream::TextFileStream;
