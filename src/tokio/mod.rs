mod asyncbufreader;

pub use asyncbufreader::AsyncBufReaderJsonFeeder;
