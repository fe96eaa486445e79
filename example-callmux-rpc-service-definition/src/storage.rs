mod read_blob;

pub use read_blob::ReadBlob;
