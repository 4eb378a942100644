pub mod document_codec;

pub use document_codec::{CodecError, decode, encode};
