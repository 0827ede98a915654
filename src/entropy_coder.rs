pub mod bit_reader;
pub mod bit_writer;
pub mod compress;
pub mod decompress;
pub mod tables;

pub use bit_reader::BitReader;
pub use bit_writer::{BitSequence, BitWriter};
pub use compress::{compress, encode_codes, pack};
pub use decompress::{decode_codes, unpack};
pub use tables::{decode_symbol, encode_symbol, Code, CODE_TABLE};
