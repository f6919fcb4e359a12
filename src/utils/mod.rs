pub(crate) mod bytes;
mod hexdump;

pub use self::hexdump::{dump_pdu, write_pdu_dump};
