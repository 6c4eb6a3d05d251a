//! Serial wire protocol and the session that carries it.
//!
//! A record is one `key=value` line per metric followed by `END`, each line
//! terminated by `\n`. Values are ASCII; an unavailable metric is sent as
//! `--` so the display can keep its layout.

mod encoder;
mod serial;

pub use encoder::{encode, write_sample};
pub use serial::SerialSession;
