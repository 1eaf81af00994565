//! Wire codecs
//!
//! Both codecs take the `{"messageId": .., "value": ..}` envelope as JSON
//! text and give it back, after a trip through their wire form, as JSON
//! text.

mod hex_bincode;
mod json;

pub use hex_bincode::BincodeCodec;
pub use json::JsonCodec;

use contracts::{CodecKind, WireCodec};

/// Boxed codec for a configured kind
pub fn codec_for(kind: CodecKind) -> Box<dyn WireCodec> {
    match kind {
        CodecKind::Bincode => Box::new(BincodeCodec::new()),
        CodecKind::Json => Box::new(JsonCodec::new()),
    }
}
