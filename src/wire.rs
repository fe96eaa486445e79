mod envelope;
mod envelope_codec;
mod envelope_stream_decoder;
mod invocation_codec;
mod message_tag;
mod wire_error;

pub use envelope::{Envelope, SessionId};
pub use envelope_codec::EnvelopeCodec;
pub use envelope_stream_decoder::{EnvelopeDecoderIterator, EnvelopeStreamDecoder};
pub use invocation_codec::{Invocation, InvocationCodec};
pub use message_tag::MessageTag;
pub use wire_error::FrameDecodeError;
