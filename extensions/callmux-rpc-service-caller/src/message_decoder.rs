use crate::ResultProducer;
use callmux::error::ServiceError;
use callmux::wire::{Envelope, MessageTag};
use callmux_rpc_service::{ResultCategory, ResultShape, Unpacker};

/// Turns envelopes addressed to one call into writes on its producer.
///
/// - `Chunk`: decoded with the shape's unpacker and written. Shapes without a
///   value ignore chunks entirely. A payload that fails to decode fails the
///   producer with `ServiceError::Decode`.
/// - `Error`: the `{code, message}` payload fails the producer with
///   `ServiceError::Remote`.
/// - `Choke`: closes the producer without error.
pub struct MessageDecoder<T> {
    unpacker: Unpacker<T>,
}

impl<T> MessageDecoder<T> {
    pub fn new(unpacker: Unpacker<T>) -> Self {
        Self { unpacker }
    }

    pub fn for_shape<S>() -> Self
    where
        S: ResultShape<Item = T>,
    {
        Self::new(S::unpacker())
    }

    pub fn category(&self) -> ResultCategory {
        self.unpacker.category()
    }

    pub fn decode(&self, producer: &mut ResultProducer<T>, envelope: &Envelope) {
        match envelope.tag {
            MessageTag::Chunk => match self.unpacker.unpack(&envelope.payload) {
                None => {
                    tracing::trace!(
                        session_id = envelope.session_id,
                        "ignoring chunk for result without a value"
                    );
                }
                Some(Ok(value)) => {
                    producer.write(value);
                }
                Some(Err(fault)) => {
                    tracing::warn!(session_id = envelope.session_id, %fault, "malformed chunk");
                    producer.error(ServiceError::Decode(fault));
                }
            },
            MessageTag::Error => match envelope.decode_error_payload() {
                Ok((code, message)) => {
                    producer.error(ServiceError::Remote { code, message });
                }
                Err(fault) => {
                    tracing::warn!(session_id = envelope.session_id, %fault, "malformed error");
                    producer.error(ServiceError::Decode(fault));
                }
            },
            MessageTag::Choke => {
                producer.close();
            }
        }
    }
}
