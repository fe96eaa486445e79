use crate::{MessageDecoder, ResultConsumer, ResultProducer, result_channel};
use callmux::error::ServiceError;
use callmux::session::ServiceHandler;
use callmux::wire::Envelope;
use callmux_rpc_service::{EventItem, ResultCategory, ResultShape, RpcEvent};
use std::marker::PhantomData;

/// The `ServiceHandler` for calls to method `E`.
///
/// Binds the producer of one call to the decoder resolved from `E`'s result
/// shape. Created together with the consumer handed back to the caller.
pub struct EventHandler<E: RpcEvent> {
    producer: ResultProducer<EventItem<E>>,
    decoder: MessageDecoder<EventItem<E>>,
    _event: PhantomData<fn() -> E>,
}

impl<E: RpcEvent> EventHandler<E> {
    pub fn new() -> (Self, ResultConsumer<EventItem<E>>) {
        let (producer, consumer) = result_channel();

        let handler = Self {
            producer,
            decoder: MessageDecoder::for_shape::<E::Result>(),
            _event: PhantomData,
        };

        (handler, consumer)
    }

    pub fn category() -> ResultCategory {
        <E::Result as ResultShape>::CATEGORY
    }
}

impl<E: RpcEvent> ServiceHandler for EventHandler<E> {
    fn handle_message(&mut self, envelope: &Envelope) {
        self.decoder.decode(&mut self.producer, envelope);
    }

    fn error(&mut self, error: ServiceError) {
        self.producer.error(error);
    }

    fn is_terminated(&self) -> bool {
        self.producer.is_terminated()
    }
}
