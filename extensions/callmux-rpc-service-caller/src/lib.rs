mod call_options;
pub use call_options::CallOptions;
mod caller_interface;
pub use caller_interface::{RpcCall, call_event};
mod event_handler;
pub use event_handler::EventHandler;
mod message_decoder;
pub use message_decoder::MessageDecoder;
mod result_channel;
pub use result_channel::{ProducerState, ResultConsumer, ResultProducer, result_channel};
