use callmux_rpc_service::{RpcEvent, Value, rpc_method_id};

/// Streams one notification per chunk until the service chokes the stream.
pub struct Subscribe;

impl RpcEvent for Subscribe {
    const METHOD_ID: u64 = rpc_method_id!("locator.subscribe");
    const METHOD_NAME: &'static str = "locator.subscribe";

    type Args = String;
    type Result = Value<String>;

    fn encode_args(topic: Self::Args) -> Vec<u8> {
        bitcode::encode(&topic)
    }
}
