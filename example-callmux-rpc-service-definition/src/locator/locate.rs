use callmux_rpc_service::{RpcEvent, Value, rpc_method_id};

/// Resolves a service name to `(port, host)`.
pub struct Locate;

impl RpcEvent for Locate {
    const METHOD_ID: u64 = rpc_method_id!("locator.resolve");
    const METHOD_NAME: &'static str = "locator.resolve";

    type Args = String;
    type Result = Value<(i32, String)>;

    fn encode_args(name: Self::Args) -> Vec<u8> {
        bitcode::encode(&name)
    }
}
