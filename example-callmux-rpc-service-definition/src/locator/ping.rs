use callmux_rpc_service::{NoValue, RpcEvent, rpc_method_id};

/// Liveness probe. Succeeds with a bare stream end, never with a value.
pub struct Ping;

impl RpcEvent for Ping {
    const METHOD_ID: u64 = rpc_method_id!("locator.ping");
    const METHOD_NAME: &'static str = "locator.ping";

    type Args = ();
    type Result = NoValue;

    fn encode_args(_args: Self::Args) -> Vec<u8> {
        Vec::new()
    }
}
