use bitcode::{Decode, Encode};
use callmux_rpc_service::{RpcEvent, Value, rpc_method_id};

#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct NodeInfoResponse {
    pub name: String,
    pub uptime_secs: u64,
    pub services: Vec<String>,
}

pub struct NodeInfo;

impl RpcEvent for NodeInfo {
    const METHOD_ID: u64 = rpc_method_id!("locator.node_info");
    const METHOD_NAME: &'static str = "locator.node_info";

    type Args = ();
    type Result = Value<NodeInfoResponse>;

    fn encode_args(_args: Self::Args) -> Vec<u8> {
        Vec::new()
    }
}
