use callmux_rpc_service::{RawBytes, RpcEvent, rpc_method_id};

/// Reads a stored blob; chunks are handed back undecoded.
pub struct ReadBlob;

impl RpcEvent for ReadBlob {
    const METHOD_ID: u64 = rpc_method_id!("storage.read");
    const METHOD_NAME: &'static str = "storage.read";

    type Args = (String, String);
    type Result = RawBytes;

    fn encode_args(args: Self::Args) -> Vec<u8> {
        bitcode::encode(&args)
    }
}
