use crate::ResultShape;

/// Static descriptor of one remote method.
///
/// Never instantiated; the implementing type is only used as a key that
/// carries the method's ID, argument encoding and result shape.
///
/// ```rust
/// use callmux_rpc_service::{RpcEvent, Value, rpc_method_id};
///
/// pub struct Locate;
///
/// impl RpcEvent for Locate {
///     const METHOD_ID: u64 = rpc_method_id!("locator.resolve");
///     const METHOD_NAME: &'static str = "locator.resolve";
///
///     type Args = String;
///     type Result = Value<(i32, String)>;
///
///     fn encode_args(args: Self::Args) -> Vec<u8> {
///         bitcode::encode(&args)
///     }
/// }
/// ```
pub trait RpcEvent: Send + Sync + 'static {
    const METHOD_ID: u64;

    const METHOD_NAME: &'static str;

    type Args;

    type Result: ResultShape;

    fn encode_args(args: Self::Args) -> Vec<u8>;
}

/// The item type a caller of `E` receives.
pub type EventItem<E> = <<E as RpcEvent>::Result as ResultShape>::Item;
