mod macros;
pub use macros::*;
mod result_shape;
pub use result_shape::*;
mod rpc_event;
pub use rpc_event::*;
