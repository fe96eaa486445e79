mod service_connection;

pub use service_connection::{EmitFn, ServiceConnection};
