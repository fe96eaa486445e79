mod locate;
mod node_info;
mod ping;
mod subscribe;

pub use locate::Locate;
pub use node_info::{NodeInfo, NodeInfoResponse};
pub use ping::Ping;
pub use subscribe::Subscribe;
