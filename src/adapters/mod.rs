// Adapters layer: concrete transports behind the `Transport` port.

pub mod http;
pub mod loopback;

pub use http::HttpTransport;
pub use loopback::LoopbackTransport;
