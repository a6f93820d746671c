pub mod converter;
pub mod dialect;
pub mod errors;
pub mod policy;
pub mod remap;
pub mod rules;
pub mod timeouts;
pub mod trace;
pub mod transport;

pub use converter::ProtocolConverter;
pub use dialect::Dialect;
pub use errors::{ConverterError, ConverterResult};
pub use policy::ConverterPolicy;
pub use transport::{FnTransport, NoopTransport, ProxyResponse, ProxyTransport};
