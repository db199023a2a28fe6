pub mod error;
pub mod remote;
pub mod services;
pub mod traits;

pub use error::GatewayError;
pub use remote::FinnhubClient;
pub use traits::QuoteGateway;
