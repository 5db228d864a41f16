pub mod request;
pub mod response;

pub use response::Envelope;
