pub mod citations;
pub mod partition;
pub mod preview;
pub mod ttl;
