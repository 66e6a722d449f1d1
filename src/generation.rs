pub mod orchestrator;
pub mod outcome;
pub mod request;
pub mod transport;
pub mod wire;
