pub mod gateway_interface;
pub mod gemini_gateway;
pub mod gateway_factory;

pub use gateway_interface::*;
pub use gemini_gateway::*;
pub use gateway_factory::*;
