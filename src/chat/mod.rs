pub mod request;
pub mod validator;
pub mod composer;
pub mod pipeline;

pub use request::*;
pub use validator::*;
pub use composer::*;
pub use pipeline::*;
