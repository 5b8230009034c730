pub mod constants;
pub mod ids;
pub mod request;
pub mod response;

pub use constants::*;
pub use ids::*;
pub use request::*;
pub use response::*;
