pub mod advisory;
pub mod climate;
pub mod crop;
pub mod forecast;
pub mod plan;
pub mod soil;

pub use advisory::*;
pub use climate::*;
pub use crop::*;
pub use forecast::*;
pub use plan::*;
pub use soil::*;
