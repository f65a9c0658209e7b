pub mod market;
pub mod series;
pub mod signals;

pub use market::*;
pub use series::*;
pub use signals::*;
