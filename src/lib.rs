pub mod decode;
pub mod interpolate;
pub mod point;
pub mod testcase;

pub use decode::*;
pub use interpolate::*;
pub use point::*;
pub use testcase::*;
