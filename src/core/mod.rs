pub mod phase;
pub mod rk4;
