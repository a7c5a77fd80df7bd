/// Background job modules
pub mod sweeper;

pub use sweeper::OrderSweeper;
