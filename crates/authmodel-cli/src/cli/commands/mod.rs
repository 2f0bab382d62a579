mod dispatch;
pub mod read;
pub mod write;

pub use dispatch::dispatch;
