pub mod queries;
pub mod store;

pub use store::Store;
