pub mod filters;
pub mod pricing;
pub mod property;
pub mod stats;

pub use filters::{PageRequest, PropertyFilter};
pub use property::PropertyRecord;
