pub mod jsearch;
pub mod registry;
pub mod traits;

pub use jsearch::JSearchAdapter;
pub use registry::{AdapterFactory, AdapterRegistry};
pub use traits::{AdapterError, BoardAdapter, SearchCriteria};
