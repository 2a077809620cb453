//! Generic list engine: one request shape (page, page size, sort, substring
//! filters) applied to every whitelisted resource.

pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod memory;
pub mod resource;
pub mod service;
pub mod types;

pub use error::ListError;
pub use filter::Filter;
pub use resource::{resolve, ResourceDescriptor};
pub use service::ListService;
pub use types::{ListFilter, ListParams, ListRequest, ListResponse, SortDirection};
