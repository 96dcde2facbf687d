pub mod auth;
pub mod billing;
pub mod common;
pub mod dashboard;
pub mod order;
pub mod pagination;
pub mod product;
pub mod shipping;
pub mod tenant;

pub use auth::*;
pub use billing::*;
pub use common::*;
pub use dashboard::*;
pub use order::*;
pub use pagination::*;
pub use product::*;
pub use shipping::*;
pub use tenant::*;
