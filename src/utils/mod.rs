pub mod code_generator;
pub mod host;
pub mod jwt;
pub mod password;
pub mod phone;
pub mod validation;

pub use code_generator::{generate_order_number, generate_payment_reference};
pub use host::*;
pub use jwt::*;
pub use password::*;
pub use phone::*;
pub use validation::*;
