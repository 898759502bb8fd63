pub mod access_pass;
pub mod catalog;
pub mod delivery;
pub mod license;
pub mod user;

pub use access_pass::AccessPass;
pub use catalog::{Course, Product, Project};
pub use delivery::Delivery;
pub use license::License;
pub use user::User;
