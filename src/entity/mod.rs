pub mod access_pass;
pub mod course;
pub mod license;
pub mod product;
pub mod project;
pub mod user;

pub use access_pass::{PassStatus, PassType};
pub use license::{LicenseStatus, LicenseType};
pub use user::Role;
