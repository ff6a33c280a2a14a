pub mod argon2;
pub mod errors;
pub mod policy;

pub use argon2::HashingCost;
pub use argon2::PasswordHasher;
pub use errors::PasswordError;
pub use policy::PasswordPolicy;
pub use policy::PasswordReport;
