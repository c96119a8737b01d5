pub mod extractor;
pub mod password;
pub mod token;

pub use extractor::{bearer_token, AuthenticatedUser};
pub use password::{dummy_hash, hash_password, verify_password};
pub use token::TokenKeys;
