pub mod body_token;
pub mod credentials;
pub mod gate;
pub mod handlers;
pub mod revocation;
pub mod tokens;

pub use gate::AuthError;
pub use tokens::{Claims, IssueError, TokenKeys};
