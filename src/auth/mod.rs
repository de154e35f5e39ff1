//! Authentication and authorization module

pub mod clock;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use clock::{Clock, ManualClock, SystemClock};
pub use identity::IdentityResolver;
pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{extract_token, CurrentUser};
pub use password::PasswordHasher;
