//! Cookie-based authentication bridge.
//!
//! The backend issues a bearer token after OAuth and hands it to the gateway
//! through `/api/set-cookie-client`. The gateway stores it as an HTTP-only
//! cookie on its own origin and, for every backend call, re-attaches it as an
//! explicit `cookie` header.
//!
//! - [`token`]: the [`AccessToken`] newtype and cookie builders
//! - [`routes`]: sign-in callback, login and logout redirects

pub mod routes;
pub mod token;

pub use token::{ACCESS_TOKEN_COOKIE, AccessToken};
