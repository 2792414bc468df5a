//! Data types exchanged with Semble.

mod at_uri;
mod card;
mod credentials;
mod session;

pub use at_uri::AtUri;
pub use card::{Card, CardRequest, CollectionLink, StrongRef};
pub use credentials::{Credentials, DEFAULT_SERVICE};
pub use session::AuthSession;
