//! Epic Games / Epic Online Services sign-in helpers.
//!
//! Builds the browser sign-in URLs and redeems authorization codes for
//! deployment tokens, either directly or through the exchange code hand-off
//! that lets a code issued to one client authenticate another.

mod client;
mod endpoints;
mod error;
mod grant;
mod response;
mod types;

pub use client::{AuthClient, AuthClientConfig};
pub use endpoints::Endpoints;
pub use error::AuthError;
pub use grant::{GrantType, code_field};
pub use response::{ProviderResponse, get_token_from_response};
pub use types::{AuthorizationResponse, ClientCredentials, DEFAULT_SCOPE, RedirectPage};
