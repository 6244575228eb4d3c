//! # gigacheck-client
//!
//! Everything a scenario needs to talk to the API:
//!
//! - **Token provider** - client-credentials exchange against the OAuth URL
//! - **Header builder** - bearer auth plus fresh correlation identifiers per call
//! - **Session** - one HTTP client and one cached credential per test run
//!
//! ```no_run
//! use gigacheck_client::Session;
//! use gigacheck_config::Config;
//! use gigacheck_core::{ChatCompletionRequest, Message};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new(Config::from_env()?)?;
//! let request = ChatCompletionRequest::new("GigaChat").with_message(Message::user("Привет!"));
//! let response = session.post_chat_completions(&request).await?;
//! assert_eq!(response.status(), 200);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod error;
pub mod headers;
pub mod session;
pub mod tls;

pub use api::ApiResponse;
pub use auth::{acquire_token, Credential, TokenProvider};
pub use error::{AuthError, ClientError};
pub use headers::RequestHeaders;
pub use session::Session;
pub use tls::{build_http_client, trust_mode, TrustMode};
