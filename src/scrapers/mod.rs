//! Rate-limited HTTP fetching.

mod http_client;
mod pacer;
mod user_agent;

pub use http_client::{FetchError, HttpClient};
pub use pacer::RequestPacer;
pub use user_agent::{random_user_agent, resolve_user_agent, ACCEPT_LANGUAGE, USER_AGENTS};
