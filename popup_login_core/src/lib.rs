//! Common code for popup login: the wire protocol shared by the server and
//! the browser, plus the client-side interceptor that drives popup forms.

/// HTML text helpers (entity decoding, escaping, text content)
pub mod html;

/// The login request and its result, as they go over the wire.
pub mod login;
pub use login::LoginResult;

/// Configuration handed to the browser at page load.
pub mod config;
pub use config::RuntimeConfig;

/// Intercepting popup login forms. Pure state; the browser runs the effects.
pub mod interceptor;
pub use interceptor::Interceptor;

/// Talk to the AJAX endpoint.
pub mod client;

#[cfg(test)]
mod test;
