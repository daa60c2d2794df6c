/// The AJAX endpoint: dispatch on `action`
pub mod ajax;

/// Runtime configuration for the browser, with a fresh token
pub mod config;

pub mod health;

/// Credentials in, `LoginResult` out
pub mod login;

/// The glue script that loads the browser interceptor
pub mod script;

#[cfg(test)]
pub mod test;
