/// Things that can go wrong talking to the endpoint
pub mod error;
pub use error::{Error, Result};

use crate::login::LoginResult;
use url::Url;

/// Header that marks a request as AJAX. The server doesn't check it, but
/// hosts and proxies in front of it commonly do.
pub const REQUESTED_WITH: &str = "x-requested-with";

/// Value for `REQUESTED_WITH`.
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Client for the AJAX login endpoint
#[derive(Debug, Clone)]
pub struct Client {
    /// Full URL of the AJAX endpoint, e.g.
    /// `https://your-site.com/wp-admin/admin-ajax.php`.
    pub ajax_url: String,
}

impl Client {
    /// Construct a new client
    pub fn new(ajax_url: String) -> Self {
        Self { ajax_url }
    }

    /// Post form fields: everything a login form contained, plus the action
    /// and security fields.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn submit(
        &self,
        client: &reqwest::Client,
        fields: &[(String, String)],
    ) -> Result<LoginResult> {
        let url = Url::parse(&self.ajax_url)?;

        Self::handle_response(
            client
                .post(url)
                .header(REQUESTED_WITH, XML_HTTP_REQUEST)
                .form(fields),
        )
        .await
    }

    /// Convert an HTTP response into a `LoginResult`.
    ///
    /// ## Errors
    ///
    /// - `Ok(..)` if the server returned a 2xx with a result envelope. This
    ///   includes failed logins!
    /// - `Error::Status` for any other status. The body isn't read.
    /// - `Error::Http` if the request couldn't be sent or the body wasn't an
    ///   envelope.
    async fn handle_response(resp: reqwest::RequestBuilder) -> Result<LoginResult> {
        let resp = resp.send().await?;

        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Error::Status(status))
        }
    }
}
