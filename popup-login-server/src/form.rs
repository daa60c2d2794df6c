use crate::error::Error;
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};

/// Fields posted to the AJAX endpoint, in the order they were sent. Browsers
/// send `FormData` as multipart and everything else tends to be urlencoded,
/// so both are accepted. File parts are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AjaxForm(pub Vec<(String, String)>);

impl AjaxForm {
    /// The value of a field. If it was sent more than once the last one wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// All fields as borrowed pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

#[async_trait]
impl<S> FromRequest<S> for AjaxForm
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|err| {
                    tracing::debug!(?err, "unreadable form");
                    Error::custom("Malformed form data")
                })?;

            return Ok(Self(fields));
        }

        let mut multipart = Multipart::from_request(req, state).await.map_err(|err| {
            tracing::debug!(?err, "unreadable multipart form");
            Error::custom("Malformed form data")
        })?;

        let mut fields = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(|err| {
            tracing::debug!(?err, "unreadable multipart field");
            Error::custom("Malformed form data")
        })? {
            if field.file_name().is_some() {
                continue;
            }

            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let value = field.text().await.map_err(|err| {
                tracing::debug!(?err, "unreadable multipart field");
                Error::custom("Malformed form data")
            })?;

            fields.push((name, value));
        }

        Ok(Self(fields))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::Body;

    fn form(content_type: &str, body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn test_urlencoded() {
        let req = form(
            "application/x-www-form-urlencoded",
            "log=alice&pwd=a%20b&action=ajax_login",
        );

        let fields = AjaxForm::from_request(req, &()).await.unwrap();

        assert_eq!(fields.get("log"), Some("alice"));
        assert_eq!(fields.get("pwd"), Some("a b"));
        assert_eq!(fields.get("security"), None);
    }

    #[test_log::test(tokio::test)]
    async fn test_multipart() {
        let req = form(
            "multipart/form-data; boundary=XyZ",
            "--XyZ\r\n\
             Content-Disposition: form-data; name=\"log\"\r\n\r\n\
             alice\r\n\
             --XyZ\r\n\
             Content-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNG\r\n\
             --XyZ\r\n\
             Content-Disposition: form-data; name=\"action\"\r\n\r\n\
             ajax_login\r\n\
             --XyZ--\r\n",
        );

        let fields = AjaxForm::from_request(req, &()).await.unwrap();

        assert_eq!(
            fields.0,
            vec![
                ("log".to_string(), "alice".to_string()),
                ("action".to_string(), "ajax_login".to_string()),
            ]
        );
    }

    #[test]
    fn test_last_value_wins() {
        let fields = AjaxForm(vec![
            ("action".to_string(), "other".to_string()),
            ("action".to_string(), "ajax_login".to_string()),
        ]);

        assert_eq!(fields.get("action"), Some("ajax_login"));
    }
}
