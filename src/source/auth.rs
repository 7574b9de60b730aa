//! Email/passcode authorization for gated documents

use crate::error::Result;
use crate::source::SessionClient;

/// Credentials submitted to the document's access form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub passcode: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, passcode: Option<String>) -> Self {
        Self {
            email: email.into(),
            passcode,
        }
    }
}

/// Build the access form. Absent token and passcode fields are left out.
pub fn auth_form<'a>(token: Option<&'a str>, credentials: &'a Credentials) -> Vec<(&'a str, &'a str)> {
    let mut form = vec![("utf8", "\u{2713}"), ("_method", "patch")];
    if let Some(token) = token {
        form.push(("authenticity_token", token));
    }
    form.push(("link_auth_form[email]", credentials.email.as_str()));
    if let Some(passcode) = credentials.passcode.as_deref() {
        form.push(("link_auth_form[passcode]", passcode));
    }
    form.push(("commit", "Continue"));
    form
}

/// Submit credentials for the document at `base_url`.
///
/// Success only means the server accepted the submission. Whether access
/// was really granted shows up later, when page data requests succeed or fail.
pub async fn authorize(
    session: &SessionClient,
    base_url: &str,
    token: Option<&str>,
    credentials: &Credentials,
) -> Result<()> {
    let form = auth_form(token, credentials);
    session.post_form(base_url, &form).await?;
    tracing::info!(url = base_url, email = %credentials.email, "Submitted access credentials");
    Ok(())
}
