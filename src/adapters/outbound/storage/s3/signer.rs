/// Authentication collaborator applied to every outbound request.
///
/// The engine itself never constructs or inspects credentials; adapters hand
/// each request to a signer before sending it.
pub trait RequestSigner: Send + Sync + 'static {
    fn sign(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder;
}

/// Signs requests with static credentials
pub struct CredentialSigner {
    access_key: String,
    secret_key: String,
    session_token: Option<String>,
}

impl CredentialSigner {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl RequestSigner for CredentialSigner {
    fn sign(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.basic_auth(&self.access_key, Some(&self.secret_key));
        match &self.session_token {
            Some(token) => request.header("x-amz-security-token", token),
            None => request,
        }
    }
}

/// No-op signer for stores that accept unauthenticated access
pub struct AnonymousSigner;

impl RequestSigner for AnonymousSigner {
    fn sign(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
    }
}
