// Authorization URL builder.
//
// Appends the OAuth2 authorization request parameters to a provider's
// authorization endpoint, in a fixed order:
// client_id, redirect_uri, response_type, scope, provider extras, state.

/// Parameters for building an authorization URL.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationUrlParams<'a> {
    /// Authorization endpoint URL.
    pub authorization_endpoint: &'a str,
    /// OAuth client ID.
    pub client_id: &'a str,
    /// Redirect URI for the callback.
    pub redirect_uri: &'a str,
    /// Response type; omitted entirely when `None` (GitHub).
    pub response_type: Option<&'a str>,
    /// Space-separated scope string; omitted when `None`.
    pub scope: Option<&'a str>,
    /// Fixed provider-specific parameters (e.g. Google's `access_type`).
    pub additional_params: &'a [(&'a str, &'a str)],
    /// Opaque CSRF state, passed through untouched.
    pub state: Option<&'a str>,
}

/// Build an OAuth2 authorization URL.
///
/// Values are form-urlencoded, so a space in the scope becomes `+`.
pub fn create_authorization_url(params: AuthorizationUrlParams<'_>) -> Result<url::Url, url::ParseError> {
    let mut url = url::Url::parse(params.authorization_endpoint)?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("client_id", params.client_id)
            .append_pair("redirect_uri", params.redirect_uri);

        if let Some(response_type) = params.response_type {
            query.append_pair("response_type", response_type);
        }
        if let Some(scope) = params.scope {
            query.append_pair("scope", scope);
        }
        for (key, value) in params.additional_params {
            query.append_pair(key, value);
        }
        if let Some(state) = params.state {
            query.append_pair("state", state);
        }
    }

    Ok(url)
}
