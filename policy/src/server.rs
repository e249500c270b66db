use std::fmt;

use gitpolicy_git_config::GitProperty;
use url::Url;

use crate::XmlElement;
use crate::error::MissingServerUrl;
use crate::error::PolicyParseError;
use crate::error::Result;
use crate::properties::CREDENTIAL_AUTH_MODES;
use crate::properties::CREDENTIAL_PROVIDER;
use crate::properties::TRUE_VALUE;
use crate::properties::credential_key;
use crate::properties::ignore_url_key;

/// Absolute URL of a hosted server.
///
/// The text is kept exactly as written (minus surrounding whitespace) because
/// it becomes part of configuration keys; `url::Url` would normalize
/// `https://host` to `https://host/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerUrl {
    raw: String,
    parsed: Url,
}

impl ServerUrl {
    pub fn parse(text: &str) -> Result<Self> {
        let raw = text.trim();
        let parsed = Url::parse(raw).map_err(|source| PolicyParseError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        Ok(Self {
            raw: raw.to_string(),
            parsed,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.parsed
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Credential hints for one hosted GitLab server.
///
/// Every field is optional in the document. A server without a URL can be
/// built and inspected, but deriving any property from it fails with
/// [`MissingServerUrl`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostedServerConfig {
    url: Option<ServerUrl>,
    application_key: Option<String>,
    application_secret: Option<String>,
}

impl HostedServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: ServerUrl) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_application_key(mut self, key: impl Into<String>) -> Self {
        self.application_key = Some(key.into());
        self
    }

    pub fn with_application_secret(mut self, secret: impl Into<String>) -> Self {
        self.application_secret = Some(secret.into());
        self
    }

    /// Builds a server from a `GitlabConfiguration` element.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        crate::parse_hosted_server(element)
    }

    pub fn url(&self) -> Option<&ServerUrl> {
        self.url.as_ref()
    }

    pub fn application_key(&self) -> Option<&str> {
        self.application_key.as_deref()
    }

    pub fn application_secret(&self) -> Option<&str> {
        self.application_secret.as_deref()
    }

    fn require_url(&self) -> std::result::Result<&ServerUrl, MissingServerUrl> {
        self.url.as_ref().ok_or(MissingServerUrl)
    }

    pub fn client_id_property(&self) -> std::result::Result<GitProperty, MissingServerUrl> {
        let url = self.require_url()?;
        Ok(GitProperty::new(
            credential_key(url, "gitLabDevClientId"),
            self.application_key().unwrap_or_default(),
        ))
    }

    pub fn client_secret_property(&self) -> std::result::Result<GitProperty, MissingServerUrl> {
        let url = self.require_url()?;
        Ok(GitProperty::new(
            credential_key(url, "gitLabDevClientSecret"),
            self.application_secret().unwrap_or_default(),
        ))
    }

    pub fn auth_modes_property(&self) -> std::result::Result<GitProperty, MissingServerUrl> {
        let url = self.require_url()?;
        Ok(GitProperty::new(
            credential_key(url, "gitLabAuthModes"),
            CREDENTIAL_AUTH_MODES,
        ))
    }

    pub fn provider_property(&self) -> std::result::Result<GitProperty, MissingServerUrl> {
        let url = self.require_url()?;
        Ok(GitProperty::new(
            credential_key(url, "provider"),
            CREDENTIAL_PROVIDER,
        ))
    }

    /// `wtmp.<url>.ignore=true`: present in the live config when the operator
    /// manages this server by hand.
    pub fn ignore_property(&self) -> std::result::Result<GitProperty, MissingServerUrl> {
        let url = self.require_url()?;
        Ok(GitProperty::new(ignore_url_key(url), TRUE_VALUE))
    }

    /// The four properties the reconciler keeps in place, in write order:
    /// client id, client secret, provider, auth modes.
    pub fn managed_properties(&self) -> std::result::Result<[GitProperty; 4], MissingServerUrl> {
        Ok([
            self.client_id_property()?,
            self.client_secret_property()?,
            self.provider_property()?,
            self.auth_modes_property()?,
        ])
    }
}
