//! Builds a [`GitPolicy`] from its XML form:
//!
//! ```xml
//! <WTMPGitConfig>
//!     <UseSChannel>true</UseSChannel>
//!     <GitlabConfiguration>
//!         <URL>https://gitlab.example.com</URL>
//!         <ApplicationKey>...</ApplicationKey>
//!         <ApplicationSecret>...</ApplicationSecret>
//!     </GitlabConfiguration>
//! </WTMPGitConfig>
//! ```
//!
//! Unknown elements are ignored.

use tracing::debug;

use crate::GitPolicy;
use crate::HostedServerConfig;
use crate::ServerUrl;
use crate::XmlElement;
use crate::error::PolicyParseError;
use crate::error::Result;

pub const POLICY_ELEMENT: &str = "WTMPGitConfig";
pub const USE_SCHANNEL_ELEMENT: &str = "UseSChannel";
pub const HOSTED_SERVER_ELEMENT: &str = "GitlabConfiguration";
pub const URL_ELEMENT: &str = "URL";
pub const APPLICATION_KEY_ELEMENT: &str = "ApplicationKey";
pub const APPLICATION_SECRET_ELEMENT: &str = "ApplicationSecret";

pub fn parse_policy(document: &str) -> Result<GitPolicy> {
    let root = XmlElement::parse(document)?;
    parse_policy_element(&root)
}

pub fn parse_policy_element(root: &XmlElement) -> Result<GitPolicy> {
    expect_name(root, POLICY_ELEMENT)?;

    let use_schannel = root
        .child(USE_SCHANNEL_ELEMENT)
        .is_some_and(|element| parse_bool(element.text()));

    let hosted_servers = root
        .children()
        .iter()
        .filter(|element| element.name() == HOSTED_SERVER_ELEMENT)
        .map(parse_hosted_server)
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "parsed policy: use_schannel={use_schannel}, {} hosted server(s)",
        hosted_servers.len()
    );
    Ok(GitPolicy::new(use_schannel, hosted_servers))
}

pub fn parse_hosted_server(element: &XmlElement) -> Result<HostedServerConfig> {
    expect_name(element, HOSTED_SERVER_ELEMENT)?;

    let mut server = HostedServerConfig::new();
    if let Some(url) = element.child(URL_ELEMENT) {
        server = server.with_url(ServerUrl::parse(url.text())?);
    }
    if let Some(key) = element.child(APPLICATION_KEY_ELEMENT) {
        server = server.with_application_key(key.text());
    }
    if let Some(secret) = element.child(APPLICATION_SECRET_ELEMENT) {
        server = server.with_application_secret(secret.text());
    }
    Ok(server)
}

fn expect_name(element: &XmlElement, expected: &'static str) -> Result<()> {
    if element.name() != expected {
        return Err(PolicyParseError::InvalidRootElement {
            provided: element.name().to_string(),
            expected,
        });
    }
    Ok(())
}

/// Anything other than a case-insensitive `true` is false.
fn parse_bool(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("true")
}
