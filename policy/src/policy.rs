use gitpolicy_git_config::GitProperty;

use crate::HostedServerConfig;
use crate::XmlElement;
use crate::error::Result;
use crate::properties::FALSE_VALUE;
use crate::properties::IGNORE_SCHANNEL_KEY;
use crate::properties::SSL_BACKEND_KEY;
use crate::properties::SSL_BACKEND_OPENSSL;
use crate::properties::SSL_BACKEND_SCHANNEL;
use crate::properties::TRUE_VALUE;

/// Desired global git configuration for one machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitPolicy {
    use_schannel: bool,
    hosted_servers: Vec<HostedServerConfig>,
}

impl GitPolicy {
    pub fn new(use_schannel: bool, hosted_servers: Vec<HostedServerConfig>) -> Self {
        Self {
            use_schannel,
            hosted_servers,
        }
    }

    /// Parses a policy document. See [`crate::parse_policy`].
    pub fn from_xml_str(document: &str) -> Result<Self> {
        crate::parse_policy(document)
    }

    /// Builds a policy from an already parsed `WTMPGitConfig` element.
    pub fn from_element(root: &XmlElement) -> Result<Self> {
        crate::parse_policy_element(root)
    }

    pub fn uses_schannel(&self) -> bool {
        self.use_schannel
    }

    /// Hosted servers in document order.
    pub fn hosted_servers(&self) -> &[HostedServerConfig] {
        &self.hosted_servers
    }

    pub fn ssl_backend_property(&self) -> GitProperty {
        let backend = if self.use_schannel {
            SSL_BACKEND_SCHANNEL
        } else {
            SSL_BACKEND_OPENSSL
        };
        GitProperty::new(SSL_BACKEND_KEY, backend)
    }

    /// The live value that means "leave `http.sslBackend` alone".
    pub fn ignore_schannel_property(&self) -> GitProperty {
        GitProperty::new(IGNORE_SCHANNEL_KEY, TRUE_VALUE)
    }

    /// Written on first contact with a machine so operators find the opt-out
    /// key in their config, set to "managed".
    pub fn schannel_bootstrap_property(&self) -> GitProperty {
        GitProperty::new(IGNORE_SCHANNEL_KEY, FALSE_VALUE)
    }
}
