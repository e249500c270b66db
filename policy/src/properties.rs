//! Names of the global git configuration keys the policy manages.

use crate::ServerUrl;

/// TLS backend git uses for HTTPS remotes.
pub const SSL_BACKEND_KEY: &str = "http.sslBackend";
pub const SSL_BACKEND_SCHANNEL: &str = "schannel";
pub const SSL_BACKEND_OPENSSL: &str = "openssl";

/// Operator opt-out: when `true`, `http.sslBackend` is left alone.
pub const IGNORE_SCHANNEL_KEY: &str = "wtmp.ignoreSChannel";

const IGNORE_URL_KEY_TEMPLATE: &str = "wtmp.%url%.ignore";

pub const CREDENTIAL_PROVIDER: &str = "gitlab";
pub const CREDENTIAL_AUTH_MODES: &str = "browser";

pub const TRUE_VALUE: &str = "true";
pub const FALSE_VALUE: &str = "false";

/// Operator opt-out for a single hosted server.
pub fn ignore_url_key(url: &ServerUrl) -> String {
    IGNORE_URL_KEY_TEMPLATE.replace("%url%", url.as_str())
}

pub(crate) fn credential_key(url: &ServerUrl, variable: &str) -> String {
    format!("credential.{url}.{variable}")
}
