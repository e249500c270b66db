pub mod error;
pub mod parser;
pub mod policy;
pub mod properties;
pub mod server;
pub mod xml;

pub use error::MissingServerUrl;
pub use error::PolicyParseError;
pub use error::Result;
pub use parser::parse_hosted_server;
pub use parser::parse_policy;
pub use parser::parse_policy_element;
pub use policy::GitPolicy;
pub use server::HostedServerConfig;
pub use server::ServerUrl;
pub use xml::XmlElement;
