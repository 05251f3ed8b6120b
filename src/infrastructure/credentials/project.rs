//! Project derivation from the registrator URI.

use reqwest::Url;
use tracing::info;

use crate::domain::errors::{CredentialError, CredentialResult};

/// Extract the project embedded in a registrator URI.
///
/// `https://cse.cn-north-1.myhwclouds.com:443` has the host
/// `cse.cn-north-1.myhwclouds.com`; a host of exactly four dot-separated
/// labels yields the second one (`cn-north-1`). Any other host shape, an
/// empty URI, an IP address or a URI without host yields `None`. A URI that does not parse
/// is an error.
pub fn project_from_uri(raw: &str) -> CredentialResult<Option<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(raw).map_err(|e| CredentialError::InvalidRegistratorUri {
        uri: raw.to_string(),
        reason: e.to_string(),
    })?;

    // IP literals are never a project.
    let host = url.domain().unwrap_or_default();
    let labels: Vec<&str> = host.split('.').collect();
    match labels.as_slice() {
        [_, project, _, _] if !project.is_empty() => Ok(Some((*project).to_string())),
        _ => {
            info!(uri = raw, "registrator uri contains no project");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_label_host_with_port() {
        let project = project_from_uri("https://cse.cn-north-1.myhwclouds.com:443").unwrap();
        assert_eq!(project.as_deref(), Some("cn-north-1"));
    }

    #[test]
    fn test_four_label_host_without_port() {
        let project = project_from_uri("https://cse.cn-north-1.example.com").unwrap();
        assert_eq!(project.as_deref(), Some("cn-north-1"));
    }

    #[test]
    fn test_two_label_host_has_no_project() {
        assert_eq!(project_from_uri("https://example.com").unwrap(), None);
    }

    #[test]
    fn test_uri_without_host_has_no_project() {
        assert_eq!(project_from_uri("unix:/var/run/registry.sock").unwrap(), None);
    }

    #[test]
    fn test_ip_address_has_no_project() {
        assert_eq!(project_from_uri("https://10.1.0.2:30100").unwrap(), None);
    }

    #[test]
    fn test_empty_uri_has_no_project() {
        assert_eq!(project_from_uri("").unwrap(), None);
        assert_eq!(project_from_uri("   ").unwrap(), None);
    }

    #[test]
    fn test_unparseable_uri_is_an_error() {
        let err = project_from_uri("://missing-scheme").unwrap_err();
        assert!(matches!(err, CredentialError::InvalidRegistratorUri { .. }));
    }
}
