//! Credential endpoints of the Official Account API.

use crate::auth::TicketType;
use crate::config::{DEFAULT_API_HOST, HostConfig};
use url::form_urlencoded;

/// Classic `client_credential` token endpoint (GET).
pub const ACCESS_TOKEN_PATH: &str = "/cgi-bin/token";
/// Stable token endpoint (POST); tokens survive concurrent fetches.
pub const STABLE_ACCESS_TOKEN_PATH: &str = "/cgi-bin/stable_token";
/// Ticket endpoint (GET), selected by the `type` query parameter.
pub const TICKET_PATH: &str = "/cgi-bin/ticket/getticket";

pub fn access_token_url(host_config: Option<&HostConfig>, app_id: &str, secret: &str) -> String {
    let base = HostConfig::build_url(host_config, DEFAULT_API_HOST, ACCESS_TOKEN_PATH);
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "client_credential")
        .append_pair("appid", app_id)
        .append_pair("secret", secret)
        .finish();
    format!("{base}?{query}")
}

pub fn stable_access_token_url(host_config: Option<&HostConfig>) -> String {
    HostConfig::build_url(host_config, DEFAULT_API_HOST, STABLE_ACCESS_TOKEN_PATH)
}

pub fn ticket_url(host_config: Option<&HostConfig>, ticket: TicketType) -> String {
    let base = HostConfig::build_url(host_config, DEFAULT_API_HOST, TICKET_PATH);
    format!("{base}?type={}", ticket.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        assert_eq!(
            access_token_url(None, "wx123", "s3cr3t"),
            "https://api.weixin.qq.com/cgi-bin/token?grant_type=client_credential&appid=wx123&secret=s3cr3t"
        );
        assert_eq!(
            stable_access_token_url(None),
            "https://api.weixin.qq.com/cgi-bin/stable_token"
        );
        assert_eq!(
            ticket_url(None, TicketType::Sdk),
            "https://api.weixin.qq.com/cgi-bin/ticket/getticket?type=2"
        );
    }

    #[test]
    fn test_access_token_url_encodes_query() {
        let raw = access_token_url(None, "wx1", "a&grant_type=evil#x+y=z");
        assert!(!raw.contains('#'));

        let parsed = url::Url::parse(&raw).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("grant_type".to_string(), "client_credential".to_string()),
                ("appid".to_string(), "wx1".to_string()),
                ("secret".to_string(), "a&grant_type=evil#x+y=z".to_string()),
            ]
        );
        assert!(parsed.fragment().is_none());
    }

    #[test]
    fn test_urls_follow_host_override() {
        let hosts = HostConfig::default()
            .with_api_host("https://gateway.internal")
            .unwrap();
        assert_eq!(
            ticket_url(Some(&hosts), TicketType::Jsapi),
            "https://gateway.internal/cgi-bin/ticket/getticket?type=jsapi"
        );
    }
}
