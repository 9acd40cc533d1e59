//! Credential kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Category of cached credential. Each kind owns an independent slot and lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    AccessToken,
    JsapiTicket,
    WxCardTicket,
    SdkTicket,
}

impl CredentialKind {
    pub const ALL: [CredentialKind; 4] = [
        CredentialKind::AccessToken,
        CredentialKind::JsapiTicket,
        CredentialKind::WxCardTicket,
        CredentialKind::SdkTicket,
    ];

    /// Position in the store's slot table.
    pub(crate) const fn index(self) -> usize {
        match self {
            CredentialKind::AccessToken => 0,
            CredentialKind::JsapiTicket => 1,
            CredentialKind::WxCardTicket => 2,
            CredentialKind::SdkTicket => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::AccessToken => "access_token",
            CredentialKind::JsapiTicket => "jsapi_ticket",
            CredentialKind::WxCardTicket => "wx_card_ticket",
            CredentialKind::SdkTicket => "sdk_ticket",
        }
    }

    pub fn is_ticket(&self) -> bool {
        self.ticket_type().is_some()
    }

    pub fn ticket_type(&self) -> Option<TicketType> {
        match self {
            CredentialKind::AccessToken => None,
            CredentialKind::JsapiTicket => Some(TicketType::Jsapi),
            CredentialKind::WxCardTicket => Some(TicketType::WxCard),
            CredentialKind::SdkTicket => Some(TicketType::Sdk),
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "access_token" => Ok(CredentialKind::AccessToken),
            "jsapi_ticket" | "jsapi" => Ok(CredentialKind::JsapiTicket),
            "wx_card_ticket" | "wx_card" => Ok(CredentialKind::WxCardTicket),
            "sdk_ticket" | "sdk" => Ok(CredentialKind::SdkTicket),
            _ => Err(Error::UnknownCredentialKind(s.to_string())),
        }
    }
}

/// Ticket variants issued by the ticket endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    /// JS-SDK signature ticket.
    Jsapi,
    /// Card API ticket.
    WxCard,
    /// SDK ticket.
    Sdk,
}

impl TicketType {
    pub const ALL: [TicketType; 3] = [TicketType::Jsapi, TicketType::WxCard, TicketType::Sdk];

    /// Value of the `type` query parameter on the ticket endpoint.
    pub fn code(&self) -> &'static str {
        match self {
            TicketType::Jsapi => "jsapi",
            TicketType::WxCard => "wx_card",
            TicketType::Sdk => "2",
        }
    }
}

impl From<TicketType> for CredentialKind {
    fn from(ticket: TicketType) -> Self {
        match ticket {
            TicketType::Jsapi => CredentialKind::JsapiTicket,
            TicketType::WxCard => CredentialKind::WxCardTicket,
            TicketType::Sdk => CredentialKind::SdkTicket,
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(CredentialKind::from(*self).as_str())
    }
}
