use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::{Method, ResponseKind};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The configured url is not a valid url")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("The configured url is not a valid base url")]
    UrlCannotBeABaseUrl,

    #[error("No internet connection found")]
    Offline(#[source] reqwest::Error),

    #[error("Request error")]
    RequestError(#[source] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    #[error("{0}")]
    Api(RemoteError),

    /// `username` is known when the failing request went through a
    /// [`crate::Client`]; a bare [`crate::Response::decode`] leaves it unset.
    #[error("Username {} not found. {}", quoted(.username), .remote)]
    UserNotFound {
        username: Option<String>,
        remote: RemoteError,
    },

    #[error("No currently playing track.")]
    NoCurrentlyPlayingTrack,

    #[error("Malformed API Response")]
    MalformedApiResponse(#[from] serde_json::Error),

    #[error("Malformed value for field '{field}': {value:?}")]
    MalformedField { field: &'static str, value: String },

    #[error("Unrecognized response with top-level keys {keys:?}")]
    UnrecognizedResponse { keys: Vec<String> },

    #[error("{method} returned a {kind} response")]
    UnexpectedResponse { method: Method, kind: ResponseKind },
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ApiError::Offline(e)
        } else {
            ApiError::RequestError(e)
        }
    }
}

impl ApiError {
    /// Classifies a remote error envelope. `username` is the identity the
    /// failing request was built against, when there is one.
    pub(crate) fn from_remote(remote: RemoteError, username: Option<&str>) -> ApiError {
        if remote.code == ErrorCode::InvalidParams as u32
            && remote.message.eq_ignore_ascii_case("user not found")
        {
            ApiError::UserNotFound {
                username: username.map(str::to_owned),
                remote,
            }
        } else {
            ApiError::Api(remote)
        }
    }

    /// The remote error code, when the failure came from an error envelope.
    pub fn remote_code(&self) -> Option<u32> {
        match self {
            ApiError::Api(remote) | ApiError::UserNotFound { remote, .. } => Some(remote.code),
            _ => None,
        }
    }
}

fn quoted(username: &Option<String>) -> String {
    match username {
        Some(username) => format!("'{}'", username),
        None => "(unknown)".to_owned(),
    }
}

/// An `{"error": code, "message": text}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub code: u32,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn known_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.known_code().map_or("UNKNOWN_ERROR", ErrorCode::name);
        write!(f, "{} ({}): {}", name, self.code, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    InvalidService = 2,
    InvalidMethod = 3,
    AuthFailed = 4,
    InvalidFormat = 5,
    InvalidParams = 6,
    InvalidResource = 7,
    OperationFailed = 8,
    InvalidSessionKey = 9,
    InvalidApiKey = 10,
    Offline = 11,
    SubscribersOnly = 12,
    InvalidSignature = 13,
    TokenUnauthorized = 14,
    TokenExpired = 15,
    TemporarilyUnavailable = 16,
    LoginRequired = 17,
    TrialExpired = 18,
    NotEnoughContent = 20,
    NotEnoughMembers = 21,
    NotEnoughFans = 22,
    NotEnoughNeighbours = 23,
    NoPeerRadio = 24,
    RadioNotFound = 25,
    ApiKeySuspended = 26,
    Deprecated = 27,
    RateLimitExceeded = 29,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 26] = [
        ErrorCode::InvalidService,
        ErrorCode::InvalidMethod,
        ErrorCode::AuthFailed,
        ErrorCode::InvalidFormat,
        ErrorCode::InvalidParams,
        ErrorCode::InvalidResource,
        ErrorCode::OperationFailed,
        ErrorCode::InvalidSessionKey,
        ErrorCode::InvalidApiKey,
        ErrorCode::Offline,
        ErrorCode::SubscribersOnly,
        ErrorCode::InvalidSignature,
        ErrorCode::TokenUnauthorized,
        ErrorCode::TokenExpired,
        ErrorCode::TemporarilyUnavailable,
        ErrorCode::LoginRequired,
        ErrorCode::TrialExpired,
        ErrorCode::NotEnoughContent,
        ErrorCode::NotEnoughMembers,
        ErrorCode::NotEnoughFans,
        ErrorCode::NotEnoughNeighbours,
        ErrorCode::NoPeerRadio,
        ErrorCode::RadioNotFound,
        ErrorCode::ApiKeySuspended,
        ErrorCode::Deprecated,
        ErrorCode::RateLimitExceeded,
    ];

    pub fn from_code(code: u32) -> Option<ErrorCode> {
        let code = match code {
            2 => ErrorCode::InvalidService,
            3 => ErrorCode::InvalidMethod,
            4 => ErrorCode::AuthFailed,
            5 => ErrorCode::InvalidFormat,
            6 => ErrorCode::InvalidParams,
            7 => ErrorCode::InvalidResource,
            8 => ErrorCode::OperationFailed,
            9 => ErrorCode::InvalidSessionKey,
            10 => ErrorCode::InvalidApiKey,
            11 => ErrorCode::Offline,
            12 => ErrorCode::SubscribersOnly,
            13 => ErrorCode::InvalidSignature,
            14 => ErrorCode::TokenUnauthorized,
            15 => ErrorCode::TokenExpired,
            16 => ErrorCode::TemporarilyUnavailable,
            17 => ErrorCode::LoginRequired,
            18 => ErrorCode::TrialExpired,
            20 => ErrorCode::NotEnoughContent,
            21 => ErrorCode::NotEnoughMembers,
            22 => ErrorCode::NotEnoughFans,
            23 => ErrorCode::NotEnoughNeighbours,
            24 => ErrorCode::NoPeerRadio,
            25 => ErrorCode::RadioNotFound,
            26 => ErrorCode::ApiKeySuspended,
            27 => ErrorCode::Deprecated,
            29 => ErrorCode::RateLimitExceeded,
            _ => return None,
        };
        Some(code)
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::InvalidService => "STATUS_INVALID_SERVICE",
            ErrorCode::InvalidMethod => "STATUS_INVALID_METHOD",
            ErrorCode::AuthFailed => "STATUS_AUTH_FAILED",
            ErrorCode::InvalidFormat => "STATUS_INVALID_FORMAT",
            ErrorCode::InvalidParams => "STATUS_INVALID_PARAMS",
            ErrorCode::InvalidResource => "STATUS_INVALID_RESOURCE",
            ErrorCode::OperationFailed => "STATUS_OPERATION_FAILED",
            ErrorCode::InvalidSessionKey => "STATUS_INVALID_SK",
            ErrorCode::InvalidApiKey => "STATUS_INVALID_API_KEY",
            ErrorCode::Offline => "STATUS_OFFLINE",
            ErrorCode::SubscribersOnly => "STATUS_SUBSCRIBERS_ONLY",
            ErrorCode::InvalidSignature => "STATUS_INVALID_SIGNATURE",
            ErrorCode::TokenUnauthorized => "STATUS_TOKEN_UNAUTHORIZED",
            ErrorCode::TokenExpired => "STATUS_TOKEN_EXPIRED",
            ErrorCode::TemporarilyUnavailable => "STATUS_TEMPORARILY_UNAVAILABLE",
            ErrorCode::LoginRequired => "STATUS_LOGIN_REQUIRED",
            ErrorCode::TrialExpired => "STATUS_TRIAL_EXPIRED",
            ErrorCode::NotEnoughContent => "STATUS_NOT_ENOUGH_CONTENT",
            ErrorCode::NotEnoughMembers => "STATUS_NOT_ENOUGH_MEMBERS",
            ErrorCode::NotEnoughFans => "STATUS_NOT_ENOUGH_FANS",
            ErrorCode::NotEnoughNeighbours => "STATUS_NOT_ENOUGH_NEIGHBOURS",
            ErrorCode::NoPeerRadio => "STATUS_NO_PEER_RADIO",
            ErrorCode::RadioNotFound => "STATUS_RADIO_NOT_FOUND",
            ErrorCode::ApiKeySuspended => "STATUS_API_KEY_SUSPENDED",
            ErrorCode::Deprecated => "STATUS_DEPRECATED",
            ErrorCode::RateLimitExceeded => "STATUS_RATE_LIMIT_EXCEEDED",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_known_code_names_itself_in_the_message() {
        for code in ErrorCode::ALL {
            let remote = RemoteError::new(code as u32, "X");
            let message = remote.to_string();
            assert!(message.contains(code.name()), "{message}");
            assert!(message.ends_with(": X"), "{message}");
            assert_eq!(ErrorCode::from_code(code as u32), Some(code));
        }
    }

    #[test]
    fn unknown_code_keeps_raw_code() {
        let remote = RemoteError::new(1234, "Something odd");
        assert_eq!(remote.known_code(), None);
        assert_eq!(remote.to_string(), "UNKNOWN_ERROR (1234): Something odd");
    }

    #[test]
    fn user_not_found_is_discriminated() {
        let err = ApiError::from_remote(RemoteError::new(6, "User not found"), Some("bob"));
        match &err {
            ApiError::UserNotFound { username, remote } => {
                assert_eq!(username.as_deref(), Some("bob"));
                assert_eq!(remote.code, 6);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Username 'bob' not found. STATUS_INVALID_PARAMS (6): User not found"
        );
        assert_eq!(err.remote_code(), Some(6));

        let err = ApiError::from_remote(RemoteError::new(6, "user NOT found"), None);
        assert!(matches!(err, ApiError::UserNotFound { username: None, .. }));
        assert!(err.to_string().starts_with("Username (unknown) not found."));

        let err = ApiError::from_remote(RemoteError::new(6, "Invalid period"), Some("bob"));
        assert!(matches!(err, ApiError::Api(_)));
    }
}
