//! Named rate-limit presets for each gated action.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ServiceError;

/// Request limit and window length for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    const fn minutes(limit: u32, minutes: u64) -> Self {
        Self {
            limit,
            window: Duration::from_secs(minutes * 60),
        }
    }
}

/// An action throttled independently of every other action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Login,
    Signup,
    PasswordReset,
    VerifyOtp,
    ResumeParse,
    PortfolioGenerate,
    Api,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Login,
        Action::Signup,
        Action::PasswordReset,
        Action::VerifyOtp,
        Action::ResumeParse,
        Action::PortfolioGenerate,
        Action::Api,
    ];

    pub const fn policy(self) -> RateLimitPolicy {
        match self {
            Self::Login => RateLimitPolicy::minutes(5, 5),
            Self::Signup => RateLimitPolicy::minutes(3, 60),
            Self::PasswordReset => RateLimitPolicy::minutes(3, 15),
            Self::VerifyOtp => RateLimitPolicy::minutes(10, 15),
            Self::ResumeParse => RateLimitPolicy::minutes(20, 60),
            Self::PortfolioGenerate => RateLimitPolicy::minutes(10, 60),
            Self::Api => RateLimitPolicy::minutes(100, 1),
        }
    }

    /// Identifier prefix, also used as the metrics label.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::PasswordReset => "password-reset",
            Self::VerifyOtp => "verify-otp",
            Self::ResumeParse => "parse-resume",
            Self::PortfolioGenerate => "generate-portfolio",
            Self::Api => "api",
        }
    }

    /// Builds the limiter key `<tag>:<client>`.
    pub fn identifier(self, client: &str) -> String {
        format!("{}:{client}", self.tag())
    }

    /// Message returned to a caller who exceeded this action's limit.
    pub const fn denial_message(self) -> &'static str {
        match self {
            Self::Login => "Too many login attempts. Please try again later.",
            Self::Signup => "Too many signup attempts. Please try again later.",
            Self::PasswordReset => "Too many password reset requests. Please try again later.",
            Self::VerifyOtp => "Too many verification attempts. Please try again later.",
            Self::ResumeParse => "Too many resume uploads. Please try again later.",
            Self::PortfolioGenerate => {
                "Too many portfolio generation requests. Please try again later."
            }
            Self::Api => "Too many requests. Please try again later.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Action {
    type Err = ServiceError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.tag() == tag)
            .ok_or_else(|| ServiceError::NotFound(format!("unknown action '{tag}'")))
    }
}
