use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::models::{CoreError, CoreErrorKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    TikTok,
    YouTube,
    Facebook,
    Pinterest,
    Twitter,
    Website,
}

impl SocialPlatform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::TikTok => "tiktok",
            Self::YouTube => "youtube",
            Self::Facebook => "facebook",
            Self::Pinterest => "pinterest",
            Self::Twitter => "twitter",
            Self::Website => "website",
        }
    }

    fn from_host(host: &str) -> Self {
        const HOSTS: &[(&str, SocialPlatform)] = &[
            ("instagram.com", SocialPlatform::Instagram),
            ("instagr.am", SocialPlatform::Instagram),
            ("tiktok.com", SocialPlatform::TikTok),
            ("youtube.com", SocialPlatform::YouTube),
            ("youtu.be", SocialPlatform::YouTube),
            ("facebook.com", SocialPlatform::Facebook),
            ("fb.watch", SocialPlatform::Facebook),
            ("pinterest.com", SocialPlatform::Pinterest),
            ("pin.it", SocialPlatform::Pinterest),
            ("twitter.com", SocialPlatform::Twitter),
            ("x.com", SocialPlatform::Twitter),
        ];

        HOSTS
            .iter()
            .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{domain}")))
            .map(|(_, platform)| *platform)
            .unwrap_or(SocialPlatform::Website)
    }
}

impl Display for SocialPlatform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates an http(s) post URL and classifies its host.
pub fn detect_platform(url: &str) -> Result<SocialPlatform, CoreError> {
    let host = url_host(url.trim()).ok_or_else(|| {
        CoreError::new(
            CoreErrorKind::InvalidInput,
            "Please enter a valid http(s) URL",
        )
    })?;
    Ok(SocialPlatform::from_host(&host))
}

fn url_host(url: &str) -> Option<String> {
    let lower = url.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))?;

    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit('@').next()?;
    let host = host_port.split(':').next()?.trim_end_matches('.');

    if host.is_empty() || !host.contains('.') || host.chars().any(char::is_whitespace) {
        return None;
    }

    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .or_else(|| host.strip_prefix("vm."))
        .unwrap_or(host);
    Some(host.to_string())
}
