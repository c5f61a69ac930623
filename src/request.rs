pub const DEFAULT_TITLE: &str = "Title";
pub const DEFAULT_DESCRIPTION: &str = "Description";
pub const DEFAULT_SOCIAL: &str = "Twitter: @yehezgun";
pub const DEFAULT_SITE_NAME: &str = "yehezgun.com";

/// Where the avatar comes from.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum AvatarSource {
    /// `http(s)://`, `data:`, `file://` URL or a plain filesystem path.
    Url(String),
    /// Encoded image bytes supplied in-process.
    Bytes(Vec<u8>),
}

impl std::fmt::Debug for AvatarSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(u) => f.debug_tuple("Url").field(u).finish(),
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
        }
    }
}

/// Raw, possibly incomplete request fields as they arrive from a query string, CLI flags or a
/// batch file.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageRequestInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub social: Option<String>,
    #[serde(alias = "site_name")]
    pub site_name: Option<String>,
    #[serde(alias = "image_url")]
    pub image_url: Option<String>,
}

impl ImageRequestInput {
    /// Parse `title`, `description`, `social`, `siteName` and `imageUrl` from a form-urlencoded
    /// query string (a leading `?` is accepted). Unknown keys are ignored; later duplicates win.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut input = Self::default();
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            let v = Some(v.into_owned());
            match k.as_ref() {
                "title" => input.title = v,
                "description" => input.description = v,
                "social" => input.social = v,
                "siteName" => input.site_name = v,
                "imageUrl" => input.image_url = v,
                _ => {}
            }
        }
        input
    }

    pub fn into_request(self) -> ImageRequest {
        ImageRequest {
            title: or_default(self.title, DEFAULT_TITLE),
            description: or_default(self.description, DEFAULT_DESCRIPTION),
            social: or_default(self.social, DEFAULT_SOCIAL),
            site_name: or_default(self.site_name, DEFAULT_SITE_NAME),
            avatar: self
                .image_url
                .filter(|u| !u.trim().is_empty())
                .map(AvatarSource::Url),
        }
    }
}

fn or_default(v: Option<String>, fallback: &str) -> String {
    match v {
        Some(s) if !s.is_empty() => s,
        _ => fallback.to_string(),
    }
}

/// A fully defaulted render request.
///
/// The four text fields are never empty: defaults are substituted once, when the request is
/// built, and the layout core relies on that.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageRequest {
    title: String,
    description: String,
    social: String,
    site_name: String,
    avatar: Option<AvatarSource>,
}

impl Default for ImageRequest {
    fn default() -> Self {
        ImageRequestInput::default().into_request()
    }
}

impl ImageRequest {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        social: impl Into<String>,
        site_name: impl Into<String>,
    ) -> Self {
        ImageRequestInput {
            title: Some(title.into()),
            description: Some(description.into()),
            social: Some(social.into()),
            site_name: Some(site_name.into()),
            image_url: None,
        }
        .into_request()
    }

    /// Parse a query string into a defaulted request. See [`ImageRequestInput::from_query`].
    pub fn from_query(query: &str) -> Self {
        ImageRequestInput::from_query(query).into_request()
    }

    pub fn with_avatar(mut self, avatar: Option<AvatarSource>) -> Self {
        self.avatar = match avatar {
            Some(AvatarSource::Url(u)) if u.trim().is_empty() => None,
            Some(AvatarSource::Bytes(b)) if b.is_empty() => None,
            other => other,
        };
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn social(&self) -> &str {
        &self.social
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn avatar(&self) -> Option<&AvatarSource> {
        self.avatar.as_ref()
    }

    /// File-name friendly form of the title.
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }
}

impl From<ImageRequestInput> for ImageRequest {
    fn from(input: ImageRequestInput) -> Self {
        input.into_request()
    }
}

/// Lowercase ASCII alphanumerics; every other run of characters becomes a single `-`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
#[path = "../tests/unit/request.rs"]
mod tests;
