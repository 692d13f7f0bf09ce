//! MIME part nodes as seen by the extractor and the attachment persister.

/// Declared intent of a part (`Content-Disposition`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Attachment,
    Inline,
    /// Any other disposition type, lower-cased.
    Other(String),
}

impl Disposition {
    /// Parse a disposition type, case-insensitively.
    pub fn parse(value: &str) -> Self {
        let lower = value.trim().to_ascii_lowercase();
        match lower.as_str() {
            "attachment" => Self::Attachment,
            "inline" => Self::Inline,
            _ => Self::Other(lower),
        }
    }
}

/// One node of a decoded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Lower-case `type/subtype`; `text/plain` when the header is missing.
    pub content_type: String,

    /// `None` when the part carries no `Content-Disposition` header.
    pub disposition: Option<Disposition>,

    /// Declared filename (disposition `filename` or content-type `name`).
    pub filename: Option<String>,

    /// Transfer-decoded payload bytes. Empty for containers.
    pub payload: Vec<u8>,

    /// Charset-decoded text for `text/*` parts.
    pub text: Option<String>,

    /// `true` for `multipart/*` containers.
    pub is_container: bool,
}

impl Part {
    /// A leaf part with the given content type and text body.
    pub fn text(content_type: &str, body: &str) -> Self {
        Self {
            content_type: content_type.to_string(),
            disposition: None,
            filename: None,
            payload: body.as_bytes().to_vec(),
            text: Some(body.to_string()),
            is_container: false,
        }
    }

    /// An empty `multipart/*` container.
    pub fn container(content_type: &str) -> Self {
        Self {
            content_type: content_type.to_string(),
            disposition: None,
            filename: None,
            payload: Vec::new(),
            text: None,
            is_container: true,
        }
    }

    /// Builder-style disposition setter.
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = Some(disposition);
        self
    }

    /// Builder-style filename setter.
    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }

    /// `true` when the part is marked `Content-Disposition: attachment`.
    pub fn is_attachment(&self) -> bool {
        matches!(self.disposition, Some(Disposition::Attachment))
    }

    /// `true` for leaves marked `attachment` or `inline`: the parts saved to disk.
    pub fn is_extractable(&self) -> bool {
        !self.is_container
            && matches!(
                self.disposition,
                Some(Disposition::Attachment) | Some(Disposition::Inline)
            )
    }

    /// The part's content as text, decoding the raw payload lossily when needed.
    pub fn body_text(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => String::from_utf8_lossy(&self.payload).into_owned(),
        }
    }
}
