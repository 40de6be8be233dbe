use bytes::Bytes;

/// A file part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl FilePart {
    /// The filename suffix after the last `.`, if there is a non-empty one.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name.as_deref()?;
        let (_, suffix) = name.rsplit_once('.')?;
        (!suffix.is_empty()).then_some(suffix)
    }
}

/// The `data` field: plain text for URLs, a file part for files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadData {
    Text(String),
    File(FilePart),
}

/// The decoded fields of a create request.
///
/// Every field is optional here; [`CreateService`](crate::CreateService)
/// decides which ones are required. A field that was sent empty is `Some("")`,
/// which is different from a field that was not sent at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub data: Option<UploadData>,
    /// The `type` field: `url` or `file`.
    pub data_type: Option<String>,
    pub embed: Option<String>,
    pub domains: Option<String>,
    /// The `url` field: `invisible` selects zero-width identifiers.
    pub url_style: Option<String>,
    pub ttl: Option<String>,
    pub extension: Option<String>,
    pub color: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UploadForm {
    /// Records a text field by its form name. Unknown names are ignored.
    ///
    /// A text `data` field becomes [`UploadData::Text`].
    pub fn insert_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "data" => {
                self.data = Some(UploadData::Text(value));
                return;
            }
            "type" => &mut self.data_type,
            "embed" => &mut self.embed,
            "domains" => &mut self.domains,
            "url" => &mut self.url_style,
            "ttl" => &mut self.ttl,
            "extension" => &mut self.extension,
            "color" => &mut self.color,
            "title" => &mut self.title,
            "description" => &mut self.description,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn insert_file(&mut self, file: FilePart) {
        self.data = Some(UploadData::File(file));
    }
}
