use crate::embed::{card_tags, media_tags, theme_color};
use crate::error::CreateError;
use crate::form::{FilePart, UploadData, UploadForm};
use bytes::Bytes;
use regex::Regex;
use serde::Serialize;
use std::net::IpAddr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, error, info};
use typed_builder::TypedBuilder;
use veil_core::limits::{MAX_PAYLOAD_SIZE, MIN_TTL_SECONDS, TRANSPORT_TTL};
use veil_core::{
    Clock, DomainEntry, DomainSpec, FileInfo, ObjectId, ObjectKind, ObjectMetadata, ObjectStore,
    PutOptions, SystemClock,
};
use veil_generator::{Chance, IdGenerator, IdStyle, PseudoChance, SecureGenerator};

/// Host names, IPv4 addresses and `localhost`, with an optional http(s)
/// scheme, port and path. The whole input must match.
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:https?://)?",
        r"(?:localhost",
        r"|(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(?:\.(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)){3}",
        r"|(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+\p{L}{2,})",
        r"(?::\d{1,5})?",
        r#"(?:[/?#][^\s"<>]*)?$"#,
    ))
    .expect("url pattern is valid")
});

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://").expect("scheme pattern is valid"));

static MIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+/[-+.\w]+").expect("mime pattern is valid"));

/// Deployment-wide settings of the create endpoint.
#[derive(Debug, Clone, TypedBuilder)]
pub struct CreateSettings {
    /// Base of the raw-content locator, e.g. `https://raw.example`.
    #[builder(setter(into))]
    pub raw_base_url: String,
    /// Base of the rendered-page locator, e.g. `https://example.link`.
    #[builder(setter(into))]
    pub retrieval_base_url: String,
    /// Used when the client sends an empty `domains` field.
    #[builder(default)]
    pub default_domains: DomainSpec,
    /// Inserted between a fake domain and the retrieval base.
    #[builder(setter(into))]
    pub cloak_marker: String,
    #[builder(default = String::from("America/New_York"), setter(into))]
    pub default_timezone: String,
}

/// Request facts that are not part of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateContext {
    /// Network address of the caller, keys the transport mailbox.
    pub client_addr: Option<IpAddr>,
    /// IANA zone reported for the caller.
    pub timezone: Option<String>,
    /// Store into the caller's mailbox instead of under a fresh id.
    pub transport: bool,
}

/// What a successful create hands back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CreateOutcome {
    Stored {
        url: String,
        raw: String,
        #[serde(rename = "deletionURL")]
        deletion_url: String,
    },
    Transport {
        url: String,
    },
}

impl CreateOutcome {
    /// The display locator.
    pub fn url(&self) -> &str {
        match self {
            CreateOutcome::Stored { url, .. } | CreateOutcome::Transport { url } => url,
        }
    }
}

/// A payload that passed validation.
struct Validated {
    payload: Bytes,
    file: Option<ValidatedFile>,
}

struct ValidatedFile {
    mime: String,
    extension: Option<String>,
}

/// Validates uploads, stores them and crafts the returned locators.
///
/// Identifiers are not checked against the store before writing: a freshly
/// generated id that happens to exist already replaces the older object.
pub struct CreateService<S: ?Sized> {
    store: Arc<S>,
    generator: Arc<dyn IdGenerator>,
    chance: Arc<dyn Chance>,
    clock: Arc<dyn Clock>,
    settings: CreateSettings,
}

impl<S: ?Sized> Clone for CreateService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            chance: Arc::clone(&self.chance),
            clock: Arc::clone(&self.clock),
            settings: self.settings.clone(),
        }
    }
}

impl<S: ObjectStore + ?Sized> CreateService<S> {
    /// Creates a service using the secure generator, an entropy-seeded
    /// [`PseudoChance`] and the system clock.
    pub fn new(store: Arc<S>, settings: CreateSettings) -> Self {
        Self {
            store,
            generator: Arc::new(SecureGenerator::new()),
            chance: Arc::new(PseudoChance::from_entropy()),
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    pub fn with_generator(mut self, generator: impl IdGenerator) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    pub fn with_chance(mut self, chance: impl Chance) -> Self {
        self.chance = Arc::new(chance);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Validates `form` and stores its payload.
    ///
    /// All validation happens before the single store write, so a refused
    /// upload leaves nothing behind.
    pub async fn create(
        &self,
        form: UploadForm,
        context: CreateContext,
    ) -> Result<CreateOutcome, CreateError> {
        let UploadForm {
            data: Some(data),
            data_type: Some(data_type),
            embed: Some(embed),
            domains: Some(domains),
            url_style: Some(url_style),
            ttl,
            extension,
            color,
            title,
            description,
        } = form
        else {
            debug!("create rejected: missing parameters");
            return Err(CreateError::MissingParameters);
        };

        let expire_seconds = parse_ttl(ttl.as_deref())?;
        let style = IdStyle::from_form_value(&url_style);

        let validated = match data_type.as_str() {
            "url" => validate_url(data)?,
            "file" => validate_file(data)?,
            other => return Err(CreateError::UnsupportedType(other.to_string())),
        };

        let display_domain = if context.transport {
            None
        } else {
            Some(self.pick_domain(&domains)?)
        };

        let id = if context.transport {
            let addr = context.client_addr.ok_or(CreateError::MissingClientAddress)?;
            ObjectId::mailbox(addr)
        } else {
            let id = self.generator.generate(style);
            match (&validated.file, extension.as_deref(), style) {
                (Some(file), Some("true"), IdStyle::Normal) => match suffix_for(file) {
                    Some(suffix) => id.with_extension(&suffix),
                    None => id,
                },
                _ => id,
            }
        };

        let raw_url = id.to_url(&self.settings.raw_base_url);
        let kind = match validated.file {
            None => ObjectKind::Url,
            Some(file) => {
                let mut embed_data = media_tags(&raw_url, &file.mime).unwrap_or_default();
                if embed == "true" {
                    let color = color
                        .as_deref()
                        .and_then(|c| theme_color(c, self.chance.as_ref()));
                    embed_data.push_str(&card_tags(
                        color.as_deref(),
                        title.as_deref(),
                        description.as_deref(),
                    ));
                }
                ObjectKind::File(FileInfo {
                    mime: file.mime,
                    // invisible identifiers never carry an extension
                    extension: file.extension.filter(|_| style == IdStyle::Normal),
                    embed_data: (!embed_data.is_empty()).then_some(embed_data),
                })
            }
        };

        let deletion_code = self.generator.deletion_code();
        let timezone = context
            .timezone
            .filter(|tz| !tz.is_empty())
            .unwrap_or_else(|| self.settings.default_timezone.clone());

        let metadata = ObjectMetadata {
            id: id.clone(),
            size: validated.payload.len() as u64,
            deletion_code: deletion_code.clone(),
            timezone,
            created_at: self.clock.now(),
            expire_seconds,
            kind,
        };

        let expiration_ttl = if context.transport {
            Some(TRANSPORT_TTL)
        } else {
            expire_seconds.map(Duration::from_secs)
        };

        let size = metadata.size;
        let options = PutOptions::builder()
            .metadata(metadata)
            .expiration_ttl(expiration_ttl)
            .build();

        self.store
            .put(&id, validated.payload, options)
            .await
            .map_err(|e| {
                error!(id = %id, error = %e, "failed to store upload");
                CreateError::from(e)
            })?;

        info!(
            id = %id,
            size,
            data_type = %data_type,
            transport = context.transport,
            "stored upload"
        );

        let retrieval = self.settings.retrieval_base_url.trim_end_matches('/');
        let Some(domain) = display_domain else {
            return Ok(CreateOutcome::Transport {
                url: format!("{retrieval}/t"),
            });
        };

        let url = match domain {
            Some(DomainEntry {
                name,
                is_real: true,
            }) => format!("https://{name}/{id}"),
            Some(DomainEntry {
                name,
                is_real: false,
            }) => format!("{name}{}{}", self.settings.cloak_marker, id.to_url(retrieval)),
            None => id.to_url(retrieval),
        };

        Ok(CreateOutcome::Stored {
            url,
            raw: raw_url,
            deletion_url: format!("{}?delete={}", id.to_url(retrieval), deletion_code.as_str()),
        })
    }

    /// Parses the `domains` field and picks one entry uniformly.
    ///
    /// Returns `None` when no display domain is available at all, in which
    /// case the plain retrieval locator is used.
    fn pick_domain(&self, domains: &str) -> Result<Option<DomainEntry>, CreateError> {
        let spec = if domains.trim().is_empty() {
            self.settings.default_domains.clone()
        } else {
            DomainSpec::parse(domains).map_err(|e| CreateError::InvalidDomains(e.to_string()))?
        };

        if spec.is_empty() {
            return Ok(None);
        }
        let index = self.chance.pick(spec.len());
        Ok(spec.entries().get(index).cloned())
    }
}

/// An absent or empty `ttl` means no expiry.
fn parse_ttl(ttl: Option<&str>) -> Result<Option<u64>, CreateError> {
    let Some(ttl) = ttl.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    match ttl.trim().parse::<u64>() {
        Ok(seconds) if seconds >= MIN_TTL_SECONDS => Ok(Some(seconds)),
        Ok(seconds) => Err(CreateError::InvalidTtl(format!(
            "{seconds} is below {MIN_TTL_SECONDS} seconds"
        ))),
        Err(e) => Err(CreateError::InvalidTtl(format!("'{ttl}': {e}"))),
    }
}

fn validate_url(data: UploadData) -> Result<Validated, CreateError> {
    let UploadData::Text(url) = data else {
        return Err(CreateError::InvalidUrl("data must be text".to_string()));
    };
    if url.chars().count() > MAX_PAYLOAD_SIZE {
        return Err(CreateError::InvalidUrl("url too long".to_string()));
    }
    if !URL.is_match(&url) {
        return Err(CreateError::InvalidUrl(format!("not a url: '{url}'")));
    }

    let url = if SCHEME.is_match(&url) {
        url
    } else {
        format!("https://{url}")
    };

    Ok(Validated {
        payload: Bytes::from(url),
        file: None,
    })
}

fn validate_file(data: UploadData) -> Result<Validated, CreateError> {
    let UploadData::File(file) = data else {
        return Err(CreateError::InvalidFile("data must be a file".to_string()));
    };
    let extension = file.extension().map(str::to_string);
    let FilePart {
        content_type,
        bytes,
        ..
    } = file;

    let mime = content_type
        .filter(|mime| MIME.is_match(mime))
        .ok_or_else(|| CreateError::InvalidFile("missing or malformed mime type".to_string()))?;
    if bytes.len() > MAX_PAYLOAD_SIZE {
        return Err(CreateError::InvalidFile(format!(
            "{} bytes exceeds {MAX_PAYLOAD_SIZE}",
            bytes.len()
        )));
    }

    Ok(Validated {
        payload: bytes,
        file: Some(ValidatedFile { mime, extension }),
    })
}

/// The declared filename suffix, else the first one known for the MIME type.
fn suffix_for(file: &ValidatedFile) -> Option<String> {
    file.extension.clone().or_else(|| {
        mime_guess::get_mime_extensions_str(&file.mime)
            .and_then(|extensions| extensions.first())
            .map(|ext| ext.to_string())
    })
}
