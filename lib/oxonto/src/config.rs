use crate::error::ConfigError;
use crate::inference::FixpointConfig;
use crate::location::{LoadingLocation, SourceKind};
use crate::mapping::ImportMapping;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// An entry of an import location config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportLocationEntry {
    pub uri: String,
    /// The candidate location, a path or a URL.
    pub path: String,
    pub policy: LoadingLocation,
}

#[derive(Clone, Copy)]
enum Field {
    Uri,
    Path,
    Location,
}

/// Reads the entries of an import location config file.
///
/// The expected format is:
/// ```xml
/// <configs>
///   <file>
///     <uri>http://www.w3.org/2001/XMLSchema#</uri>
///     <path>ontologies/XMLSchema.xsd</path>
///     <location>disk</location>
///   </file>
/// </configs>
/// ```
/// `<location>` is one of `disk`, `web` or `classpath`. When it is missing or invalid every place is searched.
/// Entries without `<uri>` or `<path>` are skipped.
///
/// ```
/// use oxonto::{LoadingLocation, read_import_locations};
///
/// let entries = read_import_locations(
///     b"<configs><file><uri>http://ex.org/a</uri><path>a.ttl</path><location>web</location></file></configs>".as_slice(),
/// )?;
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].policy, LoadingLocation::Web);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn read_import_locations(source: impl BufRead) -> Result<Vec<ImportLocationEntry>, ConfigError> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);
    let mut buffer = Vec::new();
    let mut entries = Vec::new();
    let mut in_file = false;
    let mut field = None;
    let mut uri = None;
    let mut path = None;
    let mut location = None;
    loop {
        buffer.clear();
        match reader.read_event_into(&mut buffer)? {
            Event::Start(event) => match event.local_name().as_ref() {
                b"file" => {
                    in_file = true;
                    uri = None;
                    path = None;
                    location = None;
                }
                b"uri" if in_file => field = Some(Field::Uri),
                b"path" if in_file => field = Some(Field::Path),
                b"location" if in_file => field = Some(Field::Location),
                _ => field = None,
            },
            Event::Text(event) => {
                let value = event.unescape()?.trim().to_owned();
                match field {
                    Some(Field::Uri) => uri = Some(value),
                    Some(Field::Path) => path = Some(value),
                    Some(Field::Location) => location = Some(value),
                    None => (),
                }
            }
            Event::End(event) => {
                field = None;
                if event.local_name().as_ref() == b"file" {
                    in_file = false;
                    let (Some(uri), Some(path)) = (uri.take(), path.take()) else {
                        warn!("Import location entry without uri or path, skipping it");
                        continue;
                    };
                    let policy = location.take().map_or(LoadingLocation::All, |tag| {
                        tag.parse::<SourceKind>().map_or_else(
                            |e| {
                                warn!(uri, error = %e, "Invalid location tag, searching every location");
                                LoadingLocation::All
                            },
                            LoadingLocation::from,
                        )
                    });
                    entries.push(ImportLocationEntry { uri, path, policy });
                }
            }
            Event::Eof => break,
            _ => (),
        }
    }
    debug!(entries = entries.len(), "Read import location config");
    Ok(entries)
}

/// Writes `mappings` in the format read by [`read_import_locations`].
///
/// Each entry is tagged with the place its mapping has been found in.
/// Nothing is written if there is no mapping.
pub fn write_import_locations<W: Write>(
    sink: W,
    mappings: &[ImportMapping],
) -> Result<W, ConfigError> {
    if mappings.is_empty() {
        warn!("No import location mapping to save");
        return Ok(sink);
    }
    let mut writer = Writer::new_with_indent(sink, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("configs")))?;
    for mapping in mappings {
        writer.write_event(Event::Start(BytesStart::new("file")))?;
        write_text_element(&mut writer, "uri", mapping.uri())?;
        write_text_element(&mut writer, "path", mapping.location())?;
        if let Some(kind) = mapping.kind().preferred_source() {
            write_text_element(&mut writer, "location", kind.as_str())?;
        }
        writer.write_event(Event::End(BytesEnd::new("file")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("configs")))?;
    Ok(writer.into_inner())
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), ConfigError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Options of an [`OntologyManager`](crate::OntologyManager).
///
/// ```
/// use oxonto::ManagerOptions;
/// use std::time::Duration;
///
/// let options = ManagerOptions::default()
///     .with_source_directory("ontologies")
///     .with_ignored_import("http://www.w3.org/2001/XMLSchema#")
///     .with_http_timeout(Duration::from_secs(10));
/// assert_eq!(options.fixpoint().max_iterations, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    source_directory: PathBuf,
    resource_root: Option<PathBuf>,
    ignored_imports: Vec<String>,
    fixpoint: FixpointConfig,
    http_timeout: Option<Duration>,
    http_redirection_limit: usize,
}

impl ManagerOptions {
    /// The directory relative ontology paths are resolved against, the working directory by default.
    #[inline]
    #[must_use]
    pub fn with_source_directory(mut self, source_directory: impl Into<PathBuf>) -> Self {
        self.source_directory = source_directory.into();
        self
    }

    /// The root of the bundled ontology resources.
    #[inline]
    #[must_use]
    pub fn with_resource_root(mut self, resource_root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(resource_root.into());
        self
    }

    /// An import that is never followed.
    #[inline]
    #[must_use]
    pub fn with_ignored_import(mut self, uri: impl Into<String>) -> Self {
        self.ignored_imports.push(uri.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_fixpoint(mut self, fixpoint: FixpointConfig) -> Self {
        self.fixpoint = fixpoint;
        self
    }

    /// The maximum number of inference passes of a fixpoint run.
    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.fixpoint.max_iterations = max_iterations;
        self
    }

    /// The timeout of web requests. There is none by default.
    #[inline]
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_http_redirection_limit(mut self, redirection_limit: usize) -> Self {
        self.http_redirection_limit = redirection_limit;
        self
    }

    #[inline]
    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    #[inline]
    pub fn resource_root(&self) -> Option<&Path> {
        self.resource_root.as_deref()
    }

    #[inline]
    pub fn ignored_imports(&self) -> &[String] {
        &self.ignored_imports
    }

    #[inline]
    pub fn fixpoint(&self) -> FixpointConfig {
        self.fixpoint
    }

    #[inline]
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout
    }

    #[inline]
    pub fn http_redirection_limit(&self) -> usize {
        self.http_redirection_limit
    }
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            source_directory: PathBuf::from("."),
            resource_root: None,
            ignored_imports: Vec::new(),
            fixpoint: FixpointConfig::default(),
            http_timeout: None,
            http_redirection_limit: 5,
        }
    }
}
