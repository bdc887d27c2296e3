use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{SourceError, SourceResult};
use crate::locator::ContentLocator;

/// A reusable way to obtain byte streams for one [`ContentLocator`].
///
/// A source may carry pre-extracted bytes (the optimization path for nested
/// entries whose content was already pulled out of the archive chain); while
/// that cache is populated, opens serve from it and produce byte-identical
/// content to the on-demand path. Dropping a [`ContentStream`] severs the
/// cache, so repeated opens never retain stale buffers.
pub struct ContentSource {
    locator: ContentLocator,
    cache: Mutex<Option<Arc<[u8]>>>,
}

impl ContentSource {
    /// A source that resolves its locator on every open.
    pub fn new(locator: ContentLocator) -> Self {
        Self {
            locator,
            cache: Mutex::new(None),
        }
    }

    /// A source whose first open serves the given pre-extracted bytes
    /// instead of re-opening the archive chain.
    pub fn with_extracted(locator: ContentLocator, bytes: Vec<u8>) -> Self {
        Self {
            locator,
            cache: Mutex::new(Some(Arc::from(bytes))),
        }
    }

    pub fn locator(&self) -> &ContentLocator {
        &self.locator
    }

    /// Human-readable composite label of the underlying location.
    pub fn label(&self) -> String {
        self.locator.label()
    }

    /// Whether a pre-extracted buffer is currently retained.
    pub fn has_cached_bytes(&self) -> bool {
        self.cache.lock().expect("lock poisoned").is_some()
    }

    /// Open a byte stream for this source.
    ///
    /// Exactly one live reader per returned stream. All archive handles are
    /// released before this returns; the stream owns only what it needs to
    /// serve reads, so failure paths after open cannot leak handles.
    pub fn open(&self) -> SourceResult<ContentStream<'_>> {
        if let Some(bytes) = self.cache.lock().expect("lock poisoned").clone() {
            debug!(source = %self.locator, "serving pre-extracted bytes");
            return Ok(ContentStream {
                reader: StreamReader::Buffered(Cursor::new(bytes)),
                cache: &self.cache,
            });
        }

        let reader = match &self.locator {
            ContentLocator::File(path) => {
                let file = File::open(path).map_err(|e| open_error(path, e))?;
                StreamReader::File(BufReader::new(file))
            }
            ContentLocator::ArchiveEntry { archive, entry } => {
                let bytes = read_entry(archive, entry)?;
                StreamReader::Buffered(Cursor::new(Arc::from(bytes)))
            }
            ContentLocator::NestedArchiveEntry {
                archive,
                outer,
                inner,
            } => {
                let bytes = read_nested_entry(archive, outer, inner)?;
                StreamReader::Buffered(Cursor::new(Arc::from(bytes)))
            }
        };
        Ok(ContentStream {
            reader,
            cache: &self.cache,
        })
    }
}

impl std::fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSource")
            .field("locator", &self.locator)
            .field("cached", &self.has_cached_bytes())
            .finish()
    }
}

/// A scoped read of one [`ContentSource`].
///
/// Dropping the stream (or calling [`close`](Self::close)) clears the
/// source's retained byte buffer regardless of which path served the read.
#[derive(Debug)]
pub struct ContentStream<'a> {
    reader: StreamReader,
    cache: &'a Mutex<Option<Arc<[u8]>>>,
}

#[derive(Debug)]
enum StreamReader {
    File(BufReader<File>),
    Buffered(Cursor<Arc<[u8]>>),
}

impl ContentStream<'_> {
    /// Explicitly end the read. Equivalent to dropping the stream.
    pub fn close(self) {}
}

impl Read for ContentStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.reader {
            StreamReader::File(r) => r.read(buf),
            StreamReader::Buffered(r) => r.read(buf),
        }
    }
}

impl Drop for ContentStream<'_> {
    fn drop(&mut self) {
        self.cache.lock().expect("lock poisoned").take();
    }
}

fn open_error(path: &Path, err: io::Error) -> SourceError {
    if err.kind() == io::ErrorKind::NotFound {
        SourceError::ResourceUnavailable(path.display().to_string())
    } else {
        SourceError::Io(err)
    }
}

fn zip_error(archive: &Path, err: ZipError) -> SourceError {
    match err {
        ZipError::Io(e) => SourceError::Io(e),
        other => SourceError::MalformedArchive {
            archive: archive.display().to_string(),
            reason: other.to_string(),
        },
    }
}

fn open_archive(path: &Path) -> SourceResult<ZipArchive<BufReader<File>>> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| zip_error(path, e))
}

fn read_entry(archive_path: &Path, entry_name: &str) -> SourceResult<Vec<u8>> {
    let mut archive = open_archive(archive_path)?;
    let mut entry = archive.by_name(entry_name).map_err(|e| match e {
        ZipError::FileNotFound => SourceError::ResourceUnavailable(format!(
            "{}:{entry_name}",
            archive_path.display()
        )),
        other => zip_error(archive_path, other),
    })?;
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Resolve `inner` inside the embedded archive held as `outer`.
///
/// The embedded archive is consumed as a stream: entries are visited in
/// stored order and the first name match wins. No random access into the
/// inner archive is assumed.
fn read_nested_entry(archive_path: &Path, outer: &str, inner: &str) -> SourceResult<Vec<u8>> {
    let mut archive = open_archive(archive_path)?;
    let mut outer_entry = archive.by_name(outer).map_err(|e| match e {
        ZipError::FileNotFound => {
            SourceError::ResourceUnavailable(format!("{}:{outer}", archive_path.display()))
        }
        other => zip_error(archive_path, other),
    })?;

    loop {
        match zip::read::read_zipfile_from_stream(&mut outer_entry) {
            Ok(Some(mut inner_entry)) => {
                if inner_entry.name() == inner {
                    debug!(entry = inner, "nested entry matched");
                    let mut bytes = Vec::with_capacity(inner_entry.size() as usize);
                    inner_entry.read_to_end(&mut bytes)?;
                    return Ok(bytes);
                }
                // Dropping the entry drains it, positioning the stream at
                // the next stored entry.
            }
            Ok(None) => {
                return Err(SourceError::EntryNotFound {
                    archive: format!("{}:{outer}", archive_path.display()),
                    entry: inner.to_owned(),
                })
            }
            Err(e) => return Err(zip_error(archive_path, e)),
        }
    }
}
