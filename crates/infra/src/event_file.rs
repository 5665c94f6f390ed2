//! File-backed event log: one handle, fixed-width rows, append only.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use causaldb_core::{codec, Event, EventId, ROW_SIZE};

use crate::error::StoreError;
use crate::event_log::EventLog;

/// Append-only binary event file.
///
/// The file is a bare sequence of `ROW_SIZE`-byte rows: no header, no checksum.
/// Reads and appends share the one handle opened by [`EventFile::open`].
#[derive(Debug)]
pub struct EventFile {
    path: PathBuf,
    file: File,
    sync_on_write: bool,
}

impl EventFile {
    /// Open `path` for reading and appending, creating it if absent.
    ///
    /// A torn trailing row (file length not a multiple of `ROW_SIZE`) is cut off so
    /// later appends stay row-aligned.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|e| StoreError::io("open", &path, e))?;

        let len = file
            .metadata()
            .map_err(|e| StoreError::io("stat", &path, e))?
            .len();

        let torn = len % ROW_SIZE as u64;
        if torn != 0 {
            warn!(len, torn, "truncating partial trailing row");
            file.set_len(len - torn)
                .map_err(|e| StoreError::io("truncate", &path, e))?;
        }

        info!(rows = len / ROW_SIZE as u64, "event file opened");

        Ok(Self {
            path,
            file,
            sync_on_write: true,
        })
    }

    /// Toggle the `sync_data` call after each append (on by default).
    pub fn with_sync_on_write(mut self, sync_on_write: bool) -> Self {
        self.sync_on_write = sync_on_write;
        self
    }

    /// Visit rows from the start of the file until `visit` breaks or the file ends.
    ///
    /// Corrupt rows are logged and skipped; a short read at the end is ignored.
    fn scan_rows<F>(&mut self, mut visit: F) -> Result<(), StoreError>
    where
        F: FnMut(Event) -> ControlFlow<()>,
    {
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(|e| StoreError::io("seek", &self.path, e))?;

        let mut reader = BufReader::new(&mut self.file);
        let mut buf = [0u8; ROW_SIZE];
        let mut row_index: u64 = 0;

        loop {
            let filled = read_row(&mut reader, &mut buf)
                .map_err(|e| StoreError::io("read", &self.path, e))?;

            if filled == 0 {
                break;
            }
            if filled < ROW_SIZE {
                warn!(row_index, bytes = filled, "ignoring truncated row at end of file");
                break;
            }

            match codec::decode(&buf) {
                Ok(event) => {
                    if visit(event).is_break() {
                        break;
                    }
                }
                Err(err) => warn!(row_index, error = %err, "skipping corrupt row"),
            }
            row_index += 1;
        }

        Ok(())
    }
}

/// Fill `buf` as far as the reader allows; returns the number of bytes read.
fn read_row(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

impl EventLog for EventFile {
    #[instrument(skip_all, fields(id = %event.id()))]
    fn append(&mut self, event: &Event) -> Result<(), StoreError> {
        let row = codec::encode(event);

        self.file
            .write_all(&row)
            .map_err(|e| StoreError::io("append to", &self.path, e))?;

        if self.sync_on_write {
            self.file
                .sync_data()
                .map_err(|e| StoreError::io("sync", &self.path, e))?;
        }

        debug!("appended row");
        Ok(())
    }

    fn find_by_id(&mut self, id: EventId) -> Result<Option<Event>, StoreError> {
        let mut found = None;
        self.scan_rows(|event| {
            if event.id() == id {
                found = Some(event);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(found)
    }

    fn scan(&mut self) -> Result<Vec<Event>, StoreError> {
        let mut events = Vec::new();
        self.scan_rows(|event| {
            events.push(event);
            ControlFlow::Continue(())
        })?;
        Ok(events)
    }

    fn row_count(&mut self) -> Result<u64, StoreError> {
        let len = self
            .file
            .metadata()
            .map_err(|e| StoreError::io("stat", &self.path, e))?
            .len();
        Ok(len / ROW_SIZE as u64)
    }

    fn close(mut self) -> Result<(), StoreError> {
        self.file
            .flush()
            .and_then(|()| self.file.sync_all())
            .map_err(|e| StoreError::io("close", &self.path, e))?;
        info!(path = %self.path.display(), "event file closed");
        Ok(())
    }
}
