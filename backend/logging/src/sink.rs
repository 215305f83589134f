//! Swappable file writer for `tracing_subscriber::fmt`.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing_subscriber::fmt::MakeWriter;

/// Hands out writers to the current log file. `swap` retargets every clone.
#[derive(Clone)]
pub struct FileSink {
    current: Arc<ArcSwap<File>>,
}

impl FileSink {
    pub fn new(file: File) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(file)),
        }
    }

    /// Replace the destination. Writers already handed out finish on the old file.
    pub fn swap(&self, file: File) {
        self.current.store(Arc::new(file));
    }
}

pub struct SinkWriter(Arc<File>);

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.0).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self.0).flush()
    }
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter(self.current.load_full())
    }
}
