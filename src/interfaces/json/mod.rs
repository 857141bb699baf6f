//! JSON boundary between the host's documents and the typed model.

use crate::domain::cart::FunctionInput;
use crate::domain::operations::RunResult;
use crate::error::Result;
use std::io::{Read, Write};

/// Reads one function input document from any `Read` source (file, stdin,
/// byte slice).
pub struct InputReader<R: Read> {
    source: R,
}

impl<R: Read> InputReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<FunctionInput> {
        Ok(serde_json::from_reader(self.source)?)
    }
}

/// Writes a result document to any `Write` sink, one document per call,
/// newline-terminated.
pub struct ResultWriter<W: Write> {
    sink: W,
    pretty: bool,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            pretty: false,
        }
    }

    pub fn pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }

    pub fn write(&mut self, result: &RunResult) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.sink, result)?;
        } else {
            serde_json::to_writer(&mut self.sink, result)?;
        }
        self.sink.write_all(b"\n")?;
        Ok(())
    }
}
