// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Line sources: stdin, a capture file, or the device's serial console.

use std::io::BufRead;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::info;

use sharkos_core::DynResult;

use crate::config::{InputConfig, InputSource};

const RESET_PULSE: Duration = Duration::from_millis(100);
const LINE_CHANNEL_BUFFER: usize = 64;

type RawLine = std::io::Result<Vec<u8>>;

/// Where raw lines come from.
///
/// Blocking readers (stdin) run on their own detached thread and hand lines
/// over a channel, so dropping the source never waits on a pending read.
pub enum LineSource {
    Async(BufReader<Box<dyn AsyncRead + Unpin + Send>>),
    Thread(mpsc::Receiver<RawLine>),
}

impl LineSource {
    pub fn from_async<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        LineSource::Async(BufReader::new(Box::new(reader)))
    }

    pub fn from_blocking<R>(name: &str, mut reader: R) -> std::io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(LINE_CHANNEL_BUFFER);
        std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || loop {
                let mut buf = Vec::new();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.blocking_send(Ok(buf)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.blocking_send(Err(e));
                        break;
                    }
                }
            })?;
        Ok(LineSource::Thread(rx))
    }

    /// Next raw line including its terminator, `None` at end of input.
    async fn next_raw(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        match self {
            LineSource::Async(reader) => {
                let mut buf = Vec::new();
                if reader.read_until(b'\n', &mut buf).await? == 0 {
                    return Ok(None);
                }
                Ok(Some(buf))
            }
            LineSource::Thread(rx) => rx.recv().await.transpose(),
        }
    }
}

pub async fn open(input: &InputConfig) -> DynResult<LineSource> {
    match input.source {
        InputSource::Stdin => {
            info!("Reading telemetry from stdin");
            let stdin = std::io::BufReader::new(std::io::stdin());
            Ok(LineSource::from_blocking("stdin-reader", stdin)?)
        }
        InputSource::File => {
            let path = input.path.as_deref().ok_or("file input requires a path")?;
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|e| format!("open '{}': {}", path, e))?;
            info!("Reading telemetry from {}", path);
            Ok(LineSource::from_async(file))
        }
        InputSource::Serial => {
            let port = input.port.as_deref().ok_or("serial input requires a port")?;
            let stream = open_serial(port, input.baud, input.reset_on_open).await?;
            Ok(LineSource::from_async(stream))
        }
    }
}

async fn open_serial(path: &str, baud: u32, reset: bool) -> DynResult<SerialStream> {
    let mut port = tokio_serial::new(path, baud).open_native_async()?;
    info!("Listening on {} @ {} baud", path, baud);
    if reset {
        pulse_reset(&mut port).await?;
    }
    Ok(port)
}

/// Drop DTR/RTS, raise them, then drop them again. Boards whose EN/BOOT
/// lines follow DTR/RTS restart their firmware on this sequence.
async fn pulse_reset(port: &mut SerialStream) -> DynResult<()> {
    port.write_data_terminal_ready(false)?;
    port.write_request_to_send(false)?;
    tokio::time::sleep(RESET_PULSE).await;
    port.write_data_terminal_ready(true)?;
    port.write_request_to_send(true)?;
    tokio::time::sleep(RESET_PULSE).await;
    port.write_data_terminal_ready(false)?;
    port.write_request_to_send(false)?;
    Ok(())
}

/// Call `on_line` for every line of `source`.
/// Invalid UTF-8 is replaced, trailing `\r\n` stripped. Returns the number
/// of lines read.
pub async fn for_each_line<F>(mut source: LineSource, mut on_line: F) -> std::io::Result<u64>
where
    F: FnMut(&str),
{
    let mut count = 0;
    while let Some(buf) = source.next_raw().await? {
        count += 1;
        let line = String::from_utf8_lossy(&buf);
        on_line(line.trim_end_matches(['\r', '\n']));
    }
    Ok(count)
}
