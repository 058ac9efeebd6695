//! Line-oriented terminal I/O over any async reader and writer.
//!
//! Stdin/stdout in the binary; byte slices and `Vec<u8>` in tests.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub struct Terminal<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print `prompt` and read one line, trimmed. `None` at end of input.
    pub async fn ask(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        self.writer.write_all(prompt.as_bytes()).await?;
        self.writer.flush().await?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            self.writer.write_all(b"\n").await?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Print `text` followed by a newline.
    pub async fn say(&mut self, text: impl AsRef<str>) -> std::io::Result<()> {
        self.writer.write_all(text.as_ref().as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    pub async fn clear(&mut self) -> std::io::Result<()> {
        self.writer.write_all(b"\x1b[H\x1b[2J").await?;
        self.writer.flush().await
    }
}
