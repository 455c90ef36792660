use tokio::{
    fs::File,
    io::{self, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncRead, AsyncWriteExt},
};

/// Reads the whole file regardless of current cursor position.
pub async fn read_from_start(
    file: &mut (impl AsyncSeek + AsyncRead + Unpin),
) -> Result<String, io::Error> {
    file.rewind().await?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).await?;
    Ok(contents)
}

/// Replaces file contents with `data`. The file has to be opened for writing.
pub async fn overwrite(file: &mut File, data: &[u8]) -> Result<(), io::Error> {
    file.rewind().await?;
    file.set_len(0).await?;
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_data().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;

    use tempfile::tempfile;
    use tokio::io::AsyncSeekExt;

    use crate::fs::operations::{overwrite, read_from_start};

    #[tokio::test]
    async fn test_read_from_start_after_seek() -> Result<()> {
        let mut file = tempfile()?;
        file.write_all(b"{\"a\": 1}")?;

        let mut file = tokio::fs::File::from_std(file);
        file.seek(std::io::SeekFrom::End(0)).await?;

        assert_eq!(read_from_start(&mut file).await?, "{\"a\": 1}");
        Ok(())
    }

    #[tokio::test]
    async fn test_overwrite_shorter_contents() -> Result<()> {
        let mut file = tempfile()?;
        file.write_all(b"a rather long line of text")?;

        let mut file = tokio::fs::File::from_std(file);
        overwrite(&mut file, b"short").await?;

        assert_eq!(read_from_start(&mut file).await?, "short");
        Ok(())
    }

    #[tokio::test]
    async fn test_read_empty() -> Result<()> {
        let mut file = tokio::fs::File::from_std(tempfile()?);
        assert_eq!(read_from_start(&mut file).await?, "");
        Ok(())
    }
}
