//! Semicolon-delimited exports (daily position, quotaholder movement).

use std::io::Read;
use std::path::Path;

use dempl_engine::tail::{TailSource, TailTable};

use crate::{require_file, IoError};

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let open_err = |e: std::io::Error| IoError::Open { path: path.to_path_buf(), message: e.to_string() };

    let mut file = std::fs::File::open(path).map_err(open_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(open_err)?;

    Ok(decode(bytes))
}

/// UTF-8 first; on failure, recover the buffer and fall back to Windows-1252.
pub fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// Load and split a footer-headed export.
pub fn load_tail_table(path: &Path, source: TailSource) -> Result<TailTable, IoError> {
    require_file(source.name, path)?;
    let content = read_file_as_utf8(path)?;
    let table = TailTable::parse(source, &content).map_err(|error| IoError::Tail {
        path: path.to_path_buf(),
        error,
    })?;
    log::debug!("{}: {} data row(s) in {}", source.name, table.data_rows(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dempl_engine::tail::QUOTA_COUNT_COLUMN;
    use dempl_engine::TailError;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn windows_1252_bytes_are_decoded() {
        // "AÇÃO;1" in Windows-1252
        let bytes = vec![b'A', 0xC7, 0xC3, b'O', b';', b'1'];
        assert_eq!(decode(bytes), "AÇÃO;1");
    }

    #[test]
    fn utf8_bom_is_dropped() {
        assert_eq!(decode("\u{feff}Data;NCotas".as_bytes().to_vec()), "Data;NCotas");
    }

    #[test]
    fn loads_latin1_position_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("carteira.csv");
        let mut content = b"01/03/2024;123519889,535\n".to_vec();
        content.extend_from_slice(b"Data;NCotas\n");
        content.extend_from_slice(&[b'P', b'o', b's', b'i', 0xE7, 0xE3, b'o', b'\n']);
        std::fs::write(&path, content).unwrap();

        let table = load_tail_table(&path, TailSource::DAILY_POSITION).unwrap();
        assert_eq!(table.last_value(QUOTA_COUNT_COLUMN).unwrap(), Some(dec!(123519889.535)));
    }

    #[test]
    fn missing_and_short_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movimentacao.csv");

        let err = load_tail_table(&path, TailSource::MOVEMENT).unwrap_err();
        assert!(matches!(err, IoError::MissingInputFile { role: "quotaholder movement", .. }));

        std::fs::write(&path, "Cotista;NCATOT_Tot\n").unwrap();
        let err = load_tail_table(&path, TailSource::MOVEMENT).unwrap_err();
        assert!(matches!(err, IoError::Tail { error: TailError::TooFewLines { lines: 1, .. }, .. }));
    }
}
