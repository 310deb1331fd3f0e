use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{EngineError, ResultEngine, codec::Grid};

use super::{SheetStore, ValueInput};

const EXTENSION: &str = "csv";

/// Spreadsheet stored as a directory of CSV files, one `<title>.csv` per tab.
///
/// Cell text is stored verbatim, so [`ValueInput`] has no effect here.
#[derive(Debug, Clone)]
pub struct CsvDirStore {
    root: PathBuf,
}

impl CsvDirStore {
    /// Opens (and creates if needed) the directory.
    pub fn open(root: impl AsRef<Path>) -> ResultEngine<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tab_path(&self, title: &str) -> ResultEngine<PathBuf> {
        if title.is_empty()
            || title.starts_with('.')
            || title.contains(['/', '\\'])
            || title.chars().any(char::is_control)
        {
            return Err(EngineError::InvalidName(format!(
                "\"{title}\" cannot be used as a file name"
            )));
        }
        Ok(self.root.join(format!("{title}.{EXTENSION}")))
    }

    fn existing_tab_path(&self, title: &str) -> ResultEngine<PathBuf> {
        let path = self.tab_path(title)?;
        if !path.is_file() {
            return Err(EngineError::ListNotFound(title.to_string()));
        }
        Ok(path)
    }
}

impl SheetStore for CsvDirStore {
    async fn tab_titles(&self) -> ResultEngine<Vec<String>> {
        let mut titles = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                titles.push(stem.to_string());
            }
        }
        titles.sort();
        Ok(titles)
    }

    async fn add_tab(&self, title: &str) -> ResultEngine<()> {
        let path = self.tab_path(title)?;
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(EngineError::Storage(
                format!("a tab named \"{title}\" already exists"),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_tab(&self, title: &str) -> ResultEngine<()> {
        let path = self.tab_path(title)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(EngineError::ListNotFound(title.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn read_tab(&self, title: &str) -> ResultEngine<Grid> {
        let path = self.existing_tab_path(title)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        let mut grid = Grid::new();
        for record in reader.records() {
            let record = record?;
            grid.push(record.iter().map(ToString::to_string).collect());
        }
        Ok(grid)
    }

    async fn write_tab(&self, title: &str, grid: &Grid, _input: ValueInput) -> ResultEngine<()> {
        let path = self.existing_tab_path(title)?;
        let staging = path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(&staging)?;
            for row in grid {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_sheets")
            .join(uuid::Uuid::new_v4().to_string())
    }

    #[tokio::test]
    async fn tabs_are_files() {
        let store = CsvDirStore::open(temp_root()).unwrap();
        store.add_tab("Lista 2024-06-01").await.unwrap();
        assert!(store.root().join("Lista 2024-06-01.csv").is_file());
        assert_eq!(
            store.tab_titles().await.unwrap(),
            vec!["Lista 2024-06-01".to_string()]
        );
        assert!(store.add_tab("Lista 2024-06-01").await.is_err());

        store.delete_tab("Lista 2024-06-01").await.unwrap();
        assert!(store.tab_titles().await.unwrap().is_empty());
        assert_eq!(
            store.delete_tab("Lista 2024-06-01").await,
            Err(EngineError::ListNotFound("Lista 2024-06-01".to_string()))
        );
    }

    #[tokio::test]
    async fn grid_survives_commas_and_quotes() {
        let store = CsvDirStore::open(temp_root()).unwrap();
        store.add_tab("Lista").await.unwrap();
        assert!(store.read_tab("Lista").await.unwrap().is_empty());

        let grid = vec![
            vec!["name".to_string(), "price".to_string()],
            vec!["Queso \"fresco\"".to_string(), "12,5".to_string()],
            vec!["Pan".to_string()],
        ];
        store
            .write_tab("Lista", &grid, ValueInput::UserEntered)
            .await
            .unwrap();
        assert_eq!(store.read_tab("Lista").await.unwrap(), grid);
    }

    #[tokio::test]
    async fn path_like_titles_are_rejected() {
        let store = CsvDirStore::open(temp_root()).unwrap();
        assert!(matches!(
            store.add_tab("../escape").await,
            Err(EngineError::InvalidName(_))
        ));
        assert!(matches!(
            store.write_tab("missing", &Grid::new(), ValueInput::Raw).await,
            Err(EngineError::ListNotFound(_))
        ));
    }
}
