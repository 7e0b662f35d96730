//! Listing intake: loads scraped listings from exported files.

mod mapping;
mod parser;
mod text;

use crate::workflows::acquisition::domain::RawListing;
use std::io::Read;
use std::path::{Path, PathBuf};

/// File layouts the intake understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormat {
    Json,
    Csv,
}

impl ListingFormat {
    /// Format implied by the file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    UnsupportedFormat { path: PathBuf },
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read listing export: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid listing CSV data: {}", err),
            ListingImportError::Json(err) => write!(f, "invalid listing JSON data: {}", err),
            ListingImportError::UnsupportedFormat { path } => write!(
                f,
                "cannot tell the listing format of {}; expected a .json or .csv file",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
            ListingImportError::Json(err) => Some(err),
            ListingImportError::UnsupportedFormat { .. } => None,
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ListingImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Anything that can hand the pipeline a batch of raw listings.
pub trait ListingSource: Send + Sync {
    fn load(&self) -> Result<Vec<RawListing>, ListingImportError>;
}

/// Listings exported to a local JSON or CSV file.
#[derive(Debug, Clone)]
pub struct FileListingSource {
    path: PathBuf,
    format: ListingFormat,
}

impl FileListingSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self, ListingImportError> {
        let path = path.into();
        match ListingFormat::from_path(&path) {
            Some(format) => Ok(Self { path, format }),
            None => Err(ListingImportError::UnsupportedFormat { path }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ListingFormat {
        self.format
    }
}

impl ListingSource for FileListingSource {
    fn load(&self) -> Result<Vec<RawListing>, ListingImportError> {
        let file = std::fs::File::open(&self.path)?;
        let listings = read_listings(file, self.format)?;
        tracing::info!(
            path = %self.path.display(),
            count = listings.len(),
            "loaded raw listings"
        );
        Ok(listings)
    }
}

/// Parse raw listings from any reader in the given format.
pub fn read_listings<R: Read>(
    reader: R,
    format: ListingFormat,
) -> Result<Vec<RawListing>, ListingImportError> {
    let listings = match format {
        ListingFormat::Json => parser::parse_json(reader)?,
        ListingFormat::Csv => parser::parse_csv(reader)?,
    };
    Ok(listings)
}
