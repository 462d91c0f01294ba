//! Process-wide dataset.
//!
//! The dataset is loaded exactly once, before any view is built, and is
//! never replaced. Every caller afterwards borrows the same `&'static`
//! value, so readers need no locking.

use std::sync::OnceLock;

use fleet_core::error::{ReportError, Result};
use fleet_data::analysis::{load_dataset, Dataset, LoadOptions};

static DATASET: OnceLock<Dataset> = OnceLock::new();

/// Install `loaded` as the process-wide record set.
///
/// Fails with [`ReportError::AlreadyLoaded`] on any call after the first.
pub fn init(loaded: Dataset) -> Result<&'static Dataset> {
    DATASET
        .set(loaded)
        .map_err(|_| ReportError::AlreadyLoaded)?;
    tracing::debug!("process-wide dataset initialised");
    dataset()
}

/// Run the load pipeline and install the result. Fails without touching
/// the source when a dataset is already installed.
pub fn load(options: &LoadOptions) -> Result<&'static Dataset> {
    if is_loaded() {
        return Err(ReportError::AlreadyLoaded);
    }
    init(load_dataset(options)?)
}

/// The installed dataset, or [`ReportError::NotLoaded`].
pub fn dataset() -> Result<&'static Dataset> {
    DATASET.get().ok_or(ReportError::NotLoaded)
}

pub fn is_loaded() -> bool {
    DATASET.get().is_some()
}
