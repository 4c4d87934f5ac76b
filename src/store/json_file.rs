// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON file position store.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

use super::{PositionStore, StoreKey};

/// Document stored for one covering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CoveringDocument {
    values: BTreeMap<String, u8>,
    updated_at: Option<DateTime<Utc>>,
}

/// [`PositionStore`] writing one JSON document per covering namespace.
///
/// Documents live in `<dir>/<namespace>.json` and are cached after the
/// first read; every write goes through to disk.
///
/// # Examples
///
/// ```no_run
/// use covermotion::store::{JsonFileStore, PositionStore, StoreKey};
///
/// let store = JsonFileStore::new("/var/lib/covermotion");
/// store.set("living-room", StoreKey::CurrentPosition, 35)?;
/// # Ok::<(), covermotion::error::StoreError>(())
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    cache: Mutex<HashMap<String, CoveringDocument>>,
}

impl JsonFileStore {
    /// Creates a store rooted at `dir`.
    ///
    /// The directory is created on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }

    fn load_document(&self, namespace: &str) -> Result<CoveringDocument, StoreError> {
        let path = self.document_path(namespace);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let document = serde_json::from_str(&contents)?;
                tracing::debug!(path = %path.display(), "Loaded covering document");
                Ok(document)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(CoveringDocument::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PositionStore for JsonFileStore {
    fn read(&self, namespace: &str, key: StoreKey) -> Result<Option<u8>, StoreError> {
        let mut cache = self.cache.lock();
        if !cache.contains_key(namespace) {
            let document = self.load_document(namespace)?;
            cache.insert(namespace.to_string(), document);
        }
        Ok(cache
            .get(namespace)
            .and_then(|doc| doc.values.get(key.as_str()).copied()))
    }

    fn set(&self, namespace: &str, key: StoreKey, value: u8) -> Result<(), StoreError> {
        let mut cache = self.cache.lock();
        let mut document = match cache.get(namespace) {
            Some(doc) => doc.clone(),
            None => self.load_document(namespace)?,
        };
        document.values.insert(key.as_str().to_string(), value);
        document.updated_at = Some(Utc::now());

        fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(&document)?;
        fs::write(self.document_path(namespace), contents)?;

        // Only cache what reached the disk
        cache.insert(namespace.to_string(), document);
        Ok(())
    }
}
