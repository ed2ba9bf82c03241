use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use crate::errors::Error;

use super::Storage;

/// Directory-backed store used for the persistent scope: one `<key>.json` file per key.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, Error> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(Error::Storage(format!("invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&staging, value)?;
        std::fs::rename(&staging, &path)?;
        debug!(path = %path.display(), "storage.write");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_support::temp_dir;

    #[test]
    fn values_survive_a_new_handle() {
        let dir = temp_dir("file-storage");
        FileStorage::new(dir.path()).set("access_token", "{}").unwrap();

        let reopened = FileStorage::new(dir.path());
        assert_eq!(reopened.get("access_token").unwrap().as_deref(), Some("{}"));
        reopened.remove("access_token").unwrap();
        reopened.remove("access_token").unwrap();
        assert_eq!(reopened.get("access_token").unwrap(), None);
    }

    #[test]
    fn missing_directory_reads_as_absent() {
        let dir = temp_dir("file-storage-missing");
        let storage = FileStorage::new(dir.path().join("nested"));
        assert_eq!(storage.get("access_token").unwrap(), None);
    }

    #[test]
    fn write_leaves_no_staging_file_behind() {
        let dir = temp_dir("file-storage-staging");
        let storage = FileStorage::new(dir.path());
        storage.set("access_token", "first").unwrap();
        storage.set("access_token", "second").unwrap();

        assert_eq!(storage.get("access_token").unwrap().as_deref(), Some("second"));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["access_token.json".to_string()]);
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = temp_dir("file-storage-keys");
        let storage = FileStorage::new(dir.path());
        match storage.set("../escape", "x") {
            Err(Error::Storage(msg)) => assert!(msg.contains("invalid storage key")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
