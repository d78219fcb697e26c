use super::ClassHeader;
use crate::hierarchy::{MetadataSource, TypeEdge};
use crate::jvm::{BinaryName, SourceError};
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Directories and jars of compiled classes, searched in order
///
/// Class `a/b/C` is read from `a/b/C.class` under the first root that has it. Roots ending in
/// `.jar` or `.zip` are archives, everything else is a directory. Only the header of the class
/// file is parsed.
///
/// Archives are reopened on every read, so this is best used behind an
/// [`EdgeCache`](crate::hierarchy::EdgeCache).
#[derive(Debug, Clone, Default)]
pub struct ClassPath {
    roots: Vec<PathBuf>,
}

impl ClassPath {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> ClassPath {
        ClassPath {
            roots: roots.into_iter().collect(),
        }
    }

    /// Add a directory or jar to the end of the class path
    pub fn push(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn is_archive(root: &Path) -> bool {
        match root.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"),
            None => false,
        }
    }

    fn read_from(&self, root: &Path, name: &BinaryName) -> Result<Option<TypeEdge>, SourceError> {
        let entry = format!("{}.class", name);
        let bytes = if ClassPath::is_archive(root) {
            ClassPath::read_from_archive(root, &entry, name)?
        } else {
            ClassPath::read_from_directory(root, &entry)?
        };
        let bytes = match bytes {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        log::debug!("Reading '{}' from '{}'", name, root.display());

        let header = ClassHeader::parse(&bytes).map_err(|err| {
            SourceError::malformed(name, format!("{} in {}: {}", entry, root.display(), err))
        })?;
        if &header.this_class != name {
            return Err(SourceError::malformed(
                name,
                format!(
                    "{} in {} declares class '{}'",
                    entry,
                    root.display(),
                    header.this_class
                ),
            ));
        }
        Ok(Some(header.type_edge()))
    }

    fn read_from_directory(root: &Path, entry: &str) -> Result<Option<Vec<u8>>, SourceError> {
        match fs::read(root.join(entry)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SourceError::IoError(err)),
        }
    }

    fn read_from_archive(
        root: &Path,
        entry: &str,
        name: &BinaryName,
    ) -> Result<Option<Vec<u8>>, SourceError> {
        let file = match File::open(root) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SourceError::IoError(err)),
        };
        let zip_error = |err: ZipError| match err {
            ZipError::Io(err) => SourceError::IoError(err),
            other => SourceError::malformed(name, format!("{}: {}", root.display(), other)),
        };

        let mut archive = ZipArchive::new(file).map_err(zip_error)?;
        let mut file = match archive.by_name(entry) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(zip_error(err)),
        };
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

impl MetadataSource for ClassPath {
    fn read_type_edge(&self, name: &BinaryName) -> Result<TypeEdge, SourceError> {
        for root in &self.roots {
            if let Some(edge) = self.read_from(root, name)? {
                return Ok(edge);
            }
        }
        Err(SourceError::NotFound(name.clone()))
    }
}
