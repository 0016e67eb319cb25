//! Where the sounding files come from.
//!
//! The station archive keeps one corrected file (`.cor`) per launch, named after the launch day
//! and time, e.g. `DD2024010100.cor`. A day can have more than one launch, in which case the
//! file that sorts last (the latest launch) is used.
use crate::{
    calendar::CalendarDate,
    error::{ClimoError, Result},
    parse::parse_record,
    report::LaunchReport,
    sounding::Profile,
};
use log::{debug, info};
use std::{
    collections::{HashMap, HashSet},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// The raw text of a record and the name it was found under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordText {
    /// File name, or any label for in memory sources.
    pub name: String,
    /// Contents.
    pub text: String,
}

/// Something that can look up the sounding of a day.
pub trait RecordSource {
    /// Find the record for a day, `Ok(None)` when there isn't one.
    fn fetch(&self, date: CalendarDate) -> Result<Option<RecordText>>;
}

/// Load and parse the sounding of a day.
///
/// A day without a record is not an error, it gives `Profile::Missing`. A record that exists but
/// does not parse is an error.
pub fn load_profile<S: RecordSource + ?Sized>(source: &S, date: CalendarDate) -> Result<Profile> {
    match source.fetch(date)? {
        Some(RecordText { name, text }) => {
            debug!("parsing {} for {}", name, date);
            parse_record(date, &name, &text).map(Profile::Present)
        }
        None => {
            info!("{}", ClimoError::SourceNotFound(date));
            Ok(Profile::Missing)
        }
    }
}

/// A directory of sounding files.
#[derive(Clone, Debug)]
pub struct ArchiveDir {
    root: PathBuf,
    per_year_subdirs: bool,
    extension: String,
    excluded: HashSet<String>,
}

impl ArchiveDir {
    /// Extension of corrected sounding files.
    pub const COR_EXTENSION: &'static str = ".cor";

    /// Look for files directly in `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        ArchiveDir {
            root: root.as_ref().to_path_buf(),
            per_year_subdirs: false,
            extension: Self::COR_EXTENSION.to_owned(),
            excluded: HashSet::new(),
        }
    }

    /// Look for files in `root/yyyy/` instead of `root`.
    pub fn with_per_year_subdirs(mut self, per_year: bool) -> Self {
        self.per_year_subdirs = per_year;
        self
    }

    /// Match a different extension.
    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    /// Never use these file names, e.g. known bad launches.
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    /// The directory holding the files of a day.
    pub fn directory(&self, date: CalendarDate) -> PathBuf {
        if self.per_year_subdirs {
            self.root.join(format!("{:04}", date.year()))
        } else {
            self.root.clone()
        }
    }

    /// Name of the file to use for a day, if any.
    pub fn find(&self, date: CalendarDate) -> Result<Option<String>> {
        let dir = self.directory(date);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("archive directory {} does not exist", dir.display());
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let radical = date.file_radical();
        let mut names = vec![];
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.contains(&radical)
                && name.contains(&self.extension)
                && !self.excluded.contains(&name)
            {
                names.push(name);
            }
        }

        names.sort();
        Ok(names.pop())
    }

    /// Read the launch report (`.ref`) of a day, `Ok(None)` if it does not exist.
    pub fn fetch_report(&self, date: CalendarDate) -> Result<Option<LaunchReport>> {
        let name = format!("{}00_1.ref", date.file_radical());
        let path = self.directory(date).join(&name);

        match read_latin1(&path) {
            Ok(text) => LaunchReport::parse(&name, &text).map(Some),
            Err(ClimoError::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl RecordSource for ArchiveDir {
    fn fetch(&self, date: CalendarDate) -> Result<Option<RecordText>> {
        match self.find(date)? {
            Some(name) => {
                let text = read_latin1(&self.directory(date).join(&name))?;
                Ok(Some(RecordText { name, text }))
            }
            None => Ok(None),
        }
    }
}

/// Read a file encoded in Latin-1, every byte is one character.
pub(crate) fn read_latin1(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(bytes.into_iter().map(char::from).collect())
}

/// Records held in memory, keyed by day.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    records: HashMap<CalendarDate, RecordText>,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the record of a day.
    pub fn insert<N, T>(&mut self, date: CalendarDate, name: N, text: T)
    where
        N: Into<String>,
        T: Into<String>,
    {
        self.records.insert(
            date,
            RecordText {
                name: name.into(),
                text: text.into(),
            },
        );
    }

    /// Builder form of `insert`.
    pub fn with_record<N, T>(mut self, date: CalendarDate, name: N, text: T) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        self.insert(date, name, text);
        self
    }
}

impl RecordSource for InMemorySource {
    fn fetch(&self, date: CalendarDate) -> Result<Option<RecordText>> {
        Ok(self.records.get(&date).cloned())
    }
}
