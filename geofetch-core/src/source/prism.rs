use std::{fmt, fs, path::PathBuf};

use tracing::debug;

use crate::{
    error::{FetchError, ProcessError, SaveError},
    model::{Coordinate, OutputLocation},
};

use super::{DataSource, SourceId};

const RAW_MARKER: &str = "PRISM data";
const PROCESSED_MARKER: &str = "Processed PRISM data";

/// Placeholder PRISM climate source. Produces fixed marker payloads instead of
/// downloading grids, but keeps the on-disk naming and content of real runs.
#[derive(Debug, Clone)]
pub struct PrismSource {
    coordinate: Coordinate,
}

impl PrismSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrismRaw {
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrismProcessed {
    pub processed: String,
}

impl fmt::Display for PrismRaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{'raw': '{}'}}", self.raw)
    }
}

// Existing output files hold exactly this text.
impl fmt::Display for PrismProcessed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{'processed': '{}'}}", self.processed)
    }
}

impl DataSource for PrismSource {
    type Raw = PrismRaw;
    type Processed = PrismProcessed;

    fn id(&self) -> SourceId {
        SourceId::Prism
    }

    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    fn fetch(&self) -> Result<PrismRaw, FetchError> {
        debug!(coordinate = %self.coordinate, "Fetching PRISM data");
        Ok(PrismRaw { raw: RAW_MARKER.to_string() })
    }

    fn process(&self, raw: PrismRaw) -> Result<PrismProcessed, ProcessError> {
        debug!(%raw, "Processing PRISM data");

        if raw.raw != RAW_MARKER {
            return Err(ProcessError::Malformed(format!(
                "expected PRISM raw marker, got {raw}"
            )));
        }

        Ok(PrismProcessed { processed: PROCESSED_MARKER.to_string() })
    }

    fn save(&self, processed: PrismProcessed, output: &OutputLocation) -> Result<PathBuf, SaveError> {
        debug!(%output, "Saving PRISM data");

        fs::create_dir_all(output.dir())
            .map_err(|io| SaveError::CreateDir { path: output.dir().to_path_buf(), io })?;

        let path = output.file_for(SourceId::Prism, &self.coordinate, "txt");
        fs::write(&path, processed.to_string())
            .map_err(|io| SaveError::Write { path: path.clone(), io })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::SourceError, source::run};

    fn prism() -> PrismSource {
        PrismSource::new(Coordinate::new(40.0, -105.0))
    }

    #[test]
    fn processed_marker_renders_like_existing_outputs() {
        let processed = prism().process(prism().fetch().unwrap()).unwrap();
        assert_eq!(processed.to_string(), "{'processed': 'Processed PRISM data'}");
    }

    #[test]
    fn process_rejects_foreign_raw_payload() {
        let err = prism()
            .process(PrismRaw { raw: "SSURGO data".into() })
            .unwrap_err();
        assert!(err.to_string().contains("malformed raw payload"));
    }

    #[test]
    fn run_writes_single_named_file() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputLocation::new(tmp.path().join("out"));

        let path = run(&prism(), &out).expect("prism run should succeed");

        assert_eq!(path, tmp.path().join("out").join("prism_data_40.0_-105.0.txt"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{'processed': 'Processed PRISM data'}"
        );

        let entries: Vec<_> = fs::read_dir(out.dir()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn rerun_overwrites_with_identical_content() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputLocation::new(tmp.path());

        let first = run(&prism(), &out).unwrap();
        let first_content = fs::read_to_string(&first).unwrap();
        let second = run(&prism(), &out).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second).unwrap(), first_content);
    }

    #[test]
    fn existing_directory_and_unrelated_files_are_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let unrelated = tmp.path().join("notes.txt");
        fs::write(&unrelated, "keep me").unwrap();

        run(&prism(), &OutputLocation::new(tmp.path())).expect("existing dir is fine");

        assert_eq!(fs::read_to_string(&unrelated).unwrap(), "keep me");
    }

    #[test]
    fn unwritable_output_reports_save_stage() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let err = run(&prism(), &OutputLocation::new(blocker.join("out"))).unwrap_err();

        assert!(matches!(err, SourceError::Save { id: SourceId::Prism, .. }));
    }
}
