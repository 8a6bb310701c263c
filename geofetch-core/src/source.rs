use crate::{
    error::{FetchError, ProcessError, SaveError, SourceError, Stage},
    model::{Coordinate, OutputLocation},
    source::prism::PrismSource,
};
use std::{
    convert::TryFrom,
    fmt::{Debug, Display},
    path::PathBuf,
};
use tracing::{debug, info};

pub mod prism;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Prism,
    Ssurgo,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Prism => "prism",
            SourceId::Ssurgo => "ssurgo",
        }
    }

    /// Every registered identifier, in registration order.
    pub const fn all() -> &'static [SourceId] {
        &[SourceId::Prism, SourceId::Ssurgo]
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self, SourceId::Prism)
    }

    pub fn implemented() -> impl Iterator<Item = SourceId> {
        Self::all().iter().copied().filter(SourceId::is_implemented)
    }

    /// Comma-separated list of registered names, for messages.
    pub fn names() -> String {
        Self::all().iter().map(SourceId::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceId {
    type Error = SourceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "prism" => Ok(SourceId::Prism),
            "ssurgo" => Ok(SourceId::Ssurgo),
            _ => Err(SourceError::Unsupported(value.to_string())),
        }
    }
}

/// Three-stage capability set every dataset variant provides.
///
/// Each variant picks its own raw and processed shapes; the only requirement on the
/// processed payload is that it renders to text for the plain-text writer.
pub trait DataSource: Debug {
    type Raw: Debug;
    type Processed: Display;

    fn id(&self) -> SourceId;

    fn coordinate(&self) -> Coordinate;

    fn fetch(&self) -> Result<Self::Raw, FetchError>;

    fn process(&self, raw: Self::Raw) -> Result<Self::Processed, ProcessError>;

    /// Persist into `output`, creating the directory if needed. Returns the path written.
    fn save(
        &self,
        processed: Self::Processed,
        output: &OutputLocation,
    ) -> Result<PathBuf, SaveError>;
}

/// Type-erased view of a source, so heterogeneous variants can share one list.
pub trait Pipeline: Debug {
    fn id(&self) -> SourceId;

    fn coordinate(&self) -> Coordinate;

    fn run(&self, output: &OutputLocation) -> Result<PathBuf, SourceError>;
}

impl<S: DataSource> Pipeline for S {
    fn id(&self) -> SourceId {
        DataSource::id(self)
    }

    fn coordinate(&self) -> Coordinate {
        DataSource::coordinate(self)
    }

    fn run(&self, output: &OutputLocation) -> Result<PathBuf, SourceError> {
        run(self, output)
    }
}

/// Fetch, process, then save. A failing stage stops the pipeline and is returned
/// tagged with the source, coordinate and stage.
pub fn run<S: DataSource>(source: &S, output: &OutputLocation) -> Result<PathBuf, SourceError> {
    let id = DataSource::id(source);
    let coordinate = DataSource::coordinate(source);

    info!(
        source = %id,
        lat = coordinate.latitude,
        long = coordinate.longitude,
        output = %output,
        "Running fetch/process/save"
    );

    debug!(source = %id, stage = %Stage::Fetch, "stage started");
    let raw = source
        .fetch()
        .map_err(|cause| SourceError::Fetch { id, coordinate, cause })?;

    debug!(source = %id, stage = %Stage::Process, ?raw, "stage started");
    let processed = source
        .process(raw)
        .map_err(|cause| SourceError::Process { id, coordinate, cause })?;

    debug!(source = %id, stage = %Stage::Save, "stage started");
    let path = source
        .save(processed, output)
        .map_err(|cause| SourceError::Save { id, coordinate, cause })?;

    info!(source = %id, path = %path.display(), "Saved");

    Ok(path)
}

/// Construct a source for `id` at `coordinate`.
pub fn source_from_id(
    id: SourceId,
    coordinate: Coordinate,
) -> Result<Box<dyn Pipeline>, SourceError> {
    let boxed: Box<dyn Pipeline> = match id {
        SourceId::Prism => Box::new(PrismSource::new(coordinate)),
        SourceId::Ssurgo => return Err(SourceError::NotImplemented(id)),
    };

    Ok(boxed)
}

/// Resolve a user-supplied name straight to a runnable source.
pub fn source_from_name(
    name: &str,
    coordinate: Coordinate,
) -> Result<Box<dyn Pipeline>, SourceError> {
    let id = SourceId::try_from(name)?;
    source_from_id(id, coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn source_id_as_str_roundtrip() {
        for id in SourceId::all() {
            let parsed = SourceId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn source_id_parsing_ignores_case() {
        assert_eq!(SourceId::try_from("PRISM").unwrap(), SourceId::Prism);
        assert_eq!(SourceId::try_from("Ssurgo").unwrap(), SourceId::Ssurgo);
    }

    #[test]
    fn unknown_source_error() {
        let err = SourceId::try_from("doesnotexist").unwrap_err();
        assert!(matches!(err, SourceError::Unsupported(ref name) if name == "doesnotexist"));
    }

    #[test]
    fn only_prism_is_implemented() {
        let implemented: Vec<_> = SourceId::implemented().collect();
        assert_eq!(implemented, vec![SourceId::Prism]);
    }

    #[test]
    fn every_implemented_source_builds() {
        for id in SourceId::implemented() {
            let source = source_from_id(id, Coordinate::new(1.0, 2.0))
                .unwrap_or_else(|err| panic!("{id} is marked implemented but failed: {err}"));
            assert_eq!(source.id(), id);
        }
    }

    #[test]
    fn ssurgo_is_not_implemented() {
        let err = source_from_id(SourceId::Ssurgo, Coordinate::new(1.0, 2.0)).unwrap_err();
        assert!(matches!(err, SourceError::NotImplemented(SourceId::Ssurgo)));
    }

    #[test]
    fn source_from_name_builds_prism() {
        let coordinate = Coordinate::new(40.0, -105.0);
        let source = source_from_name("prism", coordinate).expect("prism is implemented");
        assert_eq!(source.id(), SourceId::Prism);
        assert_eq!(source.coordinate(), coordinate);
    }

    /// Records the order in which stages are invoked; optionally fails one stage.
    #[derive(Debug, Default)]
    struct Recording {
        calls: RefCell<Vec<Stage>>,
        fail_at: Option<Stage>,
    }

    impl DataSource for Recording {
        type Raw = u32;
        type Processed = String;

        fn id(&self) -> SourceId {
            SourceId::Prism
        }

        fn coordinate(&self) -> Coordinate {
            Coordinate::new(10.0, 20.0)
        }

        fn fetch(&self) -> Result<u32, FetchError> {
            self.calls.borrow_mut().push(Stage::Fetch);
            match self.fail_at {
                Some(Stage::Fetch) => Err(FetchError::Unreachable("offline".into())),
                _ => Ok(7),
            }
        }

        fn process(&self, raw: u32) -> Result<String, ProcessError> {
            self.calls.borrow_mut().push(Stage::Process);
            match self.fail_at {
                Some(Stage::Process) => Err(ProcessError::Malformed("bad".into())),
                _ => Ok(raw.to_string()),
            }
        }

        fn save(&self, _processed: String, output: &OutputLocation) -> Result<PathBuf, SaveError> {
            self.calls.borrow_mut().push(Stage::Save);
            Ok(output.dir().join("recorded.txt"))
        }
    }

    #[test]
    fn run_calls_stages_in_order() {
        let source = Recording::default();
        let path = run(&source, &OutputLocation::new("out")).expect("run should succeed");

        assert_eq!(path, PathBuf::from("out").join("recorded.txt"));
        assert_eq!(*source.calls.borrow(), vec![Stage::Fetch, Stage::Process, Stage::Save]);
    }

    #[test]
    fn fetch_failure_skips_remaining_stages() {
        let source = Recording { fail_at: Some(Stage::Fetch), ..Default::default() };
        let err = run(&source, &OutputLocation::new("out")).unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Fetch));
        assert_eq!(*source.calls.borrow(), vec![Stage::Fetch]);
    }

    #[test]
    fn process_failure_skips_save() {
        let source = Recording { fail_at: Some(Stage::Process), ..Default::default() };
        let err = run(&source, &OutputLocation::new("out")).unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Process));
        assert!(err.to_string().contains("(10.0, 20.0)"));
        assert_eq!(*source.calls.borrow(), vec![Stage::Fetch, Stage::Process]);
    }

    #[test]
    fn pipeline_object_runs_shared_orchestration() {
        let boxed: Box<dyn Pipeline> = Box::new(Recording::default());
        assert!(boxed.run(&OutputLocation::new("out")).is_ok());
    }
}
