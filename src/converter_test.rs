use std::cell::RefCell;

use super::*;

/// Replies with a fixed exit code and stdout, and records every path it was given.
struct Scripted {
    code: Option<i32>,
    stdout: &'static str,
    calls: RefCell<Vec<PathBuf>>,
}

impl Scripted {
    fn new(code: i32, stdout: &'static str) -> Self {
        Self { code: Some(code), stdout, calls: RefCell::new(Vec::new()) }
    }
}

impl Converter for Scripted {
    fn program(&self) -> String {
        "scripted".into()
    }

    fn run(&self, path: &Path) -> io::Result<ConverterOutput> {
        self.calls.borrow_mut().push(path.to_path_buf());
        Ok(ConverterOutput { code: self.code, stdout: self.stdout.into() })
    }
}

struct Missing;

impl Converter for Missing {
    fn program(&self) -> String {
        "missing.exe".into()
    }

    fn run(&self, _path: &Path) -> io::Result<ConverterOutput> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

// =============================================================
// Status classification
// =============================================================

#[test]
fn status_from_known_codes() {
    assert_eq!(ConverterStatus::from_code(Some(0)), ConverterStatus::Success);
    assert_eq!(ConverterStatus::from_code(Some(1)), ConverterStatus::MalformedInput);
    assert_eq!(ConverterStatus::from_code(Some(2)), ConverterStatus::ConversionFailed);
    assert_eq!(ConverterStatus::from_code(Some(3)), ConverterStatus::FileError);
    assert_eq!(ConverterStatus::from_code(Some(4)), ConverterStatus::GameNotFound);
}

#[test]
fn status_from_unknown_codes() {
    assert_eq!(ConverterStatus::from_code(Some(42)), ConverterStatus::Other(Some(42)));
    assert_eq!(ConverterStatus::from_code(None), ConverterStatus::Other(None));
}

#[test]
fn short_stdout_reports_no_changes() {
    let out = ConverterOutput { code: Some(0), stdout: "ok\n".into() };
    assert!(!out.reports_changes());
    let out = ConverterOutput { code: Some(0), stdout: "Updated level.layout".into() };
    assert!(out.reports_changes());
}

// =============================================================
// invoke / probe
// =============================================================

#[test]
fn invoke_maps_missing_executable() {
    let err = Missing.invoke(Path::new("x.layout.json")).unwrap_err();
    assert!(matches!(err, ConverterError::NotFound { ref program } if program == "missing.exe"));
}

#[test]
fn probe_passes_on_file_error() {
    let conv = Scripted::new(3, "File not found");
    conv.probe().unwrap();
    assert_eq!(conv.calls.borrow().as_slice(), [PathBuf::from("test")]);
}

#[test]
fn probe_reports_missing_game() {
    let err = Scripted::new(4, "Poly Bridge 2 not found").probe().unwrap_err();
    assert!(matches!(err, ConverterError::GameNotFound { ref stdout } if stdout == "Poly Bridge 2 not found"));
}

#[test]
fn probe_rejects_other_codes() {
    let err = Scripted::new(0, "").probe().unwrap_err();
    assert!(matches!(err, ConverterError::Failed { code: Some(0), .. }));
}

// =============================================================
// import
// =============================================================

#[test]
fn import_distinguishes_created_updated_unchanged() {
    assert_eq!(Scripted::new(0, "Created a.layout.json").import(Path::new("a.layout")).unwrap(), ImportOutcome::Created);
    assert_eq!(Scripted::new(0, "Wrote a.layout.json").import(Path::new("a.layout")).unwrap(), ImportOutcome::Updated);
    assert_eq!(Scripted::new(0, "").import(Path::new("a.layout")).unwrap(), ImportOutcome::Unchanged);
}

#[test]
fn import_failure_carries_stdout() {
    let err = Scripted::new(2, "bad layout").import(Path::new("a.layout")).unwrap_err();
    assert!(matches!(err, ConverterError::Failed { code: Some(2), ref stdout } if stdout == "bad layout"));
}

// =============================================================
// ProcessConverter
// =============================================================

#[test]
fn process_converter_missing_program() {
    let conv = ProcessConverter::new("polyedit-no-such-converter-binary");
    let err = conv.invoke(Path::new("level.layout.json")).unwrap_err();
    assert!(matches!(err, ConverterError::NotFound { .. }));
}

#[cfg(unix)]
#[test]
fn process_converter_captures_exit_code() {
    let out = ProcessConverter::new("true").run(Path::new("ignored")).unwrap();
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.is_empty());
}
