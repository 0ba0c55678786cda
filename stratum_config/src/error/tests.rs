//! Unit tests for error construction and rendering.

use anyhow::{Result, ensure};
use rstest::rstest;

use super::StratumError;
use crate::{
    codec::CodecError,
    merge::DecodeError,
    schema::SchemaError,
    source::SourceError,
};

#[rstest]
fn decode_errors_name_their_source() -> Result<()> {
    let err = StratumError::decode(
        "file 'app.yaml' (yaml)",
        DecodeError::UnknownFormat {
            format: "ini".into(),
        },
    );
    let text = err.to_string();
    ensure!(
        text.contains("file 'app.yaml' (yaml)"),
        "missing source identity: {text}"
    );
    ensure!(text.contains("ini"), "missing format: {text}");
    Ok(())
}

#[rstest]
fn dump_errors_name_the_format() -> Result<()> {
    let err = StratumError::dump("ini", CodecError::UnknownFormat { format: "ini".into() });
    ensure!(matches!(err, StratumError::Dump { ref format, .. } if format == "ini"));
    ensure!(!err.is_cancelled());
    Ok(())
}

#[rstest]
fn nested_errors_convert_with_question_mark() -> Result<()> {
    fn schema() -> Result<(), StratumError> {
        Err(SchemaError::ReservedKey { key: "config".into() }.into())
    }
    fn source() -> Result<(), StratumError> {
        Err(SourceError::StdinUnavailable.into())
    }
    ensure!(matches!(schema(), Err(StratumError::Schema(_))));
    ensure!(matches!(source(), Err(StratumError::Source(_))));
    Ok(())
}

#[rstest]
fn cancellation_is_recognised() {
    assert!(StratumError::Cancelled.is_cancelled());
}
