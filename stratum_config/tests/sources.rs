//! Source discovery and ordering across environment, arguments, files, and
//! standard input, plus loading from files on disk.

use anyhow::{Result, ensure};
use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use stratum_config::{
    CancellationToken, Codecs, Configurable, DefaultSourceProvider, Duration, Input, InputSource,
    Loader, Origin, PropertyEntry, PropertySource, SharedReader, Source, SourceProvider,
};
use test_helpers::jail::with_files;

const PREFIX: &str = "test_app_";

#[fixture]
fn stdin() -> SharedReader {
    SharedReader::new(b"{}".as_slice())
}

fn provider(stdin: &SharedReader, env: &[&str], args: &[&str]) -> DefaultSourceProvider {
    DefaultSourceProvider {
        env_prefix: PREFIX.to_owned(),
        env: env.iter().map(|entry| (*entry).to_owned()).collect(),
        args: args.iter().map(|arg| (*arg).to_owned()).collect(),
        stdin: Some(stdin.clone()),
    }
}

fn properties(origin: Origin, entries: &[(&str, &str)]) -> Source {
    Source::from(PropertySource::new(
        origin,
        entries
            .iter()
            .map(|(key, value)| PropertyEntry::new(key.split('.'), *value))
            .collect(),
    ))
}

fn from_stdin(stdin: &SharedReader, format: &str) -> Source {
    Source::from(InputSource::new(Input::Reader(stdin.clone()), format))
}

#[rstest]
fn environment_properties_form_one_group(stdin: SharedReader) -> Result<()> {
    let sources = provider(
        &stdin,
        &[
            "test_app_prop1=value1",
            "test_app_nested_prop2=value2",
            "=ignored",
            "unrelated=value",
        ],
        &[],
    )
    .sources()?;
    let expected = vec![properties(
        Origin::Environment,
        &[("prop1", "value1"), ("nested.prop2", "value2")],
    )];
    ensure!(sources == expected, "got {sources:?}");
    Ok(())
}

#[rstest]
fn argument_properties_keep_their_order(stdin: SharedReader) -> Result<()> {
    let sources = provider(
        &stdin,
        &[],
        &["--prop1=value1", "meme", "--nested.prop2=value2", "--flag"],
    )
    .sources()?;
    let expected = vec![properties(
        Origin::CommandLine,
        &[
            ("prop1", "value1"),
            ("nested.prop2", "value2"),
            ("flag", "true"),
        ],
    )];
    ensure!(sources == expected, "got {sources:?}");
    Ok(())
}

#[rstest]
#[case::env_file(&["test_app_config_file=app.yaml"], &[], "yaml")]
#[case::arg_file(&[], &["--config.file=app.toml"], "toml")]
#[case::arg_file_with_format(&[], &["--config.file.json=app.conf"], "json")]
fn file_references_resolve_their_format(
    stdin: SharedReader,
    #[case] env: &[&str],
    #[case] args: &[&str],
    #[case] format: &str,
) -> Result<()> {
    let sources = provider(&stdin, env, args).sources()?;
    let [Source::Input(InputSource { input: Input::File(_), format: found })] = sources.as_slice()
    else {
        anyhow::bail!("expected a single file source, got {sources:?}");
    };
    ensure!(found == format, "format {found}");
    Ok(())
}

#[rstest]
#[case::env(&["test_app_config_stdin=yaml"], &[])]
#[case::arg(&[], &["--config.stdin=yaml"])]
fn stdin_references_share_the_stream(
    stdin: SharedReader,
    #[case] env: &[&str],
    #[case] args: &[&str],
) -> Result<()> {
    let sources = provider(&stdin, env, args).sources()?;
    ensure!(sources == vec![from_stdin(&stdin, "yaml")], "got {sources:?}");
    Ok(())
}

#[rstest]
fn arguments_override_environment_references(stdin: SharedReader) -> Result<()> {
    let sources = provider(
        &stdin,
        &[
            "test_app_config_file=env.yaml",
            "test_app_config_stdin=json",
            "test_app_prop1=env",
        ],
        &[
            "--prop1=arg1",
            "--config.file=config1.yaml",
            "--config.stdin=",
            "--config.file=config2.json",
            "--prop2=arg2",
        ],
    )
    .sources()?;

    let expected = vec![
        properties(Origin::Environment, &[("prop1", "env")]),
        properties(Origin::CommandLine, &[("prop1", "arg1")]),
        Source::from(InputSource::file("config1.yaml", "yaml")),
        Source::from(InputSource::file("config2.json", "json")),
        properties(Origin::CommandLine, &[("prop2", "arg2")]),
    ];
    ensure!(sources == expected, "got {sources:#?}");
    Ok(())
}

#[rstest]
#[case::properties(
    properties(
        Origin::CommandLine,
        &[("map.key1", "value1"), ("map.key2", "2"), ("list", "1.5")],
    ),
    "{map: {key1: value1, key2: 2}, list: 1.5}"
)]
#[case::later_leaf_replaces_map(
    properties(Origin::CommandLine, &[("map.key", "value"), ("map", "map_value")]),
    "{map: map_value}"
)]
#[case::stdin_yaml(
    Source::from(InputSource::new(
        Input::Reader(SharedReader::new(b"map:\n  key: [1, 2]\n".as_slice())),
        "yaml",
    )),
    "{map: {key: [1, 2]}}"
)]
fn sources_produce_untyped_trees(#[case] source: Source, #[case] expected: &str) -> Result<()> {
    let values = source.values(&Codecs::default())?;
    ensure!(values == serde_yaml::from_str::<Value>(expected)?, "got {values:?}");
    Ok(())
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Configurable)]
struct Properties {
    property: String,
    duration: Duration,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Configurable)]
struct WithProperties {
    properties: Properties,
}

#[rstest]
fn environment_and_argument_properties_merge(stdin: SharedReader) -> Result<()> {
    let mut loader = Loader::new(provider(
        &stdin,
        &["test_app_properties_property=value"],
        &["--properties.duration=10m"],
    ));
    let loaded: WithProperties = loader.load(&CancellationToken::new())?;
    ensure!(loaded.properties.property == "value");
    ensure!(
        loaded.properties.duration.to_string() == "10m0s",
        "duration {}",
        loaded.properties.duration
    );
    Ok(())
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Configurable)]
struct Service {
    #[stratum_config(default = "localhost")]
    host: String,
    #[stratum_config(default = "8080")]
    port: u16,
    #[serde(default)]
    tags: Vec<String>,
}

#[rstest]
fn files_on_disk_load_in_argument_order(stdin: SharedReader) -> Result<()> {
    let files = [
        ("conf/base.yaml", "host: example.org\ntags: [a, b]\n"),
        ("conf/override.json", r#"{"port": 9000}"#),
    ];
    let service: Service = with_files(&files, |_| {
        let mut loader = Loader::new(provider(
            &stdin,
            &[],
            &[
                "--config.file=conf/base.yaml",
                "--config.file=conf/override.json",
                "--host=flag.example.org",
            ],
        ));
        Ok(loader.load(&CancellationToken::new())?)
    })?;

    let expected = Service {
        host: "flag.example.org".to_owned(),
        port: 9000,
        tags: vec!["a".to_owned(), "b".to_owned()],
    };
    ensure!(service == expected, "loaded {service:?}");
    Ok(())
}

#[rstest]
fn missing_files_are_reported(stdin: SharedReader) -> Result<()> {
    let result = with_files(&[], |_| {
        let mut loader = Loader::new(provider(&stdin, &[], &["--config.file=absent.yaml"]));
        Ok(loader.load::<Service>(&CancellationToken::new()))
    })?;
    let Err(error) = result else {
        anyhow::bail!("expected a read failure");
    };
    ensure!(error.to_string().contains("absent.yaml"), "message: {error}");
    Ok(())
}
