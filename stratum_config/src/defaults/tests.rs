//! Unit tests for structural default application.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde::{Deserialize, Serialize};

use serde_yaml::Value;

use super::{DefaultsError, Supplied, apply_defaults, apply_supplied_defaults};
use crate::{Configurable, Duration, schema::{Schema, generate}};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct Worker {
    #[stratum_config(default = "worker")]
    name: String,
    #[stratum_config(default = "4")]
    threads: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct Pool {
    #[stratum_config(default = "30s")]
    idle: Duration,
    workers: Vec<Worker>,
    by_id: HashMap<i32, Option<Worker>>,
    primary: Option<Worker>,
    #[stratum_config(default = "{name: fallback, threads: 1}")]
    fallback: Worker,
    #[serde(flatten)]
    shared: Shared,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct Shared {
    #[stratum_config(default = "true")]
    enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Configurable)]
#[stratum_config(crate = "crate")]
struct Listen {
    #[stratum_config(default = "[80, 443]")]
    ports: Vec<u16>,
    #[stratum_config(default = "{a: 1}")]
    weights: BTreeMap<String, u8>,
}

fn worker(name: &str, threads: u8) -> Worker {
    Worker {
        name: name.to_owned(),
        threads,
    }
}

fn defaulted(mut pool: Pool) -> Result<Pool> {
    let schema = generate::<Pool>()?;
    apply_defaults(&mut pool, &schema)?;
    Ok(pool)
}

#[rstest]
fn fills_unset_members() -> Result<()> {
    let pool = defaulted(Pool::default())?;
    ensure!(pool.idle == Duration::from_secs(30));
    ensure!(pool.fallback == worker("fallback", 1));
    ensure!(pool.shared.enabled, "inline members take their defaults");
    ensure!(pool.workers.is_empty() && pool.primary.is_none());
    Ok(())
}

#[rstest]
fn keeps_values_a_source_supplied() -> Result<()> {
    let pool = defaulted(Pool {
        idle: Duration::from_secs(5),
        fallback: worker("", 2),
        ..Pool::default()
    })?;
    ensure!(pool.idle == Duration::from_secs(5));
    ensure!(
        pool.fallback == worker("worker", 2),
        "a partly set record keeps its values and defaults the rest: {:?}",
        pool.fallback
    );
    Ok(())
}

#[rstest]
fn descends_into_sequences_optionals_and_maps() -> Result<()> {
    let pool = defaulted(Pool {
        workers: vec![worker("", 0), worker("busy", 16)],
        by_id: HashMap::from([(1, Some(worker("", 2))), (2, None)]),
        primary: Some(Worker::default()),
        ..Pool::default()
    })?;
    ensure!(pool.workers == [worker("worker", 4), worker("busy", 16)]);
    ensure!(pool.by_id.get(&1) == Some(&Some(worker("worker", 2))));
    ensure!(pool.by_id.get(&2) == Some(&None), "absent map values stay absent");
    ensure!(pool.primary == Some(worker("worker", 4)));
    Ok(())
}

#[rstest]
fn applying_twice_changes_nothing() -> Result<()> {
    let once = defaulted(Pool {
        workers: vec![Worker::default()],
        ..Pool::default()
    })?;
    let twice = defaulted(once.clone())?;
    ensure!(once == twice);
    Ok(())
}

#[rstest]
fn reports_missing_properties() {
    let mut value = Worker::default();
    let err = apply_defaults(&mut value, &Schema::default()).err();
    assert!(
        matches!(err, Some(DefaultsError::MissingProperty { ref name }) if name == "name"),
        "unexpected result: {err:?}"
    );
}

#[rstest]
fn attributes_nested_failures_to_their_path() -> Result<()> {
    let mut schema = generate::<Pool>()?;
    let items = schema
        .properties
        .get_mut("workers")
        .and_then(|workers| workers.items.as_deref_mut())
        .ok_or_else(|| anyhow!("workers carry an item schema"))?;
    items
        .properties
        .get_mut("threads")
        .ok_or_else(|| anyhow!("missing threads"))?
        .default = Some(serde_yaml::Value::from("lots"));

    let mut pool = Pool {
        workers: vec![worker("named", 0)],
        ..Pool::default()
    };
    let err = apply_defaults(&mut pool, &schema).err();
    ensure!(
        matches!(err, Some(DefaultsError::Within { ref path, .. }) if path == "workers.0.threads"),
        "unexpected result: {err:?}"
    );
    Ok(())
}

fn document(text: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(text)?)
}

fn listen_defaults() -> Listen {
    Listen {
        ports: vec![80, 443],
        weights: BTreeMap::from([("a".to_owned(), 1)]),
    }
}

#[rstest]
#[case::supplied_empty("ports: []\nweights: {}", Listen::default())]
#[case::omitted("{}", listen_defaults())]
#[case::null("ports: null\nweights: null", listen_defaults())]
#[case::partly_supplied(
    "ports: []",
    Listen { weights: BTreeMap::from([("a".to_owned(), 1)]), ..Listen::default() }
)]
fn supplied_collections_stay_as_given(#[case] text: &str, #[case] expected: Listen) -> Result<()> {
    let schema = generate::<Listen>()?;
    let supplied = document(text)?;
    let mut listen = Listen::default();
    apply_supplied_defaults(&mut listen, &schema, Supplied::tree(&supplied))?;
    ensure!(listen == expected, "got {listen:?}");
    Ok(())
}

#[rstest]
fn unknown_presence_treats_empty_collections_as_unset() -> Result<()> {
    let schema = generate::<Listen>()?;
    let mut listen = Listen::default();
    apply_defaults(&mut listen, &schema)?;
    ensure!(listen == listen_defaults(), "got {listen:?}");
    Ok(())
}

#[rstest]
fn supplied_elements_are_judged_individually() -> Result<()> {
    let schema = generate::<Pool>()?;
    let supplied = document("workers: [{name: a}, {}]\nby_id: {7: {threads: 0}}")?;
    let mut pool = Pool {
        workers: vec![worker("a", 0), Worker::default()],
        by_id: HashMap::from([(7, Some(Worker::default()))]),
        ..Pool::default()
    };
    apply_supplied_defaults(&mut pool, &schema, Supplied::tree(&supplied))?;
    ensure!(pool.workers == [worker("a", 4), worker("worker", 4)], "{:?}", pool.workers);
    let entry = pool.by_id.get(&7).cloned().flatten();
    ensure!(entry == Some(worker("worker", 4)), "{entry:?}");
    Ok(())
}

#[rstest]
fn supplied_views_follow_the_document() -> Result<()> {
    let tree = document("ports: [8080]\nweights: {3: 1}\nname: null")?;
    let root = Supplied::tree(&tree);
    ensure!(root.member("ports").element(0).is_present() == Some(true));
    ensure!(root.member("ports").element(1).is_present() == Some(false));
    ensure!(root.member("weights").entry(&Value::from(3)).is_present() == Some(true));
    ensure!(root.member("weights").entry(&Value::from("3")).is_present() == Some(false));
    ensure!(root.member("name").is_present() == Some(false));
    ensure!(root.member("missing").member("deeper") == Supplied::Absent);
    ensure!(Supplied::Unknown.member("ports").element(0).is_present().is_none());
    Ok(())
}
