//! Temporary working directories populated with configuration files.
//!
//! File references resolve relative to the working directory, so tests that
//! load `config.file` sources run inside a `figment::Jail`, which changes into
//! a fresh temporary directory and restores the original on exit.

use anyhow::{Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};

/// Execute `f` inside a [`figment::Jail`] after writing `files` into it.
///
/// Each entry is a path relative to the jail and its contents; missing parent
/// directories are created. `f` receives the jail directory.
///
/// # Errors
///
/// Returns an error when the jail cannot be created, a file cannot be written,
/// the jail path is not UTF-8, or `f` fails.
///
/// # Examples
///
/// ```
/// use stratum_config_test_helpers::jail::with_files;
///
/// let text = with_files(&[("conf/app.yaml", "port: 80\n")], |dir| {
///     Ok(std::fs::read_to_string(dir.join("conf/app.yaml"))?)
/// })?;
/// assert_eq!(text, "port: 80\n");
/// # Ok::<_, anyhow::Error>(())
/// ```
pub fn with_files<F, T>(files: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce(&Utf8Path) -> Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        for (name, contents) in files {
            if let Some(parent) = Utf8Path::new(name)
                .parent()
                .filter(|parent| !parent.as_str().is_empty())
            {
                jail.create_dir(parent.as_std_path())?;
            }
            jail.create_file(name, contents)?;
        }
        let dir = Utf8PathBuf::from_path_buf(jail.directory().to_path_buf())
            .map_err(|path| jail_error(format!("non-UTF-8 jail path {}", path.display())))?;
        output = Some(f(&dir).map_err(jail_error)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Convert any displayable error into a [`figment::Error`] so it can cross
/// the jail boundary.
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a map_err adaptor, which hands over owned errors"
)]
pub fn jail_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
