use std::fs::FileTimes;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hookprobe_consts::{POST_CHECKOUT_CONFIG, POST_CHECKOUT_HOOK};
use tracing::{debug, trace};

use crate::fixture::Fixture;

/// A hook copied into a fixture.
#[derive(Debug)]
pub(crate) struct HookInstallation {
    /// Where git will find the hook.
    pub(crate) hook: PathBuf,
    /// The sidecar config copied into the fixture root, if the hook had one.
    pub(crate) config: Option<PathBuf>,
}

/// The sidecar config that lives next to `hook`, if there is one.
pub(crate) fn sidecar_config(hook: &Path) -> Option<PathBuf> {
    let config = hook.parent()?.join(POST_CHECKOUT_CONFIG);
    config.is_file().then_some(config)
}

/// Install `source` as the `post-checkout` hook of `fixture`.
pub(crate) async fn install(fixture: &Fixture, source: &Path) -> Result<HookInstallation> {
    let hooks_dir = fixture.hooks_dir();
    fs_err::tokio::create_dir_all(&hooks_dir).await?;

    let hook = hooks_dir.join(POST_CHECKOUT_HOOK);
    copy_with_metadata(source, &hook)
        .await
        .with_context(|| format!("Failed to install hook `{}`", source.display()))?;
    make_executable(&hook)?;
    debug!("Installed `{}` at `{}`", source.display(), hook.display());

    let config = match sidecar_config(source) {
        Some(config_source) => {
            let config = fixture.path().join(POST_CHECKOUT_CONFIG);
            copy_with_metadata(&config_source, &config)
                .await
                .with_context(|| {
                    format!("Failed to copy hook config `{}`", config_source.display())
                })?;
            debug!("Copied hook config `{}`", config_source.display());
            Some(config)
        }
        None => {
            trace!("No `{POST_CHECKOUT_CONFIG}` next to `{}`", source.display());
            None
        }
    };

    Ok(HookInstallation { hook, config })
}

/// Copy `source` to `target`, keeping permissions and access/modification times.
///
/// The copy may already be read-only, so the times are set through a read-only
/// handle; owning the file is enough for that.
async fn copy_with_metadata(source: &Path, target: &Path) -> std::io::Result<()> {
    fs_err::tokio::copy(source, target).await?;

    let metadata = fs_err::tokio::metadata(source).await?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    let file = fs_err::File::open(target)?;
    file.file().set_times(times)?;
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs_err::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::{Duration, SystemTime};

    use pretty_assertions::assert_eq;

    fn write_hook(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs_err::write(&path, "#!/bin/sh\necho hook\n").unwrap();
        path
    }

    #[test]
    fn sidecar_config_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let hook = write_hook(dir.path(), "post-checkout");
        assert_eq!(sidecar_config(&hook), None);

        fs_err::write(dir.path().join(POST_CHECKOUT_CONFIG), "verbose=1\n").unwrap();
        assert_eq!(
            sidecar_config(&hook),
            Some(dir.path().join(POST_CHECKOUT_CONFIG))
        );
    }

    #[test]
    fn sidecar_config_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        let hook = write_hook(dir.path(), "post-checkout");
        fs_err::create_dir(dir.path().join(POST_CHECKOUT_CONFIG)).unwrap();
        assert_eq!(sidecar_config(&hook), None);
    }

    #[tokio::test]
    async fn install_without_config() -> Result<()> {
        let source = tempfile::tempdir()?;
        let hook = write_hook(source.path(), "post-checkout-simple");
        let fixture = Fixture::create().await?;

        let installation = install(&fixture, &hook).await?;

        assert_eq!(
            installation.hook,
            fixture.path().join(".git/hooks/post-checkout")
        );
        assert_eq!(installation.config, None);
        assert!(!fixture.path().join(POST_CHECKOUT_CONFIG).exists());
        assert_eq!(
            fs_err::read_to_string(&installation.hook)?,
            "#!/bin/sh\necho hook\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn install_copies_config() -> Result<()> {
        let source = tempfile::tempdir()?;
        let hook = write_hook(source.path(), "post-checkout");
        fs_err::write(source.path().join(POST_CHECKOUT_CONFIG), "auto_install=true\n")?;
        let fixture = Fixture::create().await?;

        let installation = install(&fixture, &hook).await?;

        let config = installation.config.expect("config copied");
        assert_eq!(config, fixture.path().join(POST_CHECKOUT_CONFIG));
        assert_eq!(fs_err::read_to_string(config)?, "auto_install=true\n");
        Ok(())
    }

    #[tokio::test]
    async fn install_preserves_modification_time() -> Result<()> {
        let source = tempfile::tempdir()?;
        let hook = write_hook(source.path(), "post-checkout");
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        fs_err::OpenOptions::new()
            .write(true)
            .open(&hook)?
            .file()
            .set_modified(modified)?;
        let fixture = Fixture::create().await?;

        let installation = install(&fixture, &hook).await?;

        assert_eq!(fs_err::metadata(&installation.hook)?.modified()?, modified);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn install_makes_hook_executable() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let source = tempfile::tempdir()?;
        let hook = write_hook(source.path(), "post-checkout");
        fs_err::set_permissions(&hook, std::fs::Permissions::from_mode(0o600))?;
        let fixture = Fixture::create().await?;

        let installation = install(&fixture, &hook).await?;

        let mode = fs_err::metadata(&installation.hook)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn install_read_only_hook_and_config() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let source = tempfile::tempdir()?;
        let hook = write_hook(source.path(), "post-checkout");
        let config_source = source.path().join(POST_CHECKOUT_CONFIG);
        fs_err::write(&config_source, "auto_install=true\n")?;
        fs_err::set_permissions(&hook, std::fs::Permissions::from_mode(0o555))?;
        fs_err::set_permissions(&config_source, std::fs::Permissions::from_mode(0o444))?;
        let fixture = Fixture::create().await?;

        let installation = install(&fixture, &hook).await?;

        let mode = fs_err::metadata(&installation.hook)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        let config = installation.config.expect("config copied");
        assert_eq!(fs_err::metadata(&config)?.permissions().mode() & 0o777, 0o444);
        assert_eq!(fs_err::read_to_string(config)?, "auto_install=true\n");
        Ok(())
    }

    #[tokio::test]
    async fn install_missing_hook_fails() -> Result<()> {
        let source = tempfile::tempdir()?;
        let fixture = Fixture::create().await?;

        let err = install(&fixture, &source.path().join("post-checkout"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to install hook"));
        Ok(())
    }
}
