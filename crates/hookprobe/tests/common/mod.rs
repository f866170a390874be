#![allow(dead_code, unreachable_pub)]

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_fs::fixture::{ChildPath, FileWriteStr, PathChild, PathCreateDir};
use hookprobe_consts::env_vars::EnvVars;

pub struct TestContext {
    temp_dir: ChildPath,
    home_dir: ChildPath,
    hooks_dir: ChildPath,
    tmp_dir: ChildPath,

    /// Standard filters for this test context.
    filters: Vec<(String, String)>,

    // To keep the directory alive.
    #[allow(dead_code)]
    _root: assert_fs::TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let root = assert_fs::TempDir::new().expect("Failed to create test root directory");

        let temp_dir = ChildPath::new(root.path()).child("work");
        temp_dir.create_dir_all().expect("Failed to create work dir");
        let home_dir = ChildPath::new(root.path()).child("home");
        home_dir.create_dir_all().expect("Failed to create home dir");
        let hooks_dir = ChildPath::new(root.path()).child("hooks");
        hooks_dir.create_dir_all().expect("Failed to create hooks dir");
        let tmp_dir = ChildPath::new(root.path()).child("tmp");
        tmp_dir.create_dir_all().expect("Failed to create tmp dir");

        let mut filters = Vec::new();
        filters.extend(
            Self::path_patterns(root.path())
                .into_iter()
                .map(|pattern| (pattern, "[ROOT]/".to_string())),
        );
        // Random suffix of the fixture directory.
        filters.push((r"hookprobe-\w+".to_string(), "hookprobe-[RANDOM]".to_string()));

        Self {
            temp_dir,
            home_dir,
            hooks_dir,
            tmp_dir,
            filters,
            _root: root,
        }
    }

    /// Generate escaped regex patterns for the given path.
    fn path_patterns(path: impl AsRef<Path>) -> Vec<String> {
        let mut patterns = Vec::new();

        // We can only canonicalize paths that exist already
        if path.as_ref().exists() {
            patterns.push(Self::path_pattern(
                path.as_ref()
                    .canonicalize()
                    .expect("Failed to create canonical path"),
            ));
        }

        patterns.push(Self::path_pattern(path));

        patterns
    }

    /// Generate an escaped regex pattern for the given path.
    fn path_pattern(path: impl AsRef<Path>) -> String {
        format!(
            // Trim the trailing separator for cross-platform directories filters
            r"{}\\?/?",
            regex::escape(&path.as_ref().display().to_string())
                // Make separators platform agnostic because on Windows we will display
                // paths with Unix-style separators sometimes
                .replace(r"\\", r"(\\|\/)")
        )
    }

    /// Standard snapshot filters _plus_ those for this test context.
    pub fn filters(&self) -> Vec<(&str, &str)> {
        self.filters
            .iter()
            .map(|(p, r)| (p.as_str(), r.as_str()))
            .collect()
    }

    /// The `hookprobe` binary, isolated from the user's git configuration.
    pub fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_hookprobe"));
        command
            .current_dir(&*self.temp_dir)
            .env(EnvVars::HOME, &*self.home_dir)
            .env(EnvVars::TMPDIR, &*self.tmp_dir)
            .env(EnvVars::GIT_CONFIG_NOSYSTEM, "1")
            .env(EnvVars::GIT_CONFIG_GLOBAL, self.home_dir.child(".gitconfig").path())
            .env(EnvVars::HOOKPROBE_HOOKS_DIR, &*self.hooks_dir)
            .env("LC_ALL", "C")
            .env_remove(EnvVars::HOOKPROBE_LOG)
            .env_remove("CLICOLOR_FORCE")
            .env_remove("FORCE_COLOR");
        for name in EnvVars::GIT_REPO_SCOPED {
            command.env_remove(name);
        }
        command
    }

    pub fn work_dir(&self) -> &ChildPath {
        &self.temp_dir
    }

    pub fn home_dir(&self) -> &ChildPath {
        &self.home_dir
    }

    /// Directory the binary looks for hooks in.
    pub fn hooks_dir(&self) -> &ChildPath {
        &self.hooks_dir
    }

    /// Directory fixtures are created in.
    pub fn tmp_dir(&self) -> &ChildPath {
        &self.tmp_dir
    }

    /// Write a hook script into the hooks directory. It is deliberately left
    /// non-executable, hookprobe marks the installed copy executable.
    pub fn write_hook(&self, name: &str, content: &str) -> PathBuf {
        let hook = self.hooks_dir.child(name);
        hook.write_str(content).expect("Failed to write hook");
        hook.to_path_buf()
    }

    /// Fixture directories left behind in the temp directory.
    pub fn leftover_fixtures(&self) -> Vec<PathBuf> {
        fs_err::read_dir(&*self.tmp_dir)
            .expect("Failed to read tmp dir")
            .map(|entry| entry.expect("Failed to read entry").path())
            .collect()
    }
}

#[doc(hidden)]
#[allow(unused_macros)]
macro_rules! cmd_snapshot {
    ($spawnable:expr, @$snapshot:literal) => {{
        cmd_snapshot!(Vec::<(&str, &str)>::new(), $spawnable, @$snapshot)
    }};
    ($filters:expr, $spawnable:expr, @$snapshot:literal) => {{
        let mut settings = insta::Settings::clone_current();
        for (matcher, replacement) in $filters {
            settings.add_filter(matcher, replacement);
        }
        let _guard = settings.bind_to_scope();
        insta_cmd::assert_cmd_snapshot!($spawnable, @$snapshot);
    }};
}

#[allow(unused_imports)]
pub(crate) use cmd_snapshot;
