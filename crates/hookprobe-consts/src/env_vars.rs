pub struct EnvVars;

impl EnvVars {
    pub const HOME: &'static str = "HOME";
    pub const TMPDIR: &'static str = "TMPDIR";

    // Git related
    pub const GIT_DIR: &'static str = "GIT_DIR";
    pub const GIT_WORK_TREE: &'static str = "GIT_WORK_TREE";
    pub const GIT_INDEX_FILE: &'static str = "GIT_INDEX_FILE";
    pub const GIT_CONFIG_NOSYSTEM: &'static str = "GIT_CONFIG_NOSYSTEM";
    pub const GIT_CONFIG_GLOBAL: &'static str = "GIT_CONFIG_GLOBAL";

    // hookprobe specific
    pub const HOOKPROBE_HOOKS_DIR: &'static str = "HOOKPROBE_HOOKS_DIR";
    pub const HOOKPROBE_LOG: &'static str = "HOOKPROBE_LOG";
}

impl EnvVars {
    /// Variables that pin git to a specific repository. They must not leak from the
    /// environment hookprobe runs in (for example, another hook) into the fixture.
    pub const GIT_REPO_SCOPED: [&'static str; 3] =
        [Self::GIT_DIR, Self::GIT_WORK_TREE, Self::GIT_INDEX_FILE];
}
