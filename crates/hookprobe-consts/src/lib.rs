pub mod env_vars;

/// The hook name git runs after a successful `git checkout` or `git switch`.
pub const POST_CHECKOUT_HOOK: &str = "post-checkout";

/// Sidecar configuration read by the hook, copied next to it into the fixture root.
pub const POST_CHECKOUT_CONFIG: &str = ".post-checkout-config";

/// Hook candidates looked up in the hook directory, in the order they are tested.
pub const PRIMARY_HOOK: &str = "post-checkout";
pub const SIMPLE_HOOK: &str = "post-checkout-simple";

/// Branch created on top of the initial commit of every fixture.
pub const FEATURE_BRANCH: &str = "feature/test";

/// Branch name requested for the initial commit.
pub const DEFAULT_BRANCH: &str = "main";
