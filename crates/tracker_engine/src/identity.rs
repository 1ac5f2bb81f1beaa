use rand::Rng;
use tracker_core::LocalIdentity;

pub trait IdentityProvider {
    fn next_identity(&mut self) -> LocalIdentity;
}

/// Random ids of the form `<prefix>-<n>` with `n` below 100000.
#[derive(Debug, Clone)]
pub struct RandomIdentityProvider {
    prefix: String,
}

impl RandomIdentityProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for RandomIdentityProvider {
    fn default() -> Self {
        Self::new("tracker-user")
    }
}

impl IdentityProvider for RandomIdentityProvider {
    fn next_identity(&mut self) -> LocalIdentity {
        let n: u32 = rand::rng().random_range(0..100_000);
        LocalIdentity::new(format!("{}-{n}", self.prefix))
    }
}
