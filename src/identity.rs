/// Supplies the caller identifier sent with each upload.
pub trait IdentityProvider: Send + Sync {
    fn resolve_identity(&self) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<String>);

impl IdentityProvider for StaticIdentity {
    fn resolve_identity(&self) -> Option<String> {
        non_blank(self.0.clone())
    }
}

/// Reads the identifier from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvIdentity {
    pub var: String,
}

impl EnvIdentity {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl IdentityProvider for EnvIdentity {
    fn resolve_identity(&self) -> Option<String> {
        non_blank(std::env::var(&self.var).ok())
    }
}

/// Tries each provider in order.
pub struct ChainedIdentity(pub Vec<Box<dyn IdentityProvider>>);

impl IdentityProvider for ChainedIdentity {
    fn resolve_identity(&self) -> Option<String> {
        self.0.iter().find_map(|p| p.resolve_identity())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identity_is_absent() {
        assert_eq!(StaticIdentity(Some("   ".into())).resolve_identity(), None);
        assert_eq!(StaticIdentity(None).resolve_identity(), None);
        assert_eq!(
            StaticIdentity(Some(" 12345 ".into())).resolve_identity().as_deref(),
            Some("12345")
        );
    }

    #[test]
    fn chain_uses_first_resolvable() {
        let chain = ChainedIdentity(vec![
            Box::new(StaticIdentity(None)),
            Box::new(EnvIdentity::new("DOCS_UPLOADER_TEST_UNSET_VAR")),
            Box::new(StaticIdentity(Some("9".into()))),
        ]);
        assert_eq!(chain.resolve_identity().as_deref(), Some("9"));
    }
}
