use crate::fs::{EntryView, Uid};

/// Source of the identity the cleaner acts on behalf of.
pub trait IdentityResolver {
    fn effective_uid(&self) -> Uid;
}

/// The running process, via `geteuid(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessIdentity;

impl IdentityResolver for ProcessIdentity {
    fn effective_uid(&self) -> Uid {
        // geteuid cannot fail
        unsafe { libc::geteuid() }
    }
}

/// A fixed uid, for running on behalf of a known account.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity(pub Uid);

impl IdentityResolver for FixedIdentity {
    fn effective_uid(&self) -> Uid {
        self.0
    }
}

/// Accepts only entries owned by one uid, resolved once per run.
#[derive(Debug, Clone, Copy)]
pub struct OwnershipFilter {
    uid: Uid,
}

impl OwnershipFilter {
    pub fn resolve(identity: &dyn IdentityResolver) -> Self {
        Self {
            uid: identity.effective_uid(),
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn owns(&self, entry: &EntryView) -> bool {
        entry.owner == self.uid
    }
}
