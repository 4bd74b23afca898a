use std::path::{Path, PathBuf};

use crate::error::CleanupError;
use crate::eviction::{Clock, Cutoff, EvictionPolicy, SystemClock};
use crate::fs::{Filesystem, LocalFs};
use crate::ownership::{IdentityResolver, OwnershipFilter, ProcessIdentity};
use crate::report::{EventKind, RunReport};
use crate::roots::{Root, RootEnumerator};
use crate::walker::Walker;

/// Parameters of one cleanup run. Built per invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupRequest {
    retention_days: u64,
    extra_roots: Vec<PathBuf>,
    temp_root: PathBuf,
    dry_run: bool,
}

impl CleanupRequest {
    /// Cleans the system temp directory only.
    pub fn new(retention_days: u64) -> Self {
        Self {
            retention_days,
            extra_roots: Vec::new(),
            temp_root: std::env::temp_dir(),
            dry_run: false,
        }
    }

    pub fn with_extra_roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.extra_roots = roots.into_iter().collect();
        self
    }

    /// Replaces the system temp directory as the implicit root.
    pub fn with_temp_root(mut self, temp_root: impl Into<PathBuf>) -> Self {
        self.temp_root = temp_root.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn retention_days(&self) -> u64 {
        self.retention_days
    }

    pub fn extra_roots(&self) -> &[PathBuf] {
        &self.extra_roots
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Runs cleanups against a filesystem, a clock and an identity.
pub struct Cleaner<F = LocalFs, C = SystemClock, I = ProcessIdentity> {
    fs: F,
    clock: C,
    identity: I,
}

impl Cleaner {
    /// The local machine, acting as the running user.
    pub fn local() -> Self {
        Self::new(LocalFs, SystemClock, ProcessIdentity)
    }
}

impl<F, C, I> Cleaner<F, C, I>
where
    F: Filesystem,
    C: Clock,
    I: IdentityResolver,
{
    pub fn new(fs: F, clock: C, identity: I) -> Self {
        Self {
            fs,
            clock,
            identity,
        }
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Walk every root of `request` and remove stale entries we own.
    ///
    /// Only a failure to probe a configured extra directory aborts the run;
    /// cleanup already done on earlier roots stays done. Free space is
    /// measured and logged either way.
    pub fn run_cleanup(&self, request: &CleanupRequest) -> Result<RunReport, CleanupError> {
        let cutoff = Cutoff::from_retention(self.clock.now(), request.retention_days);
        let ownership = OwnershipFilter::resolve(&self.identity);
        tracing::info!(
            retention_days = request.retention_days,
            extra_roots = ?request.extra_roots,
            uid = ownership.uid(),
            dry_run = request.dry_run,
            "Starting temporary directory cleanup"
        );

        let mut report = RunReport {
            dry_run: request.dry_run,
            ..RunReport::default()
        };
        report.space.before = self.free_space(&request.temp_root);

        let mut walker = Walker::new(
            &self.fs,
            ownership,
            EvictionPolicy::new(cutoff),
            request.dry_run,
        );
        let result = self.walk_roots(request, &mut walker, &mut report);

        report.space.after = self.free_space(&request.temp_root);
        tracing::info!(
            removed = report.removed_count(),
            failed = report.failures().count(),
            "Temporary directory cleanup {}",
            report.space.summary()
        );

        result.map(|()| report)
    }

    fn walk_roots(
        &self,
        request: &CleanupRequest,
        walker: &mut Walker<'_>,
        report: &mut RunReport,
    ) -> Result<(), CleanupError> {
        let roots = RootEnumerator::new(&self.fs, &request.temp_root, &request.extra_roots);
        for root in roots {
            match root {
                Ok(Root::Present(path)) => walker.walk_root(&path, report),
                Ok(Root::Missing(path)) => report.record(path, EventKind::RootMissing),
                Err(e) => {
                    tracing::error!(error = %e, "Aborting cleanup");
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn free_space(&self, path: &Path) -> Option<u64> {
        match self.fs.free_space(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot query free space");
                None
            }
        }
    }
}

/// [`Cleaner::run_cleanup`] on the local machine.
pub fn run_cleanup(request: &CleanupRequest) -> Result<RunReport, CleanupError> {
    Cleaner::local().run_cleanup(request)
}
