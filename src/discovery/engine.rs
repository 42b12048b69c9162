// Tue Jan 13 2026 - Alex

use crate::config::{LoaderConfig, TraversalMode};
use crate::criteria::{PathVerdict, ReflectionVerdict};
use crate::discovery::walker::{self, CandidateWalker};
use crate::discovery::{Candidate, CandidateStatus, DiscoveryError, DiscoveryReport};
use crate::fault::{AggregatedDiscoveryFailure, FaultError, FaultPolicy, FaultRecord, FaultStage};
use crate::inspect::{BinaryInspector, InspectedModule, LoadFault, ModuleInspector};
use crate::utils::logging::DiscoveryLog;
use log::Log;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Walks the configured roots and returns the modules that pass every criterion.
///
/// The engine keeps nothing between `discover` calls except its configuration,
/// so repeated runs over an unchanged tree give the same accepted list.
pub struct DiscoveryEngine {
    config: LoaderConfig,
    inspector: Arc<dyn ModuleInspector>,
    logger: Option<Arc<dyn Log>>,
    walker: CandidateWalker,
    pool: Option<rayon::ThreadPool>,
}

// Process-wide so run ids stay distinct across engines; diagnostic only.
static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

impl DiscoveryEngine {
    pub fn new(config: LoaderConfig) -> Result<Self, DiscoveryError> {
        Self::with_inspector(config, Arc::new(BinaryInspector::new()))
    }

    pub fn with_inspector(
        config: LoaderConfig,
        inspector: Arc<dyn ModuleInspector>,
    ) -> Result<Self, DiscoveryError> {
        config.validate()?;

        let pool = if config.parallel && config.max_threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.max_threads)
                    .thread_name(|i| format!("discovery-{}", i))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            walker: CandidateWalker::new(&config.extensions),
            config,
            inspector,
            logger: None,
            pool,
        })
    }

    pub fn with_logger(mut self, logger: Arc<dyn Log>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn inspector(&self) -> &dyn ModuleInspector {
        self.inspector.as_ref()
    }

    /// Blocks until every root is walked and every candidate resolved.
    ///
    /// Lenient mode always returns a report. Strict mode still processes
    /// every candidate, then returns the aggregated failure if anything faulted.
    pub fn discover(&self) -> Result<DiscoveryReport, AggregatedDiscoveryFailure> {
        let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);
        let log = DiscoveryLog::new(self.logger.clone(), run_id);
        let _timer = log.timer("discovery");
        let start = Instant::now();

        let roots = walker::normalize_roots(&self.config.roots, &log);
        log.debug(format_args!(
            "Scanning {} root(s) with inspector '{}' ({:?} mode)",
            roots.len(),
            self.inspector.name(),
            self.config.fault_mode()
        ));

        let paths = {
            let _timer = log.timer("enumeration");
            self.enumerate(&roots, &log)
        };
        let policy = FaultPolicy::new(self.config.fault_mode());

        let process = |(ordinal, path): (usize, PathBuf)| self.process_candidate(ordinal, path, &policy, &log);
        let candidates: Vec<Candidate> = match &self.pool {
            Some(pool) => pool.install(|| paths.into_par_iter().enumerate().map(process).collect()),
            None => paths.into_iter().enumerate().map(process).collect(),
        };

        let report = DiscoveryReport::new(
            run_id,
            roots.into_iter().map(|(root, _)| root).collect(),
            candidates,
            start.elapsed(),
        );

        log.info(format_args!(
            "{} candidate(s), {} accepted, {} excluded by path, {} rejected by reflection, {} faulted",
            report.candidates().len(),
            report.accepted().len(),
            report.count(CandidateStatus::ExcludedByPath),
            report.count(CandidateStatus::RejectedByReflection),
            policy.fault_count()
        ));
        log.info(format_args!("{}", report.accepted_listing()));

        let outcome = policy.conclude(report);
        if let Err(failure) = &outcome {
            log.error(format_args!("Strict discovery failed: {}", failure));
        }
        outcome
    }

    fn enumerate(&self, roots: &[(PathBuf, TraversalMode)], log: &DiscoveryLog) -> Vec<PathBuf> {
        let listings: Vec<Vec<PathBuf>> = match &self.pool {
            Some(pool) => pool.install(|| {
                roots
                    .par_iter()
                    .map(|(root, mode)| self.walker.enumerate(root, *mode, log))
                    .collect()
            }),
            None => roots
                .iter()
                .map(|(root, mode)| self.walker.enumerate(root, *mode, log))
                .collect(),
        };

        CandidateWalker::merge(listings)
    }

    fn process_candidate(
        &self,
        ordinal: usize,
        path: PathBuf,
        policy: &FaultPolicy,
        log: &DiscoveryLog,
    ) -> Candidate {
        let mut candidate = Candidate::new(ordinal, path);

        if !self.apply_path_criteria(&mut candidate, policy, log) {
            return candidate;
        }

        let module = match self.inspect(candidate.path()) {
            Ok(module) => module,
            Err(fault) => {
                Self::fault(&mut candidate, FaultStage::Load, None, fault.into(), policy, log);
                return candidate;
            }
        };

        candidate.advance(CandidateStatus::Loaded);
        self.apply_reflection_criteria(&mut candidate, &module, policy, log);
        drop(module);

        candidate
    }

    /// Returns false when the candidate was excluded or faulted.
    fn apply_path_criteria(&self, candidate: &mut Candidate, policy: &FaultPolicy, log: &DiscoveryLog) -> bool {
        for criterion in &self.config.path_criteria {
            match criterion.evaluate(candidate.path()) {
                Ok(PathVerdict::Include) => {}
                Ok(PathVerdict::Exclude { complaints }) => {
                    log.debug(format_args!(
                        "Excluded {} by {}: {}",
                        candidate.path().display(),
                        criterion.name(),
                        complaints.join("; ")
                    ));
                    candidate.exclude(CandidateStatus::ExcludedByPath, complaints);
                    return false;
                }
                Err(e) => {
                    Self::fault(candidate, FaultStage::PathCriterion, Some(criterion.name()), e.into(), policy, log);
                    return false;
                }
            }
        }
        true
    }

    fn inspect(&self, path: &Path) -> Result<InspectedModule, LoadFault> {
        panic::catch_unwind(AssertUnwindSafe(|| self.inspector.inspect(path))).unwrap_or_else(|_| {
            Err(LoadFault::malformed(
                path,
                format!("inspector '{}' panicked", self.inspector.name()),
            ))
        })
    }

    /// First reject or fault ends evaluation for the candidate.
    fn apply_reflection_criteria(
        &self,
        candidate: &mut Candidate,
        module: &InspectedModule,
        policy: &FaultPolicy,
        log: &DiscoveryLog,
    ) {
        for criterion in &self.config.reflection_criteria {
            match criterion.evaluate(module) {
                Ok(ReflectionVerdict::Keep) => {}
                Ok(ReflectionVerdict::Reject { complaints }) => {
                    log.debug(format_args!(
                        "Rejected {} by {}: {}",
                        candidate.path().display(),
                        criterion.name(),
                        complaints.join("; ")
                    ));
                    candidate.exclude(CandidateStatus::RejectedByReflection, complaints);
                    return;
                }
                Err(e) => {
                    Self::fault(
                        candidate,
                        FaultStage::ReflectionCriterion,
                        Some(criterion.name()),
                        e.into(),
                        policy,
                        log,
                    );
                    return;
                }
            }
        }
    }

    fn fault(
        candidate: &mut Candidate,
        stage: FaultStage,
        criterion: Option<&str>,
        error: FaultError,
        policy: &FaultPolicy,
        log: &DiscoveryLog,
    ) {
        let record = FaultRecord::new(candidate.ordinal(), candidate.path(), stage, criterion, error);
        log.warn(format_args!("{}", record));
        candidate.advance(CandidateStatus::Faulted);
        policy.record(record);
    }
}
