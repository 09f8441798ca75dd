use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::assembly::matcher::{DEFAULT_SLOT_PREFIXES, MatcherChain};
use crate::assembly::validate::{AssemblyReport, Violation, WiredPayload, validate_assembly};
use crate::assembly::wiring::{RemapInstance, Wiring};
use crate::foundation::error::{SlotfitError, SlotfitResult};
use crate::reconstruct::hierarchy::{SlotFill, build_output};
use crate::remap::cache::{CacheStats, PayloadCache};
use crate::remap::fingerprint::{InputFingerprint, fingerprint_inputs};
use crate::remap::payload::{Payload, SourceContext, compute_payload};
use crate::remap::transform::RemapSettings;
use crate::scene::document::{Document, DocumentStore};
use crate::scene::template::{TargetSlot, Template, TemplateRegistry};

/// Options controlling an [`AssemblySession`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AssemblyOpts {
    /// Tree transformer settings.
    pub remap: RemapSettings,
    /// Compute remap instances in parallel (rayon), using a dedicated thread pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Prefixes accepted by the prefixed-name slot matcher.
    pub slot_prefixes: Vec<String>,
}

impl Default for AssemblyOpts {
    fn default() -> Self {
        Self {
            remap: RemapSettings::default(),
            parallel: false,
            threads: None,
            slot_prefixes: DEFAULT_SLOT_PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AssemblyOpts {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlotfitResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SlotfitError::serde(format!("parse assembly options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlotfitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlotfitError::validation(format!("open options JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate numeric options.
    pub fn validate(&self) -> SlotfitResult<()> {
        self.remap.validate()?;
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(SlotfitError::validation("'threads' must be >= 1 when set"));
        }
        Ok(())
    }
}

/// A remap instance that could not produce a payload.
#[derive(Debug)]
pub struct InstanceFailure {
    /// Remap instance id.
    pub instance: String,
    /// Why it failed.
    pub error: SlotfitError,
}

/// Result of one assembly pass.
#[derive(Debug)]
pub struct Assembly {
    /// Resolved template.
    pub template: Option<Template>,
    /// Payload per successfully computed instance.
    pub payloads: BTreeMap<String, Arc<Payload>>,
    /// Instances that failed; independent of each other and of the payloads above.
    pub failures: Vec<InstanceFailure>,
    /// Export readiness.
    pub report: AssemblyReport,
    fills: Vec<(usize, String)>,
}

impl Assembly {
    /// Shorthand for [`AssemblyReport::is_fully_assembled`].
    pub fn is_fully_assembled(&self) -> bool {
        self.report.is_fully_assembled()
    }

    /// Instance id filling each slot, in template order.
    pub fn slot_fills(&self) -> impl Iterator<Item = (&TargetSlot, &str)> {
        self.fills.iter().filter_map(|(idx, inst)| {
            self.template
                .as_ref()
                .and_then(|t| t.slots.get(*idx))
                .map(|slot| (slot, inst.as_str()))
        })
    }

    /// Build the output document. Refused unless the assembly is fully assembled.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn export(&self, documents: &DocumentStore) -> SlotfitResult<Document> {
        self.report.ensure_ready()?;
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| SlotfitError::validation("no template resolved for assembly"))?;

        let mut fills = Vec::with_capacity(self.fills.len());
        for (idx, instance) in &self.fills {
            let payload = self.payloads.get(instance).ok_or_else(|| {
                SlotfitError::validation(format!("no payload for instance '{instance}'"))
            })?;
            fills.push(SlotFill {
                slot: &template.slots[*idx],
                payload: payload.as_ref(),
            });
        }
        build_output(template, &fills, documents)
    }
}

struct Job<'a> {
    instance: &'a str,
    source: SourceContext,
    slot: &'a TargetSlot,
    fingerprint: InputFingerprint,
}

/// Long-lived assembly driver.
///
/// Holds the matcher chain, a payload cache (so unchanged instances are not recomputed
/// between runs) and an optional worker pool.
#[derive(Debug)]
pub struct AssemblySession {
    opts: AssemblyOpts,
    matchers: MatcherChain,
    cache: PayloadCache,
    pool: Option<rayon::ThreadPool>,
}

impl AssemblySession {
    /// Create a session with the default matcher chain.
    pub fn new(opts: AssemblyOpts) -> SlotfitResult<Self> {
        opts.validate()?;
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };
        let matchers = MatcherChain::with_prefixes(opts.slot_prefixes.iter().cloned());
        Ok(Self {
            opts,
            matchers,
            cache: PayloadCache::new(),
            pool,
        })
    }

    /// Replace the matcher chain.
    pub fn with_matchers(mut self, matchers: MatcherChain) -> Self {
        self.matchers = matchers;
        self
    }

    /// Matcher chain, for appending custom matchers.
    pub fn matchers_mut(&mut self) -> &mut MatcherChain {
        &mut self.matchers
    }

    /// Session options.
    pub fn opts(&self) -> &AssemblyOpts {
        &self.opts
    }

    /// Payload cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Compute every instance's payload and validate the wiring.
    ///
    /// Fails only on structurally invalid wiring; per-instance problems end up in
    /// [`Assembly::failures`] and unfilled slots.
    #[tracing::instrument(skip_all, fields(template = %wiring.template))]
    pub fn run(
        &mut self,
        documents: &DocumentStore,
        templates: &TemplateRegistry,
        wiring: &Wiring,
    ) -> SlotfitResult<Assembly> {
        wiring.validate()?;

        let Some(template) = templates.get(&wiring.template) else {
            tracing::warn!("template not found");
            let failures = wiring
                .instances
                .iter()
                .map(|i| InstanceFailure {
                    instance: i.id.clone(),
                    error: SlotfitError::validation(format!(
                        "template '{}' not found",
                        wiring.template
                    )),
                })
                .collect();
            return Ok(Assembly {
                template: None,
                payloads: BTreeMap::new(),
                failures,
                report: validate_assembly(None, &[]),
                fills: Vec::new(),
            });
        };

        let mut payloads = BTreeMap::<String, Arc<Payload>>::new();
        let mut failures = Vec::new();
        let mut jobs = Vec::new();

        for inst in &wiring.instances {
            match self.prepare_job(inst, template, documents) {
                Ok(job) => {
                    if let Some(p) = self.cache.lookup(job.instance, job.fingerprint) {
                        payloads.insert(inst.id.clone(), p);
                    } else {
                        jobs.push(job);
                    }
                }
                Err(error) => failures.push(InstanceFailure {
                    instance: inst.id.clone(),
                    error,
                }),
            }
        }

        let settings = self.opts.remap;
        let compute = |job: &Job<'_>| compute_payload(&job.source, job.slot, &settings);
        let results: Vec<SlotfitResult<Payload>> = match &self.pool {
            Some(pool) => pool.install(|| jobs.par_iter().map(compute).collect()),
            None => jobs.iter().map(compute).collect(),
        };

        for (job, result) in jobs.iter().zip(results) {
            match result {
                Ok(p) => {
                    let p = Arc::new(p);
                    self.cache.store(job.instance, job.fingerprint, Arc::clone(&p));
                    payloads.insert(job.instance.to_string(), p);
                }
                Err(error) => {
                    self.cache.invalidate(job.instance);
                    failures.push(InstanceFailure {
                        instance: job.instance.to_string(),
                        error,
                    });
                }
            }
        }
        for f in &failures {
            tracing::warn!(instance = %f.instance, error = %f.error, "remap instance failed");
        }
        self.cache
            .retain_instances(wiring.instances.iter().map(|i| i.id.as_str()));

        let mut wired = Vec::with_capacity(wiring.wires.len());
        let mut unresolved = Vec::new();
        for wire in &wiring.wires {
            let Some(payload) = payloads.get(&wire.instance) else {
                continue;
            };
            match self.matchers.resolve(&wire.slot, template) {
                Some(m) => wired.push(WiredPayload {
                    instance: &wire.instance,
                    slot: &template.slots[m.index].name,
                    payload: payload.as_ref(),
                }),
                None => unresolved.push(Violation::unresolved(&wire.instance, &wire.slot)),
            }
        }

        let mut report = validate_assembly(Some(template), &wired);
        report.violations.extend(unresolved);

        let mut fills = Vec::<(usize, String)>::new();
        for w in &wired {
            if w.payload.target_container != w.slot {
                continue;
            }
            let Some(idx) = template.slot_index(w.slot) else {
                continue;
            };
            if !fills.iter().any(|(i, _)| *i == idx) {
                fills.push((idx, w.instance.to_string()));
            }
        }
        fills.sort_by_key(|(idx, _)| *idx);

        tracing::debug!(
            payloads = payloads.len(),
            failures = failures.len(),
            filled = report.filled_slots,
            total = report.total_slots,
            ready = report.is_fully_assembled(),
            "assembly pass complete"
        );

        Ok(Assembly {
            template: Some(template.clone()),
            payloads,
            failures,
            report,
            fills,
        })
    }

    fn prepare_job<'a>(
        &self,
        inst: &'a RemapInstance,
        template: &'a Template,
        documents: &DocumentStore,
    ) -> SlotfitResult<Job<'a>> {
        let m = self.matchers.resolve(&inst.target, template).ok_or_else(|| {
            SlotfitError::validation(format!(
                "instance '{}': target '{}' matches no slot of template '{}'",
                inst.id, inst.target, template.name
            ))
        })?;
        let slot = &template.slots[m.index];
        tracing::debug!(instance = %inst.id, slot = %slot.name, matcher = m.matcher, "target resolved");

        let doc = documents
            .get(&inst.source.document)
            .ok_or_else(|| SlotfitError::missing_document(&inst.source.document))?;
        let source = SourceContext::from_document(doc, &inst.source.container, inst.strategy.clone())?;
        let fingerprint = fingerprint_inputs(&source, slot, &self.opts.remap);
        Ok(Job {
            instance: &inst.id,
            source,
            slot,
            fingerprint,
        })
    }
}

fn build_thread_pool(threads: Option<usize>) -> SlotfitResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SlotfitError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/session.rs"]
mod tests;
