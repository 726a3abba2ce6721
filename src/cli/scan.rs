//! Scan orchestration.
//!
//! Validates a request, resolves the target, runs the scheduler once per
//! resolved address and writes the formatted results.

use crate::error::{ScanError, ScanResult};
use crate::output::{self, OutputFormat, PlainOptions};
use crate::scanner::{NetworkProber, Prober, ScanReport, Scheduler};
use crate::types::{self, PortSpec, ProtocolSelection, ResolvedAddress};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Effective scan parameters after merging flags and settings.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub timeout: Duration,
    pub concurrency: usize,
    pub admission_wait: Option<Duration>,
    pub format: OutputFormat,
    pub plain: PlainOptions,
    /// Draw a progress bar on stderr while probing.
    pub progress: bool,
    /// Skip the per-address summary line.
    pub quiet: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: crate::scanner::DEFAULT_TIMEOUT,
            concurrency: crate::scanner::DEFAULT_CONCURRENCY,
            admission_wait: None,
            format: OutputFormat::Plain,
            plain: PlainOptions::default(),
            progress: false,
            quiet: false,
        }
    }
}

/// A validated request to scan one target.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub target: String,
    pub ports: PortSpec,
    pub selection: ProtocolSelection,
}

impl ScanRequest {
    /// Parse the port text and reject requests that would probe nothing.
    pub fn new(
        target: impl Into<String>,
        ports: &str,
        selection: ProtocolSelection,
    ) -> ScanResult<Self> {
        let ports = PortSpec::parse(ports);
        if ports.is_empty() {
            return Err(ScanError::NoValidPorts);
        }

        Ok(Self {
            target: target.into(),
            ports,
            selection,
        })
    }
}

/// Drives scans for whole targets.
pub struct Orchestrator<P = NetworkProber> {
    prober: Arc<P>,
    options: ScanOptions,
}

impl Orchestrator<NetworkProber> {
    pub fn new(options: ScanOptions) -> Self {
        Self::with_prober(NetworkProber, options)
    }
}

impl<P: Prober + 'static> Orchestrator<P> {
    pub fn with_prober(prober: P, options: ScanOptions) -> Self {
        Self {
            prober: Arc::new(prober),
            options,
        }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Resolve and scan every address of the request's target.
    ///
    /// Plain output is written as each address finishes; structured
    /// formats are written once after the last address.
    pub async fn scan_target<W: Write>(
        &self,
        request: &ScanRequest,
        out: &mut W,
    ) -> ScanResult<Vec<ScanReport>> {
        let addresses = types::resolve(&request.target).await?;
        let mut reports = Vec::with_capacity(addresses.len());

        for address in addresses {
            let report = self.scan_address(request, address).await;

            if self.options.format.is_streaming() {
                let text = output::render_document(
                    std::slice::from_ref(&report),
                    self.options.format,
                    self.options.plain,
                )?;
                write!(out, "{}", text)?;
                if !self.options.quiet {
                    writeln!(out, "{}", output::render_summary(&report, self.options.plain))?;
                }
                out.flush()?;
            }
            reports.push(report);
        }

        if !self.options.format.is_streaming() {
            let document =
                output::render_document(&reports, self.options.format, self.options.plain)?;
            writeln!(out, "{}", document.trim_end())?;
            out.flush()?;
        }

        Ok(reports)
    }

    /// Scan a single resolved address.
    pub async fn scan_address(&self, request: &ScanRequest, address: ResolvedAddress) -> ScanReport {
        let protocols = request.selection.protocols();
        let mut scheduler = Scheduler::with_shared_prober(Arc::clone(&self.prober))
            .with_concurrency(self.options.concurrency)
            .with_timeout(self.options.timeout)
            .with_admission_wait(self.options.admission_wait);

        let progress = self
            .options
            .progress
            .then(|| progress_bar((request.ports.len() * protocols.len()) as u64));
        if let Some(ref pb) = progress {
            scheduler = scheduler.with_progress(pb.clone());
        }

        let started_at = Utc::now();
        let start = Instant::now();
        let results = scheduler.run(address, &request.ports, protocols).await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        ScanReport::new(
            request.target.clone(),
            address,
            protocols,
            request.ports.len(),
            results,
            started_at,
            start.elapsed(),
        )
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb
}
