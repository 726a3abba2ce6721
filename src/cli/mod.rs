//! Command-line interface.
//!
//! With `--target` the scan runs once and exits; without it the program
//! drops into an interactive prompt loop.
//! - `lunascan -t example.com -p 20-25,80` - one-shot scan
//! - `lunascan` - interactive session

mod interactive;
mod prompt;
mod scan;

pub use interactive::run_interactive;
pub use prompt::{LineReader, Prompter, ScriptedLines, StdinLines};
pub use scan::{Orchestrator, ScanOptions, ScanRequest};

use crate::config::{positive_seconds, AppSettings};
use crate::error::{ScanError, ScanResult};
use crate::output::{self, OutputFormat, PlainOptions};
use crate::scanner::{Prober, ScanReport, ADMISSION_SLACK};
use crate::types::ProtocolSelection;
use interactive::PORTS_PROMPT;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

/// Luna Port Scanner - concurrent TCP and UDP port probing.
#[derive(Parser, Debug)]
#[command(name = "lunascan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP/UDP port scanner", long_about = None)]
pub struct Cli {
    /// Domain or IP address to scan (omit for interactive mode)
    #[arg(short, long, value_name = "HOST")]
    pub target: Option<String>,

    /// Ports to scan (e.g. "80", "80,443", "20-25", "22,80,8000-8010")
    #[arg(short, long, value_name = "SPEC")]
    pub ports: Option<String>,

    /// Protocol to probe: TCP, UDP or BOTH (anything else means TCP)
    #[arg(long, value_name = "PROTO")]
    pub protocol: Option<String>,

    /// Per-probe timeout in seconds
    #[arg(long, env = "LUNASCAN_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Maximum number of simultaneously active probes
    #[arg(
        short,
        long,
        env = "LUNASCAN_CONCURRENCY",
        value_name = "N",
        allow_negative_numbers = true
    )]
    pub concurrency: Option<i64>,

    /// Longest time a probe may wait for a free slot, in seconds.
    /// Must be at least the timeout plus 0.25s; a port whose wait expires
    /// is reported Closed without being probed
    #[arg(long, value_name = "SECONDS")]
    pub admission_wait: Option<f64>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,

    /// Show closed ports in plain output
    #[arg(long)]
    pub show_closed: bool,

    /// Enable debug logging and a progress bar
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the banner and summary lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merge flags over `settings` into effective scan options.
    pub fn scan_options(&self, settings: &AppSettings) -> ScanResult<ScanOptions> {
        let timeout = match self.timeout {
            Some(secs) => {
                positive_seconds("timeout", secs).map_err(|_| ScanError::InvalidTimeout(secs))?
            }
            None => settings.timeout()?,
        };

        let admission_wait = match self.admission_wait {
            Some(secs) => Some(positive_seconds("admission-wait", secs)?),
            None => settings.admission_wait()?,
        };
        // An expired wait reports the pair closed without probing it.
        let min_wait = timeout + ADMISSION_SLACK;
        if let Some(wait) = admission_wait.filter(|&w| w < min_wait) {
            return Err(ScanError::AdmissionWaitTooShort {
                wait: wait.as_secs_f64(),
                min: min_wait.as_secs_f64(),
            });
        }

        let concurrency = match self.concurrency {
            Some(n) => usize::try_from(n.max(1)).unwrap_or(usize::MAX),
            None => settings.concurrency.max(1),
        };

        Ok(ScanOptions {
            timeout,
            concurrency,
            admission_wait,
            format: self.output,
            plain: PlainOptions {
                color: console::colors_enabled(),
                show_closed: self.show_closed || settings.show_closed,
            },
            progress: self.verbose && self.output.is_streaming(),
            quiet: self.quiet,
        })
    }

    /// Protocol selection from the flag, falling back to settings.
    pub fn protocol_selection(&self, settings: &AppSettings) -> ProtocolSelection {
        match self.protocol.as_deref() {
            Some(text) => ProtocolSelection::from_input(text),
            None => settings.protocol_selection(),
        }
    }
}

/// Run the command described by `cli`.
pub async fn run(cli: Cli) -> ScanResult<()> {
    let settings = AppSettings::load(cli.config.as_deref())?;
    let options = cli.scan_options(&settings)?;
    let selection = cli.protocol_selection(&settings);

    tracing::debug!(
        timeout_ms = options.timeout.as_millis() as u64,
        concurrency = options.concurrency,
        protocols = %selection,
        "effective options"
    );

    if let Some(n) = cli.concurrency.filter(|&n| n < 1) {
        output::print_warning(&format!("concurrency {} is below 1, using 1", n));
    }

    let orchestrator = Orchestrator::new(options);

    match cli.target {
        Some(target) => {
            let mut prompter = Prompter::new(StdinLines, io::stderr());
            run_once(
                &orchestrator,
                target,
                cli.ports,
                selection,
                &mut prompter,
                &mut io::stdout(),
            )
            .await?;
            Ok(())
        }
        None => {
            let mut prompter = Prompter::new(StdinLines, io::stdout());
            run_interactive(&orchestrator, &mut prompter).await
        }
    }
}

/// Scan `target` once, asking for ports through `prompter` when none were
/// given. Reports go to `out`.
///
/// An empty or unusable port answer fails with `NoValidPorts` before the
/// target is resolved.
pub async fn run_once<P, R, E, W>(
    orchestrator: &Orchestrator<P>,
    target: String,
    ports: Option<String>,
    selection: ProtocolSelection,
    prompter: &mut Prompter<R, E>,
    out: &mut W,
) -> ScanResult<Vec<ScanReport>>
where
    P: Prober + 'static,
    R: LineReader,
    E: Write + Send,
    W: Write,
{
    let ports = match ports {
        Some(ports) => ports,
        None => prompter
            .ask(PORTS_PROMPT)
            .await?
            .ok_or(ScanError::NoValidPorts)?,
    };
    let request = ScanRequest::new(target, &ports, selection)?;

    let options = orchestrator.options();
    if options.format.is_streaming() && !options.quiet {
        writeln!(out, "{}", output::banner())?;
    }
    orchestrator.scan_target(&request, out).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ProbeOutcome;
    use crate::types::{Port, Protocol, ResolvedAddress};
    use async_trait::async_trait;
    use clap::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct OpenProber {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Prober for OpenProber {
        async fn probe(
            &self,
            _target: ResolvedAddress,
            _port: Port,
            _protocol: Protocol,
            _timeout: Duration,
        ) -> ProbeOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ProbeOutcome::Open
        }
    }

    fn quiet_orchestrator() -> Orchestrator<OpenProber> {
        Orchestrator::with_prober(
            OpenProber::default(),
            ScanOptions {
                quiet: true,
                ..ScanOptions::default()
            },
        )
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lunascan").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_come_from_settings() {
        let cli = parse(&["-t", "127.0.0.1", "-p", "22"]);
        let settings = AppSettings {
            timeout_secs: 0.25,
            concurrency: 7,
            protocol: "udp".to_string(),
            ..AppSettings::default()
        };

        let options = cli.scan_options(&settings).unwrap();
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert_eq!(options.concurrency, 7);
        assert_eq!(cli.protocol_selection(&settings), ProtocolSelection::Udp);
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = parse(&["--timeout", "2", "-c", "50", "--protocol", "BOTH", "-o", "json"]);
        let options = cli.scan_options(&AppSettings::default()).unwrap();

        assert_eq!(options.timeout, Duration::from_secs(2));
        assert_eq!(options.concurrency, 50);
        assert_eq!(options.format, OutputFormat::Json);
        assert_eq!(
            cli.protocol_selection(&AppSettings::default()),
            ProtocolSelection::Both
        );
    }

    #[test]
    fn test_negative_concurrency_is_clamped() {
        let cli = parse(&["-c", "-5"]);
        let options = cli.scan_options(&AppSettings::default()).unwrap();
        assert_eq!(options.concurrency, 1);

        let cli = parse(&["-c", "0"]);
        assert_eq!(cli.scan_options(&AppSettings::default()).unwrap().concurrency, 1);
    }

    #[test]
    fn test_unknown_protocol_falls_back_to_tcp() {
        let cli = parse(&["--protocol", "sctp"]);
        assert_eq!(
            cli.protocol_selection(&AppSettings::default()),
            ProtocolSelection::Tcp
        );
    }

    #[test]
    fn test_invalid_timeout() {
        let cli = parse(&["--timeout", "0"]);
        let err = cli.scan_options(&AppSettings::default()).unwrap_err();
        assert!(matches!(err, ScanError::InvalidTimeout(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_progress_only_for_plain_verbose() {
        let cli = parse(&["-v"]);
        assert!(cli.scan_options(&AppSettings::default()).unwrap().progress);

        let cli = parse(&["-v", "-o", "csv"]);
        assert!(!cli.scan_options(&AppSettings::default()).unwrap().progress);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["lunascan", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[tokio::test]
    async fn test_run_once_prompts_for_missing_ports() {
        let orchestrator = quiet_orchestrator();
        let mut prompter = Prompter::new(ScriptedLines::new(["20-25"]), Vec::new());
        let mut out = Vec::new();

        let reports = run_once(
            &orchestrator,
            "127.0.0.1".to_string(),
            None,
            ProtocolSelection::Tcp,
            &mut prompter,
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(reports[0].results.len(), 6);
        assert_eq!(orchestrator.prober().calls.load(Ordering::SeqCst), 6);
        assert_eq!(String::from_utf8(prompter.into_output()).unwrap(), PORTS_PROMPT);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("   TCP 20 Open\n"));
        assert!(text.contains("   TCP 25 Open\n"));
    }

    #[tokio::test]
    async fn test_run_once_rejects_empty_port_answer() {
        for answers in [vec![""], vec![]] {
            let orchestrator = quiet_orchestrator();
            let mut prompter = Prompter::new(ScriptedLines::new(answers), Vec::new());
            let mut out = Vec::new();

            let err = run_once(
                &orchestrator,
                "unresolvable.invalid".to_string(),
                None,
                ProtocolSelection::Both,
                &mut prompter,
                &mut out,
            )
            .await
            .unwrap_err();

            assert!(matches!(err, ScanError::NoValidPorts));
            assert!(out.is_empty());
            assert_eq!(orchestrator.prober().calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_run_once_uses_given_ports_without_prompting() {
        let orchestrator = Orchestrator::with_prober(OpenProber::default(), ScanOptions::default());
        let mut prompter = Prompter::new(ScriptedLines::default(), Vec::new());
        let mut out = Vec::new();

        run_once(
            &orchestrator,
            "127.0.0.1".to_string(),
            Some("80".to_string()),
            ProtocolSelection::Udp,
            &mut prompter,
            &mut out,
        )
        .await
        .unwrap();

        assert!(prompter.into_output().is_empty());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Luna Port Scanner"));
        assert!(text.contains("   UDP 80 Open\n"));
    }

    #[test]
    fn test_admission_wait_must_cover_one_probe() {
        let cli = parse(&["--timeout", "1", "--admission-wait", "0.5"]);
        let err = cli.scan_options(&AppSettings::default()).unwrap_err();
        assert!(matches!(err, ScanError::AdmissionWaitTooShort { .. }));
        assert_eq!(err.exit_code(), 2);

        let cli = parse(&["--timeout", "1", "--admission-wait", "1.25"]);
        let options = cli.scan_options(&AppSettings::default()).unwrap();
        assert_eq!(options.admission_wait, Some(Duration::from_millis(1250)));

        let settings = AppSettings {
            admission_wait_secs: Some(0.5),
            ..AppSettings::default()
        };
        let err = parse(&[]).scan_options(&settings).unwrap_err();
        assert!(matches!(err, ScanError::AdmissionWaitTooShort { .. }));
    }
}
