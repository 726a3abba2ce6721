//! Interactive session: prompt for a target, ports and protocol, scan,
//! then offer to go again.

use crate::cli::prompt::{LineReader, Prompter};
use crate::cli::scan::{Orchestrator, ScanRequest};
use crate::error::{ScanError, ScanResult};
use crate::output;
use crate::scanner::Prober;
use crate::types::{PortSpec, ProtocolSelection};
use std::io::Write;

const TARGET_PROMPT: &str = "Enter a domain or IP address: ";
pub(super) const PORTS_PROMPT: &str = "Enter port (single), range (20-25) or comma list (80,443): ";
const PROTOCOL_PROMPT: &str = "Enter protocol (TCP/UDP/BOTH) [default TCP]: ";
const AGAIN_PROMPT: &str = "\nScan another target? (y/n): ";

/// Run the prompt loop until the user declines another scan or input ends.
///
/// Bad ports and unresolvable targets are reported and the loop starts
/// over; only I/O failures end the session with an error.
pub async fn run_interactive<P, R, W>(
    orchestrator: &Orchestrator<P>,
    prompter: &mut Prompter<R, W>,
) -> ScanResult<()>
where
    P: Prober + 'static,
    R: LineReader,
    W: Write + Send,
{
    if !orchestrator.options().quiet {
        prompter.say(&output::banner())?;
    }

    loop {
        let Some(target) = prompter.ask(TARGET_PROMPT).await? else {
            return Ok(());
        };
        if target.is_empty() {
            continue;
        }

        let Some(ports) = prompter.ask(PORTS_PROMPT).await? else {
            return Ok(());
        };
        let ports = PortSpec::parse(&ports);
        if ports.is_empty() {
            prompter.say("[!] No valid ports provided.")?;
            continue;
        }

        let Some(protocol) = prompter.ask(PROTOCOL_PROMPT).await? else {
            return Ok(());
        };

        let request = ScanRequest {
            target,
            ports,
            selection: ProtocolSelection::from_input(&protocol),
        };

        match orchestrator.scan_target(&request, prompter.out()).await {
            Ok(_) => {}
            Err(ScanError::Target(e)) => {
                prompter.say(&format!("[!] {}", e))?;
                continue;
            }
            Err(e) => return Err(e),
        }

        match prompter.ask(AGAIN_PROMPT).await? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => continue,
            _ => return Ok(()),
        }
    }
}
