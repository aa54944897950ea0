use sysinfo::System;
use tracing::trace;

/// Name of the IPFS executable, both as a process name and on `PATH`.
pub const IPFS_BINARY: &str = "ipfs";

/// Reports whether a local IPFS daemon is running.
pub trait DaemonProbe {
    /// `true` if a local daemon is active.
    fn is_local_daemon_active(&self) -> bool;
}

impl<F> DaemonProbe for F
where
    F: Fn() -> bool,
{
    fn is_local_daemon_active(&self) -> bool {
        self()
    }
}

/// Probes the system's process table for an `ipfs` process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl DaemonProbe for SystemProbe {
    fn is_local_daemon_active(&self) -> bool {
        let mut system = System::new();
        system.refresh_processes();

        let active = system.processes().values().any(|process| is_ipfs_process(process.name()));
        trace!("local ipfs daemon active: {}", active);
        active
    }
}

/// Whether `ipfs` is installed at all, used to tell "not started" from "not installed".
pub fn ipfs_installed() -> bool {
    which::which(IPFS_BINARY).is_ok()
}

fn is_ipfs_process(name: &str) -> bool {
    let name = name.strip_suffix(".exe").unwrap_or(name);
    name == IPFS_BINARY || name == "ipfs daemon"
}
