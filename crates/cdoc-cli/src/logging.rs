//! Diagnostic output for `cdoc -d`.

use anyhow::{anyhow, bail, Result};
use bitflags::bitflags;
use tracing_subscriber::EnvFilter;

bitflags! {
    /// Pipeline stages that can be traced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DebugFlags: u8 {
        const SCANNER = 1 << 0;
        const SORTER = 1 << 1;
        const SEMANTIC = 1 << 2;
        const RENDER = 1 << 3;
    }
}

impl DebugFlags {
    /// Parse a comma-separated list such as `scanner,sorter` or `all`.
    pub fn parse(list: &str) -> Result<Self> {
        let mut flags = DebugFlags::empty();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let upper = name.to_ascii_uppercase();
            if upper == "ALL" {
                flags |= DebugFlags::all();
                continue;
            }
            match DebugFlags::from_name(&upper) {
                Some(flag) => flags |= flag,
                None => bail!(
                    "Unknown debug flag `{}` (expected scanner, sorter, semantic, render or all)",
                    name
                ),
            }
        }
        Ok(flags)
    }

    /// Filter directives for the enabled stages.
    pub fn directives(self) -> Vec<&'static str> {
        let mut directives = vec!["warn"];
        if self.contains(DebugFlags::SCANNER) {
            directives.push("cdoc_core::scanner=trace");
        }
        if self.contains(DebugFlags::SORTER) {
            directives.push("cdoc_core::report=trace");
        }
        if self.contains(DebugFlags::SEMANTIC) {
            directives.push("cdoc_core::semantic=debug");
        }
        if self.contains(DebugFlags::RENDER) {
            directives.push("cdoc_core::doc=debug");
        }
        directives
    }
}

/// Install the stderr logger. `RUST_LOG` wins over the flags when set.
pub fn init(flags: DebugFlags) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(flags.directives().join(","))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(!flags.is_empty())
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger: {}", e))
}
