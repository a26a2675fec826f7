//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the simulation tooling."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
/// Build metadata reported by `--version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub package: &'static str,
    pub version: &'static str,
    pub rust_version: &'static str,
}

/// Captures the calling crate's package metadata; `env!` expands where the
/// macro is used, not inside this crate.
#[macro_export]
macro_rules! version_info {
    () => {
        $crate::VersionInfo {
            package: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            rust_version: env!("CARGO_PKG_RUST_VERSION"),
        }
    };
}

impl VersionInfo {
    pub fn extended(&self) -> String {
        format!(
            "{} {} (msrv {})",
            self.package, self.version, self.rust_version
        )
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn macro_reports_the_expanding_crate() {
        let info = crate::version_info!();
        assert_eq!(info.package, "h2sim-common");
        assert!(info.extended().contains(info.version));
        assert!(info.extended().ends_with(&format!("(msrv {})", info.rust_version)));
    }
}
