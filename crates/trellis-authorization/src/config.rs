//! Access configuration: the rule tables and their sealing discipline.
//!
//! A hosting layer registers `(container-name-or-wildcard, rights)` pairs
//! through an explicit [`AccessConfiguration`] object during a scoped
//! initialization callback. The configuration is then sealed: every later
//! mutation fails with [`Error::ConfigurationSealed`] rather than silently
//! changing a table that concurrently-executing requests already share.
//!
//! Resolution is a two-tier lookup: an exact-name entry always wins over
//! the `"*"` wildcard entry; absence of both means no rights at all.

use indexmap::IndexMap;
use trellis_core::{Error, OperationRights, Result, Rights};

/// The wildcard entry name matched when no exact entry exists.
pub const WILDCARD: &str = "*";

/// The rule tables mapping container and operation names to rights.
///
/// Mutable until sealed, read-only forever after. A sealed configuration is
/// safe to share across concurrently-executing requests without locking.
#[derive(Debug, Clone, Default)]
pub struct AccessConfiguration {
    container_rights: IndexMap<String, Rights>,
    operation_rights: IndexMap<String, OperationRights>,
    sealed: bool,
}

impl AccessConfiguration {
    /// An empty, unsealed configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a hosting-layer registration callback and return the sealed
    /// configuration.
    ///
    /// # Errors
    ///
    /// Propagates any error the callback returns; the configuration is not
    /// sealed in that case and is dropped.
    pub fn build(register: impl FnOnce(&mut AccessConfiguration) -> Result<()>) -> Result<Self> {
        let mut config = Self::new();
        register(&mut config)?;
        config.seal();
        Ok(config)
    }

    fn ensure_unsealed(&self) -> Result<()> {
        if self.sealed {
            Err(Error::ConfigurationSealed)
        } else {
            Ok(())
        }
    }

    /// Set the rights mask for a container name or the `"*"` wildcard.
    ///
    /// Last write wins before sealing.
    ///
    /// # Errors
    ///
    /// Fails with `Error::ConfigurationSealed` after [`seal`](Self::seal),
    /// with no side effect on the table.
    pub fn set_container_rights(&mut self, name: impl Into<String>, rights: Rights) -> Result<()> {
        self.ensure_unsealed()?;
        self.container_rights.insert(name.into(), rights);
        Ok(())
    }

    /// Set container rights from a raw bitmask value.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidRights` if `value` carries bits outside the
    /// valid range, or `Error::ConfigurationSealed` after sealing.
    pub fn set_container_rights_raw(&mut self, name: impl Into<String>, value: u32) -> Result<()> {
        self.ensure_unsealed()?;
        let rights = Rights::from_bits(value).ok_or(Error::InvalidRights { value })?;
        self.set_container_rights(name, rights)
    }

    /// Set container rights from a comma-separated list of right names,
    /// e.g. `"RS,WD"`.
    ///
    /// # Errors
    ///
    /// Fails with `Error::UnknownRightsName` on the first unparseable name,
    /// or `Error::ConfigurationSealed` after sealing.
    pub fn set_container_rights_named(
        &mut self,
        name: impl Into<String>,
        rights: &str,
    ) -> Result<()> {
        self.ensure_unsealed()?;
        let parts: Vec<&str> = rights
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        let (mask, unknown) = Rights::parse_list(&parts);
        if let Some(first) = unknown.first() {
            return Err(Error::UnknownRightsName {
                name: (*first).to_string(),
            });
        }
        self.set_container_rights(name, mask)
    }

    /// Set the rights mask for a service-operation name or the wildcard.
    ///
    /// # Errors
    ///
    /// Fails with `Error::ConfigurationSealed` after sealing.
    pub fn set_operation_rights(
        &mut self,
        name: impl Into<String>,
        rights: OperationRights,
    ) -> Result<()> {
        self.ensure_unsealed()?;
        self.operation_rights.insert(name.into(), rights);
        Ok(())
    }

    /// Set operation rights from a raw bitmask value.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidRights` or `Error::ConfigurationSealed`.
    pub fn set_operation_rights_raw(&mut self, name: impl Into<String>, value: u32) -> Result<()> {
        self.ensure_unsealed()?;
        let rights = OperationRights::from_bits(value).ok_or(Error::InvalidRights { value })?;
        self.set_operation_rights(name, rights)
    }

    /// Set operation rights from a comma-separated list of right names.
    ///
    /// # Errors
    ///
    /// Fails with `Error::UnknownRightsName` or `Error::ConfigurationSealed`.
    pub fn set_operation_rights_named(
        &mut self,
        name: impl Into<String>,
        rights: &str,
    ) -> Result<()> {
        self.ensure_unsealed()?;
        let parts: Vec<&str> = rights
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        let (mask, unknown) = OperationRights::parse_list(&parts);
        if let Some(first) = unknown.first() {
            return Err(Error::UnknownRightsName {
                name: (*first).to_string(),
            });
        }
        self.set_operation_rights(name, mask)
    }

    /// Resolve the effective rights for a container: exact entry, else the
    /// wildcard entry, else no rights. Never fails.
    #[must_use]
    pub fn resolve(&self, container: &str) -> Rights {
        self.container_rights
            .get(container)
            .copied()
            .or_else(|| self.container_rights.get(WILDCARD).copied())
            .unwrap_or_else(Rights::empty)
    }

    /// Resolve the effective rights for a service operation.
    #[must_use]
    pub fn resolve_operation(&self, operation: &str) -> OperationRights {
        self.operation_rights
            .get(operation)
            .copied()
            .or_else(|| self.operation_rights.get(WILDCARD).copied())
            .unwrap_or_else(OperationRights::empty)
    }

    /// Seal the configuration. Idempotent; every `set_*` fails afterwards.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether the configuration has been sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn resolve_prefers_exact_over_wildcard() {
        let mut config = AccessConfiguration::new();
        config.set_container_rights(WILDCARD, Rights::ALL).unwrap();
        config
            .set_container_rights("Customers", Rights::READ_SINGLE)
            .unwrap();

        // Narrowing: exact entry under the wildcard.
        assert_eq!(config.resolve("Customers"), Rights::READ_SINGLE);
        // Wildcard fallback for everything else.
        assert_eq!(config.resolve("Orders"), Rights::ALL);
    }

    #[test]
    fn exact_entry_widens_over_empty_wildcard() {
        let mut config = AccessConfiguration::new();
        config.set_container_rights(WILDCARD, Rights::empty()).unwrap();
        config
            .set_container_rights("Customers", Rights::ALL_READ)
            .unwrap();

        assert_eq!(config.resolve("Customers"), Rights::ALL_READ);
        assert_eq!(config.resolve("Orders"), Rights::empty());
    }

    #[test]
    fn absent_everything_resolves_to_no_rights() {
        let config = AccessConfiguration::new();
        assert_eq!(config.resolve("Customers"), Rights::empty());
        assert_eq!(config.resolve_operation("TopCustomer"), OperationRights::empty());
    }

    #[test]
    fn last_write_wins_before_sealing() {
        let mut config = AccessConfiguration::new();
        config
            .set_container_rights("Customers", Rights::READ_SINGLE)
            .unwrap();
        config
            .set_container_rights("Customers", Rights::WRITE_DELETE)
            .unwrap();
        assert_eq!(config.resolve("Customers"), Rights::WRITE_DELETE);
    }

    #[test]
    fn sealed_configuration_rejects_every_mutation() {
        let mut config = AccessConfiguration::new();
        config
            .set_container_rights("Customers", Rights::ALL_READ)
            .unwrap();
        config.seal();
        config.seal(); // idempotent

        assert_matches!(
            config.set_container_rights("Orders", Rights::ALL),
            Err(Error::ConfigurationSealed)
        );
        assert_matches!(
            config.set_container_rights_named("Orders", "RS"),
            Err(Error::ConfigurationSealed)
        );
        assert_matches!(
            config.set_operation_rights("TopCustomer", OperationRights::ALL),
            Err(Error::ConfigurationSealed)
        );

        // No request-visible side effect from the rejected writes.
        assert_eq!(config.resolve("Orders"), Rights::empty());
        assert_eq!(config.resolve("Customers"), Rights::ALL_READ);
    }

    #[test]
    fn raw_values_outside_the_valid_range_are_rejected() {
        let mut config = AccessConfiguration::new();
        assert_matches!(
            config.set_container_rights_raw("Customers", 0xFFFF_FFFF),
            Err(Error::InvalidRights { value: 0xFFFF_FFFF })
        );
        assert!(config
            .set_container_rights_raw("Customers", Rights::ALL.bits())
            .is_ok());
        assert_matches!(
            config.set_operation_rights_raw("Op", 0b1000),
            Err(Error::InvalidRights { value: 0b1000 })
        );
    }

    #[test]
    fn named_rights_strings_parse_or_fail_loudly() {
        let mut config = AccessConfiguration::new();
        config.set_container_rights_named("Customers", "RS, WD").unwrap();
        assert_eq!(
            config.resolve("Customers"),
            Rights::READ_SINGLE | Rights::WRITE_DELETE
        );

        assert_matches!(
            config.set_container_rights_named("Orders", "RS,bogus"),
            Err(Error::UnknownRightsName { name }) if name == "bogus"
        );
    }

    #[test]
    fn build_runs_the_callback_and_seals() {
        let config = AccessConfiguration::build(|cfg| {
            cfg.set_container_rights("Customers", Rights::ALL)?;
            cfg.set_operation_rights("TopCustomer", OperationRights::ALL_READ)
        })
        .unwrap();

        assert!(config.is_sealed());
        assert_eq!(config.resolve("Customers"), Rights::ALL);
        assert_eq!(
            config.resolve_operation("TopCustomer"),
            OperationRights::ALL_READ
        );
    }

    #[test]
    fn build_propagates_callback_errors() {
        let result = AccessConfiguration::build(|cfg| {
            cfg.set_container_rights_raw("Customers", u32::MAX)
        });
        assert_matches!(result, Err(Error::InvalidRights { .. }));
    }
}
