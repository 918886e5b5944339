//! Directory service configuration.
//!
//! # Invariants
//! - `default_page_size <= max_page_size` and both are non-zero.

/// Password assigned to every newly created employee.
pub const DEFAULT_PASSWORD: &str = "123456";
/// Value substituted for credentials on read paths.
pub const PASSWORD_MASK: &str = "****";
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 50;

/// Tunables for `EmployeeService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Raw password encoded into new records.
    pub default_password: String,
    /// Mask written over `password` on redacted reads.
    pub password_mask: String,
    /// Page size used when the caller passes `0`.
    pub default_page_size: u32,
    /// Upper clamp for caller page sizes.
    pub max_page_size: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_password: DEFAULT_PASSWORD.to_string(),
            password_mask: PASSWORD_MASK.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl DirectoryConfig {
    /// Resolves the effective page size for a caller-supplied value.
    ///
    /// `0` falls back to the default; larger values clamp to the maximum.
    pub fn normalize_page_size(&self, page_size: u32) -> u32 {
        let max = self.max_page_size.max(1);
        match page_size {
            0 => self.default_page_size.clamp(1, max),
            value => value.min(max),
        }
    }
}
