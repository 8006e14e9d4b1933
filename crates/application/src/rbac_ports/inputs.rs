/// Default page size for role and permission listings.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Upper bound applied to any requested page size.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Offset pagination request. Listings are ordered newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    offset: usize,
    limit: usize,
}

impl PageRequest {
    /// Creates a page request, clamping `limit` to `1..=100`.
    #[must_use]
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Number of rows skipped.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Maximum number of rows returned.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}

/// Row payload for inserting a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
    /// Marks a bootstrap-owned role.
    pub is_system: bool,
}

/// Mutable role fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New human-readable name.
    pub display_name: String,
    /// New description.
    pub description: String,
}

/// Row payload for inserting a permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// Unique permission name, conventionally `resource:action`.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
    /// Resource group.
    pub resource: String,
    /// Action on the resource.
    pub action: String,
    /// Marks a bootstrap-owned permission.
    pub is_system: bool,
}

/// Mutable permission fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePermissionInput {
    /// New human-readable name.
    pub display_name: String,
    /// New description.
    pub description: String,
}
